//! The portal scripting flow.
//!
//! One call to [`PortalDriver::lookup_parcel`] walks the page through
//! session assurance, county selection, address submission and parcel
//! extraction. All waits are bounded polls driven by the injected [`Sleeper`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::clock::Sleeper;
use super::locator::{self, Locator};
use super::model::ParcelQuery;
use super::page::PortalPage;
use super::probe::{AnyProbe, SessionProbe};
use super::PortalError;

pub const DEFAULT_LANDING_URL: &str = "https://www.crsdata.com/LocalLook/";
pub const DEFAULT_LOGIN_URL: &str = "https://www.crsdata.com/login/?ReturnUrl=%2fLocalLook%2f";

/// Fixed credential pair for the portal.
#[derive(Clone)]
pub struct PortalCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Pauses, wait ceilings and scan limits of the flow.
#[derive(Debug, Clone)]
pub struct PortalTimings {
    pub poll_interval: Duration,
    pub landing_settle: Duration,
    pub session_probe: Duration,
    pub login: Duration,
    pub dropdown: Duration,
    pub chip_dismiss_pause: Duration,
    pub dropdown_open_pause: Duration,
    pub county_scan_attempts: u32,
    pub option_scroll_pause: Duration,
    pub results_scroll_pause: Duration,
    pub results_scroll_step: i64,
    pub lookup_settle: Duration,
    pub address_ready: Duration,
    pub suggestion_settle: Duration,
    pub submit_ready: Duration,
    pub result_settle: Duration,
    pub parcel: Duration,
}

impl Default for PortalTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            landing_settle: Duration::from_secs(1),
            session_probe: Duration::from_secs(10),
            login: Duration::from_secs(20),
            dropdown: Duration::from_secs(10),
            chip_dismiss_pause: Duration::from_millis(250),
            dropdown_open_pause: Duration::from_millis(350),
            county_scan_attempts: 50,
            option_scroll_pause: Duration::from_millis(150),
            results_scroll_pause: Duration::from_millis(120),
            results_scroll_step: 200,
            lookup_settle: Duration::from_millis(1200),
            address_ready: Duration::from_secs(20),
            suggestion_settle: Duration::from_millis(800),
            submit_ready: Duration::from_secs(15),
            result_settle: Duration::from_millis(2500),
            parcel: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub landing_url: String,
    pub login_url: String,
    pub credentials: Option<PortalCredentials>,
    pub timings: PortalTimings,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            landing_url: DEFAULT_LANDING_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            credentials: None,
            timings: PortalTimings::default(),
        }
    }
}

/// Outcome of session assurance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A probe found an existing session; login was skipped.
    AlreadyActive,
    /// The login form was submitted and the search box appeared.
    LoggedIn,
}

enum Condition<'a> {
    Present(&'a Locator),
    Interactable(&'a Locator),
    Session(&'a dyn SessionProbe),
}

pub struct PortalDriver {
    settings: PortalSettings,
    probe: Box<dyn SessionProbe>,
    sleeper: Arc<dyn Sleeper>,
}

impl PortalDriver {
    pub fn new(settings: PortalSettings, sleeper: Arc<dyn Sleeper>) -> Self {
        Self::with_probe(settings, Box::new(AnyProbe::portal_default()), sleeper)
    }

    pub fn with_probe(
        settings: PortalSettings,
        probe: Box<dyn SessionProbe>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            settings,
            probe,
            sleeper,
        }
    }

    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    fn timings(&self) -> &PortalTimings {
        &self.settings.timings
    }

    /// Look up the parcel ID for one address.
    ///
    /// Returns `Ok(None)` when any scripting step fails or the parcel cell
    /// never appears; only setup failures are returned as errors. The page is
    /// left as the last step left it.
    pub async fn lookup_parcel(
        &self,
        page: &dyn PortalPage,
        query: &ParcelQuery,
    ) -> Result<Option<String>, PortalError> {
        log::info!(
            "Parcel lookup started: {} ({})",
            query.full_address,
            query.county_name
        );

        match self.run_lookup(page, query).await {
            Ok(parcel) => Ok(parcel),
            Err(e) if e.is_fatal() => {
                log::error!("Parcel lookup aborted: {}", e);
                Err(e)
            }
            Err(e) => {
                log::warn!("Parcel lookup failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn run_lookup(
        &self,
        page: &dyn PortalPage,
        query: &ParcelQuery,
    ) -> Result<Option<String>, PortalError> {
        self.ensure_session(page).await?;

        page.goto(&self.settings.landing_url).await?;
        self.sleeper.sleep(self.timings().lookup_settle).await;

        self.select_county(page, &query.county_name).await?;
        self.submit_address(page, &query.full_address).await?;
        self.extract_parcel(page).await
    }

    /// Make sure the page holds an authenticated session, logging in if needed.
    pub async fn ensure_session(&self, page: &dyn PortalPage) -> Result<SessionState, PortalError> {
        let timings = self.timings();

        page.goto(&self.settings.landing_url).await?;
        self.sleeper.sleep(timings.landing_settle).await;

        if self
            .wait_for(page, Condition::Session(self.probe.as_ref()), timings.session_probe)
            .await
        {
            log::info!("Portal session active, login skipped");
            return Ok(SessionState::AlreadyActive);
        }

        log::info!("Portal session not detected, logging in");
        let credentials = self
            .settings
            .credentials
            .as_ref()
            .ok_or(PortalError::CredentialsMissing)?;

        if !self.login_form_present(page).await {
            page.goto(&self.settings.login_url).await?;
        }

        let username = locator::username_field();
        let password = locator::password_field();
        if !self
            .wait_for(page, Condition::Present(&username), timings.login)
            .await
        {
            return Err(PortalError::Timeout {
                what: "login form".to_string(),
                timeout: timings.login,
            });
        }

        page.clear(&username).await?;
        page.clear(&password).await?;
        page.type_text(&username, &credentials.username).await?;
        page.type_text(&password, &credentials.password).await?;
        page.click(&locator::login_submit()).await?;

        if !self
            .wait_for(page, Condition::Present(&locator::search_box()), timings.login)
            .await
        {
            return Err(PortalError::LoginTimeout(timings.login));
        }

        log::info!("Portal login successful");
        Ok(SessionState::LoggedIn)
    }

    async fn login_form_present(&self, page: &dyn PortalPage) -> bool {
        let username = page.exists(&locator::username_field()).await.unwrap_or(false);
        let password = page.exists(&locator::password_field()).await.unwrap_or(false);
        username && password
    }

    /// Pick `county_name` in the searchable dropdown. Empty names are skipped.
    pub async fn select_county(
        &self,
        page: &dyn PortalPage,
        county_name: &str,
    ) -> Result<(), PortalError> {
        let wanted = county_name.trim();
        if wanted.is_empty() {
            return Ok(());
        }
        log::info!("Selecting county: {}", wanted);
        let timings = self.timings();

        let chip_close = locator::county_chip_close();
        if page.exists(&chip_close).await.unwrap_or(false) {
            match page.click(&chip_close).await {
                Ok(()) => self.sleeper.sleep(timings.chip_dismiss_pause).await,
                Err(e) => log::debug!("Could not dismiss previous county: {}", e),
            }
        }

        let dropdown = locator::county_dropdown();
        if !self
            .wait_for(page, Condition::Interactable(&dropdown), timings.dropdown)
            .await
        {
            return Err(PortalError::Timeout {
                what: "county dropdown".to_string(),
                timeout: timings.dropdown,
            });
        }
        page.click(&dropdown).await?;
        self.sleeper.sleep(timings.dropdown_open_pause).await;

        let results = locator::county_results();
        if !self
            .wait_for(page, Condition::Present(&results), timings.dropdown)
            .await
        {
            return Err(PortalError::Timeout {
                what: "county results".to_string(),
                timeout: timings.dropdown,
            });
        }

        let options = locator::county_options();
        for _ in 0..timings.county_scan_attempts {
            let texts = page.texts(&options).await.unwrap_or_default();
            if let Some(index) = texts.iter().position(|text| county_matches(text, wanted)) {
                let option = options.nth(index);
                page.scroll_into_view(&option).await?;
                self.sleeper.sleep(timings.option_scroll_pause).await;
                page.click(&option).await?;
                log::info!("County selected: {}", texts[index].trim());
                return Ok(());
            }

            if let Err(e) = page.scroll_by(&results, timings.results_scroll_step).await {
                log::debug!("Scrolling county results failed: {}", e);
            }
            self.sleeper.sleep(timings.results_scroll_pause).await;
        }

        Err(PortalError::CountyNotFound(wanted.to_string()))
    }

    /// Type the address into the search box and press SUBMIT.
    pub async fn submit_address(
        &self,
        page: &dyn PortalPage,
        full_address: &str,
    ) -> Result<(), PortalError> {
        log::info!("Submitting address: {}", full_address);
        let timings = self.timings();

        let search = locator::search_box();
        if !self
            .wait_for(page, Condition::Interactable(&search), timings.address_ready)
            .await
        {
            return Err(PortalError::Timeout {
                what: "address search box".to_string(),
                timeout: timings.address_ready,
            });
        }
        page.clear(&search).await?;
        page.type_text(&search, full_address).await?;
        self.sleeper.sleep(timings.suggestion_settle).await;

        let submit = locator::address_submit();
        if !self
            .wait_for(page, Condition::Interactable(&submit), timings.submit_ready)
            .await
        {
            return Err(PortalError::Timeout {
                what: "SUBMIT control".to_string(),
                timeout: timings.submit_ready,
            });
        }
        page.click(&submit).await?;
        self.sleeper.sleep(timings.result_settle).await;
        Ok(())
    }

    /// Read the cell next to the "Parcel ID" row header.
    pub async fn extract_parcel(&self, page: &dyn PortalPage) -> Result<Option<String>, PortalError> {
        let cell = locator::parcel_cell();
        if !self
            .wait_for(page, Condition::Present(&cell), self.timings().parcel)
            .await
        {
            log::warn!("Parcel ID cell did not appear");
            return Ok(None);
        }

        let raw = page.texts(&cell).await?.into_iter().next().unwrap_or_default();
        let parcel_id = normalize_parcel_text(&raw);
        if parcel_id.is_empty() {
            log::warn!("Parcel ID cell was empty");
            return Ok(None);
        }

        log::info!("Parcel ID found: {}", parcel_id);
        Ok(Some(parcel_id))
    }

    async fn check(&self, page: &dyn PortalPage, condition: &Condition<'_>) -> bool {
        let outcome = match condition {
            Condition::Present(target) => page.exists(target).await,
            Condition::Interactable(target) => page.is_interactable(target).await,
            Condition::Session(probe) => Ok(probe.detect(page).await),
        };
        outcome.unwrap_or_else(|e| {
            log::debug!("Wait condition check failed: {}", e);
            false
        })
    }

    async fn wait_for(
        &self,
        page: &dyn PortalPage,
        condition: Condition<'_>,
        timeout: Duration,
    ) -> bool {
        let poll = self.timings().poll_interval.max(Duration::from_millis(1));
        let attempts = (timeout.as_millis() / poll.as_millis()) as u64;

        for attempt in 0..=attempts {
            if self.check(page, &condition).await {
                return true;
            }
            if attempt < attempts {
                self.sleeper.sleep(poll).await;
            }
        }
        false
    }
}

/// Whether a dropdown option's visible text names the wanted county.
pub fn county_matches(option_text: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    !wanted.is_empty() && option_text.to_lowercase().contains(&wanted.to_lowercase())
}

/// Replace non-breaking spaces and trim.
pub fn normalize_parcel_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}
