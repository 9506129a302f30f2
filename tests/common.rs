#![allow(dead_code)]

use appraisal_engagement_server::delivery::{Archiver, MailError, Mailer, OutgoingMail};
use appraisal_engagement_server::portal::{
    locator, By, Locator, PortalCredentials, PortalDriver, PortalError, PortalHandle, PortalPage,
    PortalSettings, SessionFactory, Sleeper,
};
use appraisal_engagement_server::report::EngagementLetterGenerator;
use appraisal_engagement_server::AppState;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tempfile::TempDir;

/// Sleeper that never waits.
pub struct NoSleep;

#[async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Page whose DOM never changes. Every element is interactable.
pub struct StaticPage {
    elements: HashMap<By, Vec<String>>,
    typed: Mutex<Vec<String>>,
}

impl StaticPage {
    fn texts_of(&self, locator: &Locator) -> Vec<String> {
        self.elements.get(&locator.by).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PortalPage for StaticPage {
    async fn goto(&self, _url: &str) -> Result<(), PortalError> {
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, PortalError> {
        Ok(self.texts_of(locator).len())
    }

    async fn is_interactable(&self, locator: &Locator) -> Result<bool, PortalError> {
        self.exists(locator).await
    }

    async fn click(&self, locator: &Locator) -> Result<(), PortalError> {
        if self.exists(locator).await? {
            Ok(())
        } else {
            Err(PortalError::Browser(format!("no element {}", locator)))
        }
    }

    async fn clear(&self, _locator: &Locator) -> Result<(), PortalError> {
        Ok(())
    }

    async fn type_text(&self, _locator: &Locator, text: &str) -> Result<(), PortalError> {
        self.typed.lock().push(text.to_string());
        Ok(())
    }

    async fn texts(&self, locator: &Locator) -> Result<Vec<String>, PortalError> {
        Ok(self.texts_of(locator))
    }

    async fn scroll_into_view(&self, _locator: &Locator) -> Result<(), PortalError> {
        Ok(())
    }

    async fn scroll_by(&self, _locator: &Locator, _pixels: i64) -> Result<(), PortalError> {
        Ok(())
    }
}

/// What the fake portal shows after a search.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PortalScript {
    /// Logged in, county list present, parcel row rendered.
    ParcelFound,
    /// Logged in, but the result page has no parcel row.
    NoParcel,
    /// Browser session cannot be created.
    LaunchFails,
}

pub struct FakeSessionFactory {
    pub script: PortalScript,
    pub created: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    type Page = StaticPage;

    async fn create(&self) -> Result<StaticPage, PortalError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        if self.script == PortalScript::LaunchFails {
            return Err(PortalError::DriverMissing("/missing/chromedriver".into()));
        }

        let mut elements = HashMap::new();
        let mut put = |target: Locator, texts: &[&str]| {
            elements.insert(target.by, texts.iter().map(|t| t.to_string()).collect());
        };
        put(locator::search_box(), &[""]);
        put(locator::county_dropdown(), &["Select county"]);
        put(locator::county_results(), &[""]);
        put(
            locator::county_options(),
            &["Davidson County, TN", "Shelby County, TN"],
        );
        put(locator::address_submit(), &["SUBMIT"]);
        if self.script == PortalScript::ParcelFound {
            put(locator::parcel_cell(), &["072\u{a0}001  00012"]);
        }

        Ok(StaticPage {
            elements,
            typed: Mutex::new(Vec::new()),
        })
    }
}

/// Records every mail handed to it.
#[derive(Default)]
pub struct MockMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".into()));
        }
        self.sent.lock().push(mail);
        Ok(())
    }
}

/// Converter stand-in that copies the Typst source to the PDF path.
#[cfg(unix)]
pub fn copying_converter() -> &'static Path {
    static SCRIPT: OnceLock<PathBuf> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap().keep();
        let path = dir.join("fake-typst");
        std::fs::write(&path, "#!/bin/sh\ncp \"$2\" \"$3\"\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}

pub struct TestApp {
    pub state: AppState,
    pub reports: TempDir,
    pub archive: TempDir,
    pub mailer: Option<Arc<MockMailer>>,
    pub sessions_created: Arc<AtomicUsize>,
}

pub struct TestAppBuilder {
    script: PortalScript,
    converter: PathBuf,
    mailer: Option<MockMailer>,
    users: Vec<(&'static str, &'static str)>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            script: PortalScript::ParcelFound,
            converter: PathBuf::from("false"),
            mailer: Some(MockMailer::default()),
            users: vec![("alice", "pw1"), ("bob", "pw2")],
        }
    }

    pub fn portal(mut self, script: PortalScript) -> Self {
        self.script = script;
        self
    }

    pub fn converter(mut self, converter: impl Into<PathBuf>) -> Self {
        self.converter = converter.into();
        self
    }

    pub fn without_mail(mut self) -> Self {
        self.mailer = None;
        self
    }

    pub fn failing_mail(mut self) -> Self {
        self.mailer = Some(MockMailer {
            fail: true,
            ..Default::default()
        });
        self
    }

    /// Must be called inside the Tokio runtime.
    pub fn build(self) -> TestApp {
        let reports = tempfile::tempdir().unwrap();
        let archive = tempfile::tempdir().unwrap();
        let sessions_created = Arc::new(AtomicUsize::new(0));

        let settings = PortalSettings {
            credentials: Some(PortalCredentials {
                username: "appraiser".into(),
                password: "secret".into(),
            }),
            ..Default::default()
        };
        let portal = PortalHandle::spawn(
            FakeSessionFactory {
                script: self.script,
                created: sessions_created.clone(),
            },
            PortalDriver::new(settings, Arc::new(NoSleep)),
        );

        let generator =
            EngagementLetterGenerator::with_bundled_template(reports.path(), &self.converter)
                .unwrap();

        let mailer = self.mailer.map(Arc::new);
        let state = AppState {
            users: Arc::new(
                self.users
                    .iter()
                    .map(|(u, p)| (u.to_string(), p.to_string()))
                    .collect(),
            ),
            portal,
            reports: Arc::new(generator),
            archive: Arc::new(Archiver::new(archive.path(), reports.path())),
            mailer: mailer.clone().map(|m| m as Arc<dyn Mailer>),
        };

        TestApp {
            state,
            reports,
            archive,
            mailer,
            sessions_created,
        }
    }
}
