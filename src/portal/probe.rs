//! Evidence that the browser already holds an authenticated portal session.

use async_trait::async_trait;

use super::locator::{self, Locator};
use super::page::PortalPage;

/// A single-shot check for an authenticated session.
#[async_trait]
pub trait SessionProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn detect(&self, page: &dyn PortalPage) -> bool;
}

async fn present(page: &dyn PortalPage, target: &Locator) -> bool {
    match page.exists(target).await {
        Ok(found) => found,
        Err(e) => {
            log::debug!("Session probe on {} failed: {}", target, e);
            false
        }
    }
}

/// The address search box is only rendered for signed-in users.
#[derive(Debug, Default)]
pub struct SearchBoxProbe;

#[async_trait]
impl SessionProbe for SearchBoxProbe {
    fn name(&self) -> &str {
        "search-box"
    }

    async fn detect(&self, page: &dyn PortalPage) -> bool {
        present(page, &locator::search_box()).await
    }
}

/// The county dropdown widget is only rendered for signed-in users.
#[derive(Debug, Default)]
pub struct DropdownProbe;

#[async_trait]
impl SessionProbe for DropdownProbe {
    fn name(&self) -> &str {
        "county-dropdown"
    }

    async fn detect(&self, page: &dyn PortalPage) -> bool {
        present(page, &locator::county_dropdown()).await
    }
}

/// Succeeds when any of its probes succeeds.
pub struct AnyProbe {
    probes: Vec<Box<dyn SessionProbe>>,
}

impl AnyProbe {
    pub fn new(probes: Vec<Box<dyn SessionProbe>>) -> Self {
        Self { probes }
    }

    /// Search box or dropdown.
    pub fn portal_default() -> Self {
        Self::new(vec![Box::new(SearchBoxProbe), Box::new(DropdownProbe)])
    }
}

#[async_trait]
impl SessionProbe for AnyProbe {
    fn name(&self) -> &str {
        "any-of"
    }

    async fn detect(&self, page: &dyn PortalPage) -> bool {
        for probe in &self.probes {
            if probe.detect(page).await {
                log::debug!("Session detected by {} probe", probe.name());
                return true;
            }
        }
        false
    }
}
