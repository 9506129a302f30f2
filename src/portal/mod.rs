//! Portal Session Driver.
//!
//! Scripts the county-records portal through one long-lived browser session:
//! session assurance (login only when required), county selection, address
//! submission and parcel extraction. The session is owned by a single worker
//! task so concurrent HTTP requests are serialized instead of interleaving on
//! the same browser tab.

pub mod chrome;
pub mod clock;
pub mod driver;
pub mod handlers;
pub mod locator;
pub mod model;
pub mod page;
pub mod probe;
pub mod worker;

#[cfg(test)]
mod fake;

pub use chrome::{ChromeLauncher, ChromeSession, LaunchConfig};
pub use clock::{Sleeper, TokioSleeper};
pub use driver::{PortalCredentials, PortalDriver, PortalSettings, PortalTimings, SessionState};
pub use handlers::config;
pub use locator::{By, Locator};
pub use model::{ParcelLookupRequest, ParcelQuery, ParcelResponse};
pub use page::PortalPage;
pub use probe::{AnyProbe, DropdownProbe, SearchBoxProbe, SessionProbe};
pub use worker::{PortalHandle, SessionFactory};

use std::time::Duration;
use thiserror::Error;

/// Errors raised while scripting the portal.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("browser driver binary missing or invalid: {0}")]
    DriverMissing(String),
    #[error("failed to launch browser session: {0}")]
    Launch(String),
    #[error("portal credentials missing")]
    CredentialsMissing,
    #[error("portal worker is not running")]
    WorkerUnavailable,
    #[error("login not confirmed within {0:?}")]
    LoginTimeout(Duration),
    #[error("county not found: {0}")]
    CountyNotFound(String),
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
    #[error("browser command failed: {0}")]
    Browser(String),
}

impl PortalError {
    /// Setup failures abort the request; everything else is a scoped lookup failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PortalError::DriverMissing(_)
                | PortalError::Launch(_)
                | PortalError::CredentialsMissing
                | PortalError::WorkerUnavailable
        )
    }
}
