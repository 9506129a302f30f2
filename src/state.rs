//! Shared application state handed to every handler.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::delivery::{Archiver, Mailer, SmtpMailer};
use crate::portal::{ChromeLauncher, PortalDriver, PortalHandle, TokioSleeper};
use crate::report::EngagementLetterGenerator;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<HashMap<String, String>>,
    pub portal: PortalHandle,
    pub reports: Arc<EngagementLetterGenerator>,
    pub archive: Arc<Archiver>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    /// Build production state. Must run inside the Tokio runtime since it
    /// spawns the portal worker.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let reports = EngagementLetterGenerator::new(
            &config.template_path,
            &config.reports_dir,
            &config.typst_bin,
        )
        .with_context(|| format!("failed to load template {}", config.template_path.display()))?;

        let driver = PortalDriver::new(config.portal.clone(), Arc::new(TokioSleeper));
        let portal = PortalHandle::spawn(ChromeLauncher::new(config.launch.clone()), driver);

        let mailer: Option<Arc<dyn Mailer>> = match &config.mail {
            Some(settings) => match SmtpMailer::new(settings) {
                Ok(mailer) => Some(Arc::new(mailer)),
                Err(e) => {
                    log::error!("SMTP relay {} unusable, email disabled: {}", settings.host, e);
                    None
                }
            },
            None => {
                log::warn!("SMTP settings incomplete; letters will be archived but not emailed");
                None
            }
        };

        if config.users.is_empty() {
            log::warn!("APP_USERS is empty; every login will be rejected");
        }

        Ok(Self {
            users: Arc::new(config.users.clone()),
            portal,
            reports: Arc::new(reports),
            archive: Arc::new(Archiver::new(&config.archive_root, &config.reports_dir)),
            mailer,
        })
    }

    /// Credential check against the fixed user table.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}
