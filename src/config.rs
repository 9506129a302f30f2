//! Process configuration, read once at startup.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::delivery::MailSettings;
use crate::portal::{LaunchConfig, PortalCredentials, PortalSettings};
use crate::report::common::get_static_dir;
use crate::report::generator::TEMPLATE_FILE;

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub users: HashMap<String, String>,
    pub portal: PortalSettings,
    pub launch: LaunchConfig,
    pub reports_dir: PathBuf,
    pub template_path: PathBuf,
    pub typst_bin: PathBuf,
    pub archive_root: PathBuf,
    pub mail: Option<MailSettings>,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let path_or = |key: &str, default: PathBuf| get(key).map(PathBuf::from).unwrap_or(default);

        let port = match get("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT value {:?}", raw))?,
            None => 8080,
        };

        let mut portal = PortalSettings::default();
        if let Some(url) = get("CRS_LANDING_URL") {
            portal.landing_url = url;
        }
        if let Some(url) = get("CRS_LOGIN_URL") {
            portal.login_url = url;
        }
        // Passwords are taken verbatim; only the username is trimmed.
        portal.credentials = match (get("CRS_USERNAME"), lookup("CRS_PASSWORD")) {
            (Some(username), Some(password)) if !password.is_empty() => {
                Some(PortalCredentials { username, password })
            }
            _ => None,
        };

        let launch = LaunchConfig {
            driver_path: get("CHROMEDRIVER_PATH").map(PathBuf::from),
            browser_binary: get("CHROME_BINARY").map(PathBuf::from),
            profile_dir: get("CHROME_PROFILE").map(PathBuf::from),
            headless: get("BROWSER_HEADLESS").is_some_and(|v| parse_flag(&v)),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            users: get("APP_USERS").map(|raw| parse_users(&raw)).unwrap_or_default(),
            portal,
            launch,
            reports_dir: path_or("REPORTS_DIR", PathBuf::from("./reports")),
            template_path: path_or("TEMPLATE_PATH", get_static_dir().join(TEMPLATE_FILE)),
            typst_bin: path_or("TYPST_BIN", PathBuf::from("typst")),
            archive_root: path_or("ARCHIVE_ROOT", PathBuf::from("./archive")),
            mail: mail_settings(&get, lookup("SMTP_PASS")),
        })
    }
}

fn mail_settings<G>(get: &G, password: Option<String>) -> Option<MailSettings>
where
    G: Fn(&str) -> Option<String>,
{
    let host = get("SMTP_HOST")?;
    let raw_port = get("SMTP_PORT")?;
    let username = get("SMTP_USER")?;
    let password = password.filter(|p| !p.is_empty())?;
    let from = get("SMTP_FROM")?;

    let port = match raw_port.parse() {
        Ok(port) => port,
        Err(_) => {
            log::error!("SMTP_PORT {:?} is not a valid port; email is disabled", raw_port);
            return None;
        }
    };

    Some(MailSettings {
        host,
        port,
        username,
        password,
        from,
    })
}

/// `user:password` pairs separated by commas.
pub fn parse_users(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (user, password) = pair.split_once(':')?;
            let (user, password) = (user.trim(), password.trim());
            (!user.is_empty() && !password.is_empty())
                .then(|| (user.to_string(), password.to_string()))
        })
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
