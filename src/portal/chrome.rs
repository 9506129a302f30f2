//! Live browser session over the Chrome DevTools Protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

use super::locator::{By, Locator};
use super::page::PortalPage;
use super::worker::SessionFactory;
use super::PortalError;

const INTERACTABLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const s = window.getComputedStyle(this); \
    return !this.disabled && r.width > 0 && r.height > 0 \
        && s.visibility !== 'hidden' && s.display !== 'none'; }";

const CLEAR_JS: &str = "function() { \
    this.value = ''; \
    this.dispatchEvent(new Event('input', { bubbles: true })); }";

/// Browser launch parameters.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    /// Automation driver binary; must exist before a session is created.
    pub driver_path: Option<PathBuf>,
    /// Browser to launch; chromiumoxide locates an installed Chrome when unset.
    pub browser_binary: Option<PathBuf>,
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
}

impl LaunchConfig {
    /// The driver binary, or [`PortalError::DriverMissing`].
    pub fn validated_driver(&self) -> Result<PathBuf, PortalError> {
        match &self.driver_path {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(PortalError::DriverMissing(path.display().to_string())),
            None => Err(PortalError::DriverMissing("CHROMEDRIVER_PATH not set".to_string())),
        }
    }

    /// Explicit browser executable, if configured. Never the driver binary.
    pub fn browser_executable(&self) -> Option<&Path> {
        self.browser_binary.as_deref()
    }
}

/// Launches the browser behind [`ChromeSession`].
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: LaunchConfig,
}

impl ChromeLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, PortalError> {
        let mut builder = BrowserConfig::builder()
            .arg("--start-maximized")
            .arg("--disable-blink-features=AutomationControlled");

        if let Some(executable) = self.config.browser_executable() {
            builder = builder.chrome_executable(executable);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(profile) = &self.config.profile_dir {
            builder = builder.user_data_dir(profile);
        }

        builder.build().map_err(PortalError::Launch)
    }
}

#[async_trait]
impl SessionFactory for ChromeLauncher {
    type Page = ChromeSession;

    async fn create(&self) -> Result<ChromeSession, PortalError> {
        let driver = self.config.validated_driver()?;
        log::debug!("Browser driver found at {}", driver.display());
        let config = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PortalError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    log::debug!("Browser event loop ended");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PortalError::Launch(e.to_string()))?;

        log::info!("Portal browser session launched");
        Ok(ChromeSession {
            _browser: browser,
            page,
            handler: handler_task,
        })
    }
}

/// One browser tab kept open for the life of the process.
pub struct ChromeSession {
    _browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

fn browser_err(e: impl std::fmt::Display) -> PortalError {
    PortalError::Browser(e.to_string())
}

impl ChromeSession {
    /// All matches; lookup failures count as no match.
    async fn resolve_all(&self, target: &Locator) -> Vec<Element> {
        let found = match &target.by {
            By::XPath(xpath) => self.page.find_xpaths(xpath.as_str()).await,
            _ => match target.as_css() {
                Some(css) => self.page.find_elements(css).await,
                None => Ok(Vec::new()),
            },
        };
        found.unwrap_or_else(|e| {
            log::debug!("Lookup of {} failed: {}", target, e);
            Vec::new()
        })
    }

    async fn resolve(&self, target: &Locator) -> Result<Element, PortalError> {
        self.resolve_all(target)
            .await
            .into_iter()
            .nth(target.index)
            .ok_or_else(|| PortalError::Browser(format!("element {} not found", target)))
    }
}

#[async_trait]
impl PortalPage for ChromeSession {
    async fn is_alive(&self) -> bool {
        if self.handler.is_finished() {
            return false;
        }
        self.page.url().await.is_ok()
    }

    async fn goto(&self, url: &str) -> Result<(), PortalError> {
        log::debug!("Navigating to {}", url);
        self.page.goto(url).await.map_err(browser_err)?;
        Ok(())
    }

    async fn count(&self, target: &Locator) -> Result<usize, PortalError> {
        Ok(self.resolve_all(target).await.len())
    }

    async fn is_interactable(&self, target: &Locator) -> Result<bool, PortalError> {
        let element = match self.resolve(target).await {
            Ok(element) => element,
            Err(_) => return Ok(false),
        };
        let returns = element
            .call_js_fn(INTERACTABLE_JS, false)
            .await
            .map_err(browser_err)?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn click(&self, target: &Locator) -> Result<(), PortalError> {
        self.resolve(target).await?.click().await.map_err(browser_err)?;
        Ok(())
    }

    async fn clear(&self, target: &Locator) -> Result<(), PortalError> {
        self.resolve(target)
            .await?
            .call_js_fn(CLEAR_JS, false)
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    async fn type_text(&self, target: &Locator, text: &str) -> Result<(), PortalError> {
        let element = self.resolve(target).await?;
        element.click().await.map_err(browser_err)?;
        element.type_str(text).await.map_err(browser_err)?;
        Ok(())
    }

    async fn texts(&self, target: &Locator) -> Result<Vec<String>, PortalError> {
        let mut texts = Vec::new();
        for element in self.resolve_all(target).await {
            let text = element.inner_text().await.map_err(browser_err)?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn scroll_into_view(&self, target: &Locator) -> Result<(), PortalError> {
        self.resolve(target)
            .await?
            .scroll_into_view()
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    async fn scroll_by(&self, target: &Locator, pixels: i64) -> Result<(), PortalError> {
        let script = format!("function() {{ this.scrollTop += {}; }}", pixels);
        self.resolve(target)
            .await?
            .call_js_fn(script, false)
            .await
            .map_err(browser_err)?;
        Ok(())
    }
}
