use async_trait::async_trait;

use super::locator::Locator;
use super::PortalError;

/// Browser operations the portal flow needs from a live page.
///
/// Every method re-resolves its locator, so no element handle outlives a
/// navigation. Element-level methods act on `locator.index`-th match and
/// fail with [`PortalError::Browser`] when it does not exist.
#[async_trait]
pub trait PortalPage: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), PortalError>;

    /// Number of elements currently matching the selector.
    async fn count(&self, locator: &Locator) -> Result<usize, PortalError>;

    /// Whether the targeted element is displayed and enabled.
    async fn is_interactable(&self, locator: &Locator) -> Result<bool, PortalError>;

    async fn click(&self, locator: &Locator) -> Result<(), PortalError>;

    async fn clear(&self, locator: &Locator) -> Result<(), PortalError>;

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), PortalError>;

    /// Visible text of every match, in document order.
    async fn texts(&self, locator: &Locator) -> Result<Vec<String>, PortalError>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), PortalError>;

    /// Scroll the targeted container's content vertically by `pixels`.
    async fn scroll_by(&self, locator: &Locator, pixels: i64) -> Result<(), PortalError>;

    /// Whether the underlying browser connection still answers.
    async fn is_alive(&self) -> bool {
        true
    }

    async fn exists(&self, locator: &Locator) -> Result<bool, PortalError> {
        Ok(self.count(locator).await? > locator.index)
    }
}
