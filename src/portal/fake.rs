//! Scripted in-memory page for exercising the portal flow without a browser.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::locator::{By, Locator};
use super::page::PortalPage;
use super::PortalError;

#[derive(Debug, Clone)]
struct FakeElement {
    text: String,
    interactable: bool,
}

type Reaction = Vec<(By, Vec<String>)>;

#[derive(Default)]
pub struct FakePage {
    dom: Mutex<HashMap<By, Vec<FakeElement>>>,
    values: Mutex<HashMap<By, String>>,
    on_click: Mutex<HashMap<By, Reaction>>,
    on_goto: Mutex<HashMap<String, Reaction>>,
    on_scroll: Mutex<VecDeque<(By, String)>>,
    actions: Mutex<Vec<String>>,
    closed: Arc<AtomicBool>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, target: &Locator, texts: &[&str]) {
        let mut dom = self.dom.lock();
        let entry = dom.entry(target.by.clone()).or_default();
        entry.extend(texts.iter().map(|t| FakeElement {
            text: t.to_string(),
            interactable: true,
        }));
    }

    pub fn add_disabled(&self, target: &Locator) {
        self.dom
            .lock()
            .entry(target.by.clone())
            .or_default()
            .push(FakeElement {
                text: String::new(),
                interactable: false,
            });
    }

    /// Clicking `target` makes `revealed` appear with the given texts.
    pub fn when_clicked(&self, target: &Locator, revealed: &Locator, texts: &[&str]) {
        self.on_click
            .lock()
            .entry(target.by.clone())
            .or_default()
            .push((revealed.by.clone(), texts.iter().map(|t| t.to_string()).collect()));
    }

    /// Navigating to `url` makes `revealed` appear with the given texts.
    pub fn when_visited(&self, url: &str, revealed: &Locator, texts: &[&str]) {
        self.on_goto
            .lock()
            .entry(url.to_string())
            .or_default()
            .push((revealed.by.clone(), texts.iter().map(|t| t.to_string()).collect()));
    }

    /// Each scroll appends the next queued option to `target`.
    pub fn when_scrolled(&self, target: &Locator, texts: &[&str]) {
        let mut queue = self.on_scroll.lock();
        for text in texts {
            queue.push_back((target.by.clone(), text.to_string()));
        }
    }

    /// Setting the returned flag makes the page report a dead connection.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    pub fn did(&self, action: &str) -> bool {
        self.actions.lock().iter().any(|a| a == action)
    }

    pub fn value(&self, target: &Locator) -> Option<String> {
        self.values.lock().get(&target.by).cloned()
    }

    fn record(&self, action: String) {
        self.actions.lock().push(action);
    }

    fn reveal(&self, reaction: Reaction) {
        let mut dom = self.dom.lock();
        for (by, texts) in reaction {
            dom.entry(by).or_default().extend(texts.into_iter().map(|text| FakeElement {
                text,
                interactable: true,
            }));
        }
    }

    fn element(&self, target: &Locator) -> Result<FakeElement, PortalError> {
        self.dom
            .lock()
            .get(&target.by)
            .and_then(|els| els.get(target.index))
            .cloned()
            .ok_or_else(|| PortalError::Browser(format!("no element {}", target)))
    }
}

#[async_trait]
impl PortalPage for FakePage {
    async fn is_alive(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    async fn goto(&self, url: &str) -> Result<(), PortalError> {
        self.record(format!("goto:{}", url));
        let reaction = self.on_goto.lock().get(url).cloned();
        if let Some(reaction) = reaction {
            self.reveal(reaction);
        }
        Ok(())
    }

    async fn count(&self, target: &Locator) -> Result<usize, PortalError> {
        Ok(self.dom.lock().get(&target.by).map_or(0, |els| els.len()))
    }

    async fn is_interactable(&self, target: &Locator) -> Result<bool, PortalError> {
        Ok(self.element(target).map(|el| el.interactable).unwrap_or(false))
    }

    async fn click(&self, target: &Locator) -> Result<(), PortalError> {
        self.element(target)?;
        self.record(format!("click:{}", target));
        let reaction = self.on_click.lock().get(&target.by).cloned();
        if let Some(reaction) = reaction {
            self.reveal(reaction);
        }
        Ok(())
    }

    async fn clear(&self, target: &Locator) -> Result<(), PortalError> {
        self.element(target)?;
        self.record(format!("clear:{}", target));
        self.values.lock().remove(&target.by);
        Ok(())
    }

    async fn type_text(&self, target: &Locator, text: &str) -> Result<(), PortalError> {
        self.element(target)?;
        self.record(format!("type:{}:{}", target, text));
        self.values
            .lock()
            .entry(target.by.clone())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn texts(&self, target: &Locator) -> Result<Vec<String>, PortalError> {
        Ok(self
            .dom
            .lock()
            .get(&target.by)
            .map(|els| els.iter().map(|el| el.text.clone()).collect())
            .unwrap_or_default())
    }

    async fn scroll_into_view(&self, target: &Locator) -> Result<(), PortalError> {
        self.element(target)?;
        self.record(format!("scroll_into_view:{}", target));
        Ok(())
    }

    async fn scroll_by(&self, target: &Locator, pixels: i64) -> Result<(), PortalError> {
        self.element(target)?;
        self.record(format!("scroll_by:{}:{}", target, pixels));
        let next = self.on_scroll.lock().pop_front();
        if let Some((by, text)) = next {
            self.dom.lock().entry(by).or_default().push(FakeElement {
                text,
                interactable: true,
            });
        }
        Ok(())
    }
}
