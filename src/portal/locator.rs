//! DOM locators and the portal's fixed selectors.

use std::fmt;

/// Strategy used to find an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    Id(String),
    Css(String),
    XPath(String),
}

/// A DOM target: a selector plus which of its matches to act on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub by: By,
    pub index: usize,
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            by: By::Id(id.into()),
            index: 0,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            by: By::Css(selector.into()),
            index: 0,
        }
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self {
            by: By::XPath(expression.into()),
            index: 0,
        }
    }

    /// Same selector, targeting the `index`-th match (zero based).
    pub fn nth(&self, index: usize) -> Self {
        Self {
            by: self.by.clone(),
            index,
        }
    }

    /// The selector as a CSS query, if it can be expressed as one.
    pub fn as_css(&self) -> Option<String> {
        match &self.by {
            By::Id(id) => Some(format!("#{}", id)),
            By::Css(css) => Some(css.clone()),
            By::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.by {
            By::Id(id) => write!(f, "#{}", id)?,
            By::Css(css) => write!(f, "{}", css)?,
            By::XPath(xpath) => write!(f, "xpath:{}", xpath)?,
        }
        if self.index > 0 {
            write!(f, "[{}]", self.index)?;
        }
        Ok(())
    }
}

pub fn search_box() -> Locator {
    Locator::id("Main_searchText")
}

pub fn county_dropdown() -> Locator {
    Locator::css(".select2-container")
}

pub fn county_chip_close() -> Locator {
    Locator::css("a.select2-search-choice-close")
}

pub fn county_results() -> Locator {
    Locator::css(".select2-results")
}

/// Option labels only; wrapper elements would report their children's text.
pub fn county_options() -> Locator {
    Locator::css(".select2-results div.select2-result-label")
}

pub fn username_field() -> Locator {
    Locator::id("UserName")
}

pub fn password_field() -> Locator {
    Locator::id("Password")
}

pub fn login_submit() -> Locator {
    Locator::xpath("//input[@type='submit' and contains(@value,'Log')]")
}

pub fn address_submit() -> Locator {
    Locator::xpath("//em[normalize-space()='SUBMIT']/ancestor::*[self::button or self::a]")
}

pub fn parcel_cell() -> Locator {
    Locator::xpath("//th[contains(text(), 'Parcel ID')]/following-sibling::td[1]//span")
}
