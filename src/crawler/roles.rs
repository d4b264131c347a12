//! Structural-role lookup for result pages
//!
//! Extraction code asks for elements by what they mean ("the card's name",
//! "the page's containers") instead of by class names. [`CssRoleSelector`]
//! maps each [`Role`] to a compiled CSS selector taken from configuration, so
//! a site redesign only touches the selector strings.

use crate::config::SelectorConfig;
use crate::ScoutError;
use scraper::{ElementRef, Selector};
use std::fmt;

/// A stable position in the result-page markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Result-set heading (first page only)
    Title,
    /// Region grouping one or more cards
    Container,
    /// One company
    Card,
    /// Company name inside a card
    Name,
    /// Generic info line (employees, founding year, location)
    Info,
    /// ESG country risk rating
    Risk,
    /// Free-text description
    Description,
    /// Link into the company detail page
    DetailLink,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Container => "container",
            Self::Card => "card",
            Self::Name => "name",
            Self::Info => "info",
            Self::Risk => "risk",
            Self::Description => "description",
            Self::DetailLink => "detail-link",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finds descendants of a node by structural role
pub trait RoleSelector: Send + Sync {
    /// All descendants of `node` playing `role`, in document order
    fn find_all<'a>(&self, node: ElementRef<'a>, role: Role) -> Vec<ElementRef<'a>>;

    /// The first descendant of `node` playing `role`
    fn find_first<'a>(&self, node: ElementRef<'a>, role: Role) -> Option<ElementRef<'a>> {
        self.find_all(node, role).into_iter().next()
    }
}

/// [`RoleSelector`] backed by compiled CSS selectors
#[derive(Debug, Clone)]
pub struct CssRoleSelector {
    title: Selector,
    container: Selector,
    card: Selector,
    name: Selector,
    info: Selector,
    risk: Selector,
    description: Selector,
    detail_link: Selector,
}

impl CssRoleSelector {
    /// Compiles every selector in the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CssRoleSelector)` - All selectors compiled
    /// * `Err(ScoutError::Selector)` - The first selector that failed to compile
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ScoutError> {
        Ok(Self {
            title: compile(Role::Title, &config.title)?,
            container: compile(Role::Container, &config.container)?,
            card: compile(Role::Card, &config.card)?,
            name: compile(Role::Name, &config.name)?,
            info: compile(Role::Info, &config.info)?,
            risk: compile(Role::Risk, &config.risk)?,
            description: compile(Role::Description, &config.description)?,
            detail_link: compile(Role::DetailLink, &config.detail_link)?,
        })
    }

    /// Selectors for the current ensun.io markup
    pub fn ensun() -> Result<Self, ScoutError> {
        Self::from_config(&SelectorConfig::default())
    }

    fn selector(&self, role: Role) -> &Selector {
        match role {
            Role::Title => &self.title,
            Role::Container => &self.container,
            Role::Card => &self.card,
            Role::Name => &self.name,
            Role::Info => &self.info,
            Role::Risk => &self.risk,
            Role::Description => &self.description,
            Role::DetailLink => &self.detail_link,
        }
    }
}

impl RoleSelector for CssRoleSelector {
    fn find_all<'a>(&self, node: ElementRef<'a>, role: Role) -> Vec<ElementRef<'a>> {
        node.select(self.selector(role)).collect()
    }

    fn find_first<'a>(&self, node: ElementRef<'a>, role: Role) -> Option<ElementRef<'a>> {
        node.select(self.selector(role)).next()
    }
}

fn compile(role: Role, selector: &str) -> Result<Selector, ScoutError> {
    Selector::parse(selector).map_err(|e| ScoutError::Selector {
        role: role.to_string(),
        message: format!("'{}': {:?}", selector, e),
    })
}
