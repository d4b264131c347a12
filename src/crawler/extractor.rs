//! Company-card extraction
//!
//! This module turns result-page markup into [`CompanyRecord`]s:
//! - `parse_card` reads one card into a [`PartialCompany`]
//! - `parse_container` validates and completes every card in a container
//! - `parse_document` runs a whole page (title, containers, cards)
//!
//! Info lines (employee count, founding year, location) share one markup
//! role and are told apart by content alone, using [`INFO_RULES`].

use crate::crawler::roles::{Role, RoleSelector};
use crate::record::{CompanyRecord, PartialCompany};
use crate::url::{is_company_link, resolve_detail_url};
use scraper::{ElementRef, Html};
use url::Url;

/// Suffix that marks an employee-count info line
pub const EMPLOYEES_SUFFIX: &str = " Employees";

/// Card fields that info lines can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    Employee,
    FoundingYear,
    Location,
}

/// One content-shape rule for info lines
///
/// `classify` returns the value to store when the text has the rule's shape.
#[derive(Debug, Clone, Copy)]
pub struct InfoRule {
    pub field: InfoField,
    pub classify: fn(&str) -> Option<String>,
}

/// Info-line rules, tried in order
///
/// A text belongs to the first rule whose shape matches. If that rule's
/// field is already claimed on the card the text is dropped; it never falls
/// through to a later rule.
pub const INFO_RULES: &[InfoRule] = &[
    InfoRule {
        field: InfoField::Employee,
        classify: employee_count,
    },
    InfoRule {
        field: InfoField::FoundingYear,
        classify: founding_year,
    },
    InfoRule {
        field: InfoField::Location,
        classify: location,
    },
];

fn employee_count(text: &str) -> Option<String> {
    text.strip_suffix(EMPLOYEES_SUFFIX).map(str::to_string)
}

fn founding_year(text: &str) -> Option<String> {
    let is_year = text.chars().count() == 4 && text.chars().all(|c| c.is_ascii_digit());
    is_year.then(|| text.to_string())
}

fn location(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn info_slot(company: &mut PartialCompany, field: InfoField) -> &mut Option<String> {
    match field {
        InfoField::Employee => &mut company.employee,
        InfoField::FoundingYear => &mut company.founding_year,
        InfoField::Location => &mut company.location,
    }
}

/// Assigns info lines to card fields using [`INFO_RULES`]
///
/// Empty texts are skipped. Each field is claimed at most once, by the
/// first text of its shape.
pub fn classify_info_texts<'t, I>(texts: I, company: &mut PartialCompany)
where
    I: IntoIterator<Item = &'t str>,
{
    for text in texts {
        if text.is_empty() {
            continue;
        }

        let matched = INFO_RULES
            .iter()
            .find_map(|rule| (rule.classify)(text).map(|value| (rule.field, value)));

        if let Some((field, value)) = matched {
            let slot = info_slot(company, field);
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }
}

/// Text of an element with each text node trimmed and empty nodes dropped
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Reads one card into a partial record
///
/// # Field Rules
///
/// | Field | Source |
/// |-------|--------|
/// | Company Name | name role; else the detail link's text |
/// | Detail URL | first detail link with a `/company/` path, made absolute |
/// | Description | description role, trimmed at the edges |
/// | ESG Country Risk | risk role |
/// | Employee / Founding Year / Location | info role, see [`INFO_RULES`] |
pub fn parse_card(card: ElementRef<'_>, roles: &dyn RoleSelector, base: &Url) -> PartialCompany {
    let mut company = PartialCompany {
        company_name: roles
            .find_first(card, Role::Name)
            .map(element_text)
            .and_then(non_empty),
        ..Default::default()
    };

    let info_texts: Vec<String> = roles
        .find_all(card, Role::Info)
        .into_iter()
        .map(element_text)
        .collect();
    classify_info_texts(info_texts.iter().map(String::as_str), &mut company);

    company.esg_country_risk = roles
        .find_first(card, Role::Risk)
        .map(element_text)
        .and_then(non_empty);

    let detail_link = roles
        .find_all(card, Role::DetailLink)
        .into_iter()
        .find(|link| link.value().attr("href").is_some_and(is_company_link));
    if let Some(link) = detail_link {
        company.detail_url = link
            .value()
            .attr("href")
            .and_then(|href| resolve_detail_url(base, href));
        if company.company_name.is_none() {
            company.company_name = non_empty(element_text(link));
        }
    }

    company.description = roles
        .find_first(card, Role::Description)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .and_then(non_empty);

    company
}

/// Records extracted from one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerParse {
    /// Valid records, in card order
    pub companies: Vec<CompanyRecord>,

    /// Cards dropped for lack of a name
    pub skipped: usize,
}

impl ContainerParse {
    /// Number of cards seen in the container
    pub fn cards(&self) -> usize {
        self.companies.len() + self.skipped
    }
}

/// Parses every card beneath a container
///
/// Cards without a usable name are dropped and counted in `skipped`; this is
/// validation, not an error.
pub fn parse_container(
    container: ElementRef<'_>,
    roles: &dyn RoleSelector,
    base: &Url,
) -> ContainerParse {
    let cards = roles.find_all(container, Role::Card);
    tracing::debug!("Found {} company cards", cards.len());

    let mut parsed = ContainerParse::default();
    for card in cards {
        match parse_card(card, roles, base).into_record() {
            Some(record) => {
                tracing::debug!(
                    "Parsed company {}: {} | location: {} | employees: {} | founded: {} | ESG risk: {}",
                    parsed.companies.len() + 1,
                    record.company_name,
                    record.location,
                    record.employee,
                    record.founding_year,
                    record.esg_country_risk
                );
                parsed.companies.push(record);
            }
            None => parsed.skipped += 1,
        }
    }

    if parsed.skipped > 0 {
        tracing::debug!("Skipped {} unnamed company cards", parsed.skipped);
    }

    parsed
}

/// Everything extracted from one result page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Result-set heading, if present
    pub title: Option<String>,

    /// Number of card containers found
    pub containers: usize,

    /// Valid records across all containers, in document order
    pub companies: Vec<CompanyRecord>,

    /// Cards dropped for lack of a name
    pub skipped: usize,
}

/// Parses a full result page
///
/// Pure function of its inputs: the same HTML always yields the same scan.
///
/// # Example
///
/// ```
/// use ensun_scout::crawler::{parse_document, CssRoleSelector};
/// use url::Url;
///
/// let roles = CssRoleSelector::ensun().unwrap();
/// let base = Url::parse("https://ensun.io").unwrap();
/// let scan = parse_document("<html><body></body></html>", &roles, &base);
/// assert_eq!(scan.containers, 0);
/// assert!(scan.companies.is_empty());
/// ```
pub fn parse_document(html: &str, roles: &dyn RoleSelector, base: &Url) -> PageScan {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = roles
        .find_first(root, Role::Title)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .and_then(non_empty);

    let containers = roles.find_all(root, Role::Container);
    let mut scan = PageScan {
        title,
        containers: containers.len(),
        ..Default::default()
    };

    for container in containers {
        let parsed = parse_container(container, roles, base);
        scan.skipped += parsed.skipped;
        scan.companies.extend(parsed.companies);
    }

    scan
}
