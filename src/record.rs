//! Company records and the aggregated scrape result

use serde::{Deserialize, Serialize};

/// Sentinel for Location, Employee, Founding Year and ESG Country Risk
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for a missing description
pub const NO_DESCRIPTION: &str = "No description available";

/// Column names, in output order
pub const COLUMNS: [&str; 7] = [
    "Company Name",
    "Location",
    "Employee",
    "Founding Year",
    "ESG Country Risk",
    "Description",
    "Detail URL",
];

/// One company extracted from a result card
///
/// Every field is always populated; fields missing from the markup carry
/// their sentinel default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Company Name")]
    pub company_name: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Employee")]
    pub employee: String,

    #[serde(rename = "Founding Year")]
    pub founding_year: String,

    #[serde(rename = "ESG Country Risk")]
    pub esg_country_risk: String,

    #[serde(rename = "Description")]
    pub description: String,

    /// Absolute URL, or empty when the card has no detail link
    #[serde(rename = "Detail URL")]
    pub detail_url: String,
}

impl CompanyRecord {
    /// Returns the field values in [`COLUMNS`] order
    pub fn values(&self) -> [&str; 7] {
        [
            &self.company_name,
            &self.location,
            &self.employee,
            &self.founding_year,
            &self.esg_country_risk,
            &self.description,
            &self.detail_url,
        ]
    }
}

/// Fields pulled out of one card before validation
///
/// Any field may be missing. [`PartialCompany::into_record`] applies the
/// name requirement and the sentinel defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCompany {
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub employee: Option<String>,
    pub founding_year: Option<String>,
    pub esg_country_risk: Option<String>,
    pub description: Option<String>,
    pub detail_url: Option<String>,
}

impl PartialCompany {
    /// Completes the record, or returns `None` if the card has no usable name
    pub fn into_record(self) -> Option<CompanyRecord> {
        let company_name = self.company_name.filter(|name| !name.trim().is_empty())?;

        Some(CompanyRecord {
            company_name,
            location: self.location.unwrap_or_else(|| UNKNOWN.to_string()),
            employee: self.employee.unwrap_or_else(|| UNKNOWN.to_string()),
            founding_year: self.founding_year.unwrap_or_else(|| UNKNOWN.to_string()),
            esg_country_risk: self.esg_country_risk.unwrap_or_else(|| UNKNOWN.to_string()),
            description: self
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            detail_url: self.detail_url.unwrap_or_default(),
        })
    }
}

/// The single artifact of one scrape run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// Records from every successful page, in page then card order
    pub companies: Vec<CompanyRecord>,

    /// The query as given by the caller
    pub query: String,

    /// Every page URL that was planned, in order
    pub urls: Vec<String>,

    /// Result-set heading from the first page, or empty
    pub title: String,

    pub companies_count: usize,
    pub pages_requested: usize,
    pub pages_succeeded: usize,

    /// One `"page {index}: {reason}"` entry per failed page
    pub page_errors: Vec<String>,

    /// Summary error, set when pages failed or nothing was found
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Returns true if every requested page contributed records
    pub fn is_complete(&self) -> bool {
        self.page_errors.is_empty() && self.error.is_none()
    }
}
