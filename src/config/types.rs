use serde::Deserialize;

/// Default desktop browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Default `Accept` header
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default `Accept-Language` header
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.7";

/// Main configuration structure for Ensun-Scout
///
/// Every table is optional; a missing file section falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site origin that search and detail URLs are built from
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of result pages to request
    #[serde(rename = "page-count")]
    pub page_count: u32,

    /// Retries per fetch after the first attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause before each attempt and between pages (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: crate::url::DEFAULT_BASE_URL.to_string(),
            page_count: 1,
            max_retries: 2,
            delay_seconds: 2.0,
            timeout_seconds: 15,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept")]
    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown report; generated from the query when absent
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,

    /// Path to the JSON dump of the full result
    #[serde(rename = "json-path")]
    pub json_path: Option<String>,

    /// Path to the CSV export of the company table
    #[serde(rename = "csv-path")]
    pub csv_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./ensun.db".to_string(),
            summary_path: None,
            json_path: None,
            csv_path: None,
        }
    }
}

/// CSS selector strings for each structural role of a result page
///
/// These track the site's generated class names and are the only place
/// that knows about them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub title: String,
    pub container: String,
    pub card: String,
    pub name: String,
    pub info: String,
    pub risk: String,
    pub description: String,
    #[serde(rename = "detail-link")]
    pub detail_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: ".MuiTypography-root.MuiTypography-h4.mui-1kqqnff".to_string(),
            container: ".MuiStack-root.mui-1yxbse7".to_string(),
            card: "div.MuiPaper-root.mui-t3yxhx".to_string(),
            name: "p.MuiTypography-root.MuiTypography-body1.mui-1e9jes1".to_string(),
            info: "p.MuiTypography-root.MuiTypography-body1.mui-98jxju".to_string(),
            risk: "p.MuiTypography-root.MuiTypography-body1.mui-dfcthu".to_string(),
            description: "p.mui-1jyj4mb".to_string(),
            detail_link: r#"a[href*="/company/"]"#.to_string(),
        }
    }
}

impl SelectorConfig {
    /// Returns `(role name, selector)` pairs for every role
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("title", &self.title),
            ("container", &self.container),
            ("card", &self.card),
            ("name", &self.name),
            ("info", &self.info),
            ("risk", &self.risk),
            ("description", &self.description),
            ("detail-link", &self.detail_link),
        ]
    }
}
