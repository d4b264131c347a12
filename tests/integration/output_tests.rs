//! Report, JSON and CSV output for a scraped result

use ensun_scout::config::HttpConfig;
use ensun_scout::crawler::{CssRoleSelector, HttpFetcher, RecordingPacer, ScrapeRequest, Scraper};
use ensun_scout::output::{generate_markdown_report, write_csv, write_json};
use ensun_scout::record::COLUMNS;
use ensun_scout::ScrapeResult;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn scrape_single_card(mock_server: &MockServer) -> ScrapeResult {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
               <div class="MuiStack-root mui-1yxbse7">
                 <div class="MuiPaper-root mui-t3yxhx">
                   <a href="/company/pipe-works"><p class="MuiTypography-root MuiTypography-body1 mui-1e9jes1">Pipe | Works</p></a>
                   <p class="MuiTypography-root MuiTypography-body1 mui-98jxju">Berlin, Germany</p>
                 </div>
               </div>
               </body></html>"#,
        ))
        .mount(mock_server)
        .await;

    let fetcher = HttpFetcher::new(&HttpConfig::default(), Duration::from_secs(5))
        .expect("Failed to build HTTP client");
    let scraper = Scraper::new(
        fetcher,
        RecordingPacer::new(),
        Box::new(CssRoleSelector::ensun().expect("Failed to compile selectors")),
        Url::parse(&mock_server.uri()).expect("Failed to parse mock server URI"),
    );

    scraper
        .scrape(&ScrapeRequest::new("Tokenization").with_delay_seconds(0.0))
        .await
}

#[tokio::test]
async fn test_markdown_report_for_scrape() {
    let mock_server = MockServer::start().await;
    let result = scrape_single_card(&mock_server).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.md");
    generate_markdown_report(&result, &report_path).expect("Failed to write report");

    let report = std::fs::read_to_string(&report_path).expect("Failed to read report");

    // No heading on the page, so the count line is used
    assert!(report.starts_with("# 1 companies found – query: Tokenization"));
    assert!(report.contains("_Requested: 1 pages · Succeeded: 1_"));
    assert!(report.contains("| Pipe \\| Works | Berlin, Germany | Unknown |"));
    assert!(!report.contains("Warning"));
}

#[tokio::test]
async fn test_json_dump_for_scrape() {
    let mock_server = MockServer::start().await;
    let result = scrape_single_card(&mock_server).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let json_path = temp_dir.path().join("companies.json");
    write_json(&result, &json_path).expect("Failed to write JSON");

    let content = std::fs::read_to_string(&json_path).expect("Failed to read JSON");
    let value: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");

    assert_eq!(value["companies_count"], 1);
    assert_eq!(value["companies"][0]["Company Name"], "Pipe | Works");
    assert_eq!(
        value["companies"][0]["Detail URL"],
        format!("{}/company/pipe-works", mock_server.uri())
    );
    assert_eq!(value["companies"][0]["Description"], "No description available");
}

#[tokio::test]
async fn test_csv_export_for_scrape() {
    let mock_server = MockServer::start().await;
    let result = scrape_single_card(&mock_server).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = temp_dir.path().join("companies.csv");
    write_csv(&result, &csv_path).expect("Failed to write CSV");

    let mut reader = csv::Reader::from_path(&csv_path).expect("Failed to open CSV");
    let headers = reader.headers().expect("Missing CSV header").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Invalid CSV row");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "Pipe | Works");
    assert_eq!(&rows[0][1], "Berlin, Germany");
    assert_eq!(
        &rows[0][6],
        format!("{}/company/pipe-works", mock_server.uri()).as_str()
    );
}
