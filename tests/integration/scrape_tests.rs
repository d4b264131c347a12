//! Scrape pipeline tests against a mock result site

use ensun_scout::config::{Config, HttpConfig};
use ensun_scout::crawler::{
    self, CssRoleSelector, HttpFetcher, RecordingPacer, ScrapeRequest, Scraper,
    PARTIAL_FAILURE_ERROR,
};
use ensun_scout::storage::{RunStatus, SqliteStorage, Storage};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card(slug: &str, name: &str, info: &[&str]) -> String {
    let info_html: String = info
        .iter()
        .map(|text| {
            format!(
                r#"<p class="MuiTypography-root MuiTypography-body1 mui-98jxju">{}</p>"#,
                text
            )
        })
        .collect();

    format!(
        r#"<div class="MuiPaper-root mui-t3yxhx">
             <a href="/company/{slug}"><p class="MuiTypography-root MuiTypography-body1 mui-1e9jes1">{name}</p></a>
             {info_html}
             <p class="MuiTypography-root MuiTypography-body1 mui-dfcthu">Low</p>
             <p class="mui-1jyj4mb">{name} builds tokenization infrastructure.</p>
           </div>"#
    )
}

fn results_page(title: &str, cards: &[String]) -> String {
    format!(
        r#"<html><head><title>ensun</title></head><body>
           <h4 class="MuiTypography-root MuiTypography-h4 mui-1kqqnff">{}</h4>
           <div class="MuiStack-root mui-1yxbse7">{}</div>
           </body></html>"#,
        title,
        cards.concat()
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn scraper(server: &MockServer) -> Scraper<HttpFetcher, RecordingPacer> {
    let fetcher = HttpFetcher::new(&HttpConfig::default(), Duration::from_secs(5))
        .expect("Failed to build HTTP client");
    Scraper::new(
        fetcher,
        RecordingPacer::new(),
        Box::new(CssRoleSelector::ensun().expect("Failed to compile selectors")),
        Url::parse(&server.uri()).expect("Failed to parse mock server URI"),
    )
}

fn request(pages: u32, retries: u32) -> ScrapeRequest {
    ScrapeRequest::new("Tokenization")
        .with_page_count(pages)
        .with_max_retries(retries)
        .with_delay_seconds(0.0)
}

#[tokio::test]
async fn test_partial_failure_with_failing_second_page() {
    let mock_server = MockServer::start().await;

    // Page 2 is mounted first so it wins over the broader page 1 matcher
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Tokenization"))
        .and(query_param("threshold", "VERY_LOW"))
        .respond_with(html(results_page(
            "Tokenization companies in Germany",
            &[
                card("alpha", "Alpha GmbH", &["42 Employees", "2019", "Berlin, Germany"]),
                card("beta", "Beta AG", &["Hamburg, Germany"]),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = scraper(&mock_server);
    let result = scraper.scrape(&request(2, 2)).await;

    assert_eq!(result.pages_requested, 2);
    assert_eq!(result.pages_succeeded, 1);
    assert_eq!(result.companies_count, 2);
    assert_eq!(result.title, "Tokenization companies in Germany");
    assert_eq!(result.error.as_deref(), Some(PARTIAL_FAILURE_ERROR));
    assert_eq!(result.page_errors.len(), 1);
    assert!(
        result.page_errors[0].starts_with("page 2: HTTP status 500"),
        "unexpected page error: {}",
        result.page_errors[0]
    );

    let alpha = &result.companies[0];
    assert_eq!(alpha.company_name, "Alpha GmbH");
    assert_eq!(alpha.employee, "42");
    assert_eq!(alpha.founding_year, "2019");
    assert_eq!(alpha.location, "Berlin, Germany");
    assert_eq!(alpha.esg_country_risk, "Low");
    assert_eq!(
        alpha.detail_url,
        format!("{}/company/alpha", mock_server.uri())
    );

    let beta = &result.companies[1];
    assert_eq!(beta.location, "Hamburg, Germany");
    assert_eq!(beta.employee, "Unknown");
    assert_eq!(beta.founding_year, "Unknown");

    // Backoff after the two failed attempts on page 2: 2s then 4s
    assert_eq!(scraper.pacer().total(), Duration::from_secs(6));

    assert_eq!(
        result.urls,
        vec![
            format!(
                "{}/search?threshold=VERY_LOW&q=Tokenization",
                mock_server.uri()
            ),
            format!(
                "{}/search?threshold=VERY_LOW&q=Tokenization&page=2",
                mock_server.uri()
            ),
        ]
    );
}

#[tokio::test]
async fn test_browser_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(html(results_page(
            "Results",
            &[card("alpha", "Alpha GmbH", &[])],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = scraper(&mock_server).scrape(&request(1, 0)).await;

    assert_eq!(result.companies_count, 1);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_missing_containers_forces_one_reload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(
            "<html><body><p>Loading results...</p></body></html>".to_string(),
        ))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = scraper(&mock_server).scrape(&request(1, 2)).await;

    assert!(result.companies.is_empty());
    assert_eq!(result.pages_succeeded, 0);
    assert_eq!(
        result.page_errors,
        vec!["page 1: no company cards found after reload".to_string()]
    );
    assert_eq!(result.error.as_deref(), Some(PARTIAL_FAILURE_ERROR));
}

#[tokio::test]
async fn test_empty_body_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let scraper = scraper(&mock_server);
    let result = scraper.scrape(&request(1, 1)).await;

    assert!(result.companies.is_empty());
    assert_eq!(result.page_errors.len(), 1);
    assert!(result.page_errors[0].contains("empty response body"));
    assert_eq!(scraper.pacer().total(), Duration::from_secs(2));
}

#[tokio::test]
async fn test_scrape_from_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "green hydrogen"))
        .respond_with(html(results_page(
            "Green hydrogen",
            &[card("h2", "H2 Works", &["120 Employees"])],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.scraper.base_url = mock_server.uri();
    config.scraper.delay_seconds = 0.0;

    let request = ScrapeRequest::from_config("green hydrogen", &config);
    let result = crawler::scrape(&config, &request)
        .await
        .expect("Scrape setup failed");

    assert_eq!(result.query, "green hydrogen");
    assert!(result.urls[0].ends_with("/search?threshold=VERY_LOW&q=green+hydrogen"));
    assert_eq!(result.companies[0].employee, "120");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_result_round_trips_through_storage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(results_page(
            "Tokenization companies",
            &[
                card("alpha", "Alpha GmbH", &["2019"]),
                card("beta", "Beta AG", &["Munich"]),
            ],
        )))
        .mount(&mock_server)
        .await;

    let result = scraper(&mock_server).scrape(&request(2, 0)).await;
    assert_eq!(result.companies_count, 2);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("ensun.db");

    let run_id = {
        let mut storage = SqliteStorage::new(&db_path).expect("Failed to open storage");
        let run_id = storage
            .create_run(&result.query, "deadbeef")
            .expect("Failed to create run");
        storage
            .record_result(run_id, &result)
            .expect("Failed to record result");
        storage
            .complete_run(run_id, RunStatus::for_result(&result))
            .expect("Failed to complete run");
        run_id
    };

    let storage = SqliteStorage::new(&db_path).expect("Failed to reopen storage");
    let run = storage
        .get_latest_run()
        .expect("Failed to query runs")
        .expect("No run stored");

    assert_eq!(run.id, run_id);
    assert_eq!(run.status, RunStatus::Partial);
    assert_eq!(run.config_hash, "deadbeef");
    assert_eq!(run.companies_count, 2);

    let loaded = storage.load_result(run_id).expect("Failed to load result");
    assert_eq!(loaded, result);
}
