//! JSON dump of a scrape result

use crate::output::traits::{OutputResult, ResultExporter};
use crate::record::ScrapeResult;
use std::path::Path;

/// Exporter producing pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExport;

impl ResultExporter for JsonExport {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, result: &ScrapeResult) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}

/// Writes the scrape result as JSON
pub fn write_json(result: &ScrapeResult, output_path: &Path) -> OutputResult<()> {
    JsonExport.export(result, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PartialCompany;

    #[test]
    fn test_json_uses_column_keys() {
        let result = ScrapeResult {
            companies: vec![PartialCompany {
                company_name: Some("Acme".to_string()),
                ..Default::default()
            }
            .into_record()
            .unwrap()],
            query: "Tokenization".to_string(),
            companies_count: 1,
            pages_requested: 1,
            pages_succeeded: 1,
            ..Default::default()
        };

        let rendered = JsonExport.render(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["companies"][0]["Company Name"], "Acme");
        assert_eq!(value["companies"][0]["Founding Year"], "Unknown");
        assert_eq!(value["error"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.json");
        let result = ScrapeResult {
            query: "Tokenization".to_string(),
            error: Some("no company data found".to_string()),
            ..Default::default()
        };

        write_json(&result, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: ScrapeResult = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, result);
    }
}
