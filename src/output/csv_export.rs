//! CSV export of the company table
//!
//! One header row with the seven column names, then one row per record in
//! scrape order.

use crate::output::traits::{OutputResult, ResultExporter};
use crate::record::{ScrapeResult, COLUMNS};
use csv::Writer;
use std::io;
use std::path::Path;

/// Exporter producing the company table as CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExport;

impl ResultExporter for CsvExport {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, result: &ScrapeResult) -> OutputResult<String> {
        let mut wtr = Writer::from_writer(Vec::new());

        wtr.write_record(COLUMNS)?;
        for company in &result.companies {
            wtr.write_record(company.values())?;
        }
        wtr.flush().map_err(csv::Error::from)?;

        let bytes = wtr
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        let table = String::from_utf8(bytes)
            .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        tracing::debug!("Rendered {} companies as CSV", result.companies.len());
        Ok(table)
    }
}

/// Writes the company table as CSV
pub fn write_csv(result: &ScrapeResult, output_path: &Path) -> OutputResult<()> {
    CsvExport.export(result, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CompanyRecord, PartialCompany};

    fn company(name: &str, description: &str) -> CompanyRecord {
        PartialCompany {
            company_name: Some(name.to_string()),
            location: Some("Berlin, Germany".to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
        .into_record()
        .unwrap()
    }

    #[test]
    fn test_csv_header_and_rows() {
        let result = ScrapeResult {
            companies: vec![
                company("Alpha GmbH", "Ledger tooling"),
                company("Beta AG", "Says \"hello\""),
            ],
            companies_count: 2,
            ..Default::default()
        };

        let table = CsvExport.render(&result).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Company Name,Location,Employee,Founding Year,ESG Country Risk,Description,Detail URL"
        );
        assert_eq!(
            lines[1],
            "Alpha GmbH,\"Berlin, Germany\",Unknown,Unknown,Unknown,Ledger tooling,"
        );
        assert_eq!(
            lines[2],
            "Beta AG,\"Berlin, Germany\",Unknown,Unknown,Unknown,\"Says \"\"hello\"\"\","
        );
    }

    #[test]
    fn test_csv_without_companies_has_header_only() {
        let table = CsvExport.render(&ScrapeResult::default()).unwrap();
        assert_eq!(table.lines().count(), 1);
    }

    #[test]
    fn test_write_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        let result = ScrapeResult {
            companies: vec![company("Alpha GmbH", "Ledger tooling")],
            companies_count: 1,
            ..Default::default()
        };

        write_csv(&result, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            result.companies[0].values().to_vec()
        );
    }
}
