//! Text, CSV and JSON renderings of a [`TileNameReport`]

use thiserror::Error;
use tileutils_core::TileNameReport;

use crate::OutputFormat;

const DUPLICATES_HEADER: &str = "DUPLICATES";
const EMPTY_CSV_ROW: &str = ",,,,";

#[derive(Debug, Error)]
pub enum RenderError {
    /// CSV output is written unquoted
    #[error("cannot write {0:?} to CSV without quoting")]
    UnquotableField(String),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn render(report: &TileNameReport, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Tileset name, a blank line, the names, then the duplicate block
pub fn render_text(report: &TileNameReport) -> String {
    let mut lines = Vec::with_capacity(report.names.len() + report.duplicates.len() + 2);
    lines.push(format!("{}\n", report.tileset_name));
    lines.extend(report.names.iter().cloned());
    lines.push(format!("\n{}", DUPLICATES_HEADER));
    lines.extend(
        report
            .duplicates
            .iter()
            .map(|d| format!("{} {}", d.name, d.count)),
    );
    lines.join("\n")
}

pub fn render_csv(report: &TileNameReport) -> Result<String, RenderError> {
    let mut out = String::new();
    push_row(&mut out, &[report.tileset_name.as_str()])?;
    for name in &report.names {
        push_row(&mut out, &[name.as_str()])?;
    }
    out.push_str(EMPTY_CSV_ROW);
    out.push_str("\r\n");
    push_row(&mut out, &[DUPLICATES_HEADER])?;
    for duplicate in &report.duplicates {
        let count = duplicate.count.to_string();
        push_row(&mut out, &[duplicate.name.as_str(), count.as_str()])?;
    }
    Ok(out)
}

fn push_row(out: &mut String, fields: &[&str]) -> Result<(), RenderError> {
    for (i, field) in fields.iter().enumerate() {
        if field.contains([',', '"', '\r', '\n']) {
            return Err(RenderError::UnquotableField(field.to_string()));
        }
        if i > 0 {
            out.push(',');
        }
        out.push_str(field);
    }
    out.push_str("\r\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileutils_core::DuplicateName;

    fn report() -> TileNameReport {
        TileNameReport {
            tileset_name: "standard".to_string(),
            names: vec![
                "floorU".to_string(),
                "wallU".to_string(),
                "wallU".to_string(),
            ],
            duplicates: vec![DuplicateName {
                name: "wallU".to_string(),
                count: 2,
            }],
        }
    }

    #[test]
    fn text_layout() {
        assert_eq!(
            render_text(&report()),
            "standard\n\nfloorU\nwallU\nwallU\n\nDUPLICATES\nwallU 2"
        );
    }

    #[test]
    fn text_without_duplicates_ends_with_header() {
        let mut report = report();
        report.names.pop();
        report.duplicates.clear();

        assert_eq!(
            render_text(&report),
            "standard\n\nfloorU\nwallU\n\nDUPLICATES"
        );
    }

    #[test]
    fn csv_layout() {
        assert_eq!(
            render_csv(&report()).unwrap(),
            "standard\r\nfloorU\r\nwallU\r\nwallU\r\n,,,,\r\nDUPLICATES\r\nwallU,2\r\n"
        );
    }

    #[test]
    fn csv_rejects_commas() {
        let mut report = report();
        report.names.push("left,right".to_string());

        let err = render_csv(&report).unwrap_err();
        assert!(matches!(err, RenderError::UnquotableField(ref f) if f == "left,right"));
    }

    #[test]
    fn json_has_report_fields() {
        let json = render(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tileset_name"], "standard");
        assert_eq!(value["names"].as_array().unwrap().len(), 3);
        assert_eq!(value["duplicates"][0]["name"], "wallU");
        assert_eq!(value["duplicates"][0]["count"], 2);
    }
}
