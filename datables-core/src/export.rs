//! CSV and JSON renderings of a comparison report.

use std::fmt;
use std::str::FromStr;

use crate::comparison::ComparisonReport;
use crate::model::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Export file format.
pub enum ExportFormat {
    /// Spreadsheet-friendly CSV.
    Csv,
    /// Pretty-printed JSON.
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type of the rendered content.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.extension())
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown export format: {0}")]
/// Raised when parsing an unsupported format name.
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownFormat(raw.to_owned())),
        }
    }
}

/// Render `report` in `format`.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if JSON serialization fails.
pub fn render(report: &ComparisonReport, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Csv => Ok(to_csv(report)),
        ExportFormat::Json => to_json(report),
    }
}

/// Render `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn to_json(report: &ComparisonReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Render `report` as a multi-section CSV document.
#[must_use]
pub fn to_csv(report: &ComparisonReport) -> String {
    let mut lines = vec![
        "Cross-Location Comparison Report".to_owned(),
        format!(
            "Date Range: {} to {}",
            report.date_range.start, report.date_range.end
        ),
        String::new(),
        "Location,Reservations,Covers,No-Show Rate,Avg Party Size,Table Utilization,Walk-In Rate"
            .to_owned(),
    ];

    for location in &report.locations {
        let metrics = &location.metrics;
        lines.push(
            [
                csv_field(&location.location_name),
                metrics.total_reservations.to_string(),
                metrics.total_covers.to_string(),
                format!("{}%", metrics.no_show_rate),
                format!("{:.1}", metrics.average_party_size),
                format!("{}%", metrics.table_utilization),
                format!("{}%", metrics.walk_in_rate),
            ]
            .join(","),
        );
    }

    let combined = &report.combined;
    lines.extend([
        String::new(),
        "Combined Totals".to_owned(),
        format!("Total Reservations,{}", combined.total_reservations),
        format!("Total Covers,{}", combined.total_covers),
        format!("Average No-Show Rate,{}%", combined.average_no_show_rate),
        format!("Average Utilization,{}%", combined.average_utilization),
        String::new(),
        "Daily Trends by Location".to_owned(),
    ]);

    for trend in &report.trends {
        lines.push(String::new());
        lines.push(format!("{} Daily Data", csv_field(&trend.location_name)));
        lines.push("Date,Reservations,Covers,No-Shows,Walk-Ins".to_owned());
        for day in &trend.data {
            lines.push(format!(
                "{},{},{},{},{}",
                day.date, day.reservations, day.covers, day.no_shows, day.walk_ins
            ));
        }
    }

    lines.join("\n")
}

/// Suggested download name, e.g. `analytics-comparison-2026-01-01-to-2026-01-07.csv`.
#[must_use]
pub fn export_filename(range: DateRange, format: ExportFormat) -> String {
    format!(
        "analytics-comparison-{}-to-{}.{}",
        range.start,
        range.end,
        format.extension()
    )
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}
