//! Log export in JSON, CSV and plain-text formats

use crate::error::LogError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sideletter_domain::interaction::iso_utc;
use sideletter_domain::InteractionRecord;
use std::fmt::{self, Write as _};
use std::str::FromStr;

const CSV_HEADER: [&str; 6] = [
    "ID",
    "Timestamp",
    "Question",
    "Answer",
    "Sources Count",
    "Answer Length",
];

const TXT_TITLE: &str = "Interaction Logs Export";
const DIVIDER_WIDTH: usize = 80;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON document
    #[default]
    Json,
    /// Comma-separated values with a header row
    Csv,
    /// Human-readable report
    Txt,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }

    /// MIME type of the rendered body
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Txt => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" => Ok(ExportFormat::Txt),
            _ => Err(LogError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered export, ready to be sent as a file download
#[derive(Debug, Clone)]
pub struct Export {
    /// Format of `body`
    pub format: ExportFormat,
    /// Serialized content
    pub body: Vec<u8>,
    /// Suggested download name, e.g. `interactions_20250301_120000.csv`
    pub filename: String,
    /// Number of records included
    pub record_count: usize,
}

impl Export {
    /// MIME type of the body
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    export_timestamp: String,
    total_interactions: usize,
    logs: &'a [InteractionRecord],
}

/// Render `records` (already newest-first) as of `generated_at`
pub fn render(
    format: ExportFormat,
    records: &[InteractionRecord],
    generated_at: DateTime<Utc>,
) -> Result<Export, LogError> {
    let body = match format {
        ExportFormat::Json => render_json(records, generated_at)?,
        ExportFormat::Csv => render_csv(records).into_bytes(),
        ExportFormat::Txt => render_txt(records, generated_at).into_bytes(),
    };

    Ok(Export {
        format,
        body,
        filename: format!(
            "interactions_{}.{}",
            generated_at.format("%Y%m%d_%H%M%S"),
            format.extension()
        ),
        record_count: records.len(),
    })
}

fn render_json(
    records: &[InteractionRecord],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, LogError> {
    let document = JsonExport {
        export_timestamp: iso_utc::format(&generated_at),
        total_interactions: records.len(),
        logs: records,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

fn render_csv(records: &[InteractionRecord]) -> String {
    let mut out = String::new();
    write_csv_row(&mut out, CSV_HEADER.iter().map(|field| field.to_string()));

    for record in records {
        write_csv_row(
            &mut out,
            [
                record.id.to_string(),
                record.timestamp_string(),
                record.question.clone(),
                record.answer.clone(),
                record.sources_count.to_string(),
                record.answer_length.to_string(),
            ],
        );
    }

    out
}

/// Append one CSV row with minimal quoting and a CRLF terminator
fn write_csv_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\r', '\n']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push_str("\r\n");
}

fn render_txt(records: &[InteractionRecord], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", TXT_TITLE);
    let _ = writeln!(out, "Generated: {}", iso_utc::format(&generated_at));
    let _ = writeln!(out, "Total Interactions: {}", records.len());
    let _ = writeln!(out, "{}\n", "=".repeat(DIVIDER_WIDTH));

    for record in records {
        let _ = writeln!(out, "ID: {}", record.id);
        let _ = writeln!(out, "Timestamp: {}", record.timestamp_string());
        let _ = writeln!(out, "Question: {}", record.question);
        let _ = writeln!(out, "Answer:\n{}", record.answer);
        let _ = writeln!(out, "Sources Count: {}", record.sources_count);
        let _ = writeln!(out, "Answer Length: {} chars", record.answer_length);
        let _ = writeln!(out, "{}\n", "-".repeat(DIVIDER_WIDTH));
    }

    out
}
