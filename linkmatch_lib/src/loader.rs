//! Connections export ingestion.
//!
//! LinkedIn's export is almost-CSV: a short free-text note block sits
//! above the header row, dates come as `DD-Mon-YY`, and files saved
//! through a spreadsheet are often Windows-1252 rather than UTF-8.
//! Rows missing the URL or first name are rejected per-row; a bad row
//! never aborts the batch.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::LinkMatchError;
use crate::types::ConnectionRecord;

/// Parsed export plus the number of rejected rows.
#[derive(Debug)]
pub struct LoadedConnections {
    pub records: Vec<ConnectionRecord>,
    pub skipped: usize,
}

/// Raw export row; column names as they appear in the header.
#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Last Name", default)]
    last_name: String,
    #[serde(rename = "URL", default)]
    url: String,
    #[serde(rename = "Email Address", default)]
    email: String,
    #[serde(rename = "Company", default)]
    company: String,
    #[serde(rename = "Position", default)]
    position: String,
    #[serde(rename = "Connected On", default)]
    connected_on: String,
}

/// Load a connections export from disk.
pub fn load_connections(path: impl AsRef<Path>) -> Result<LoadedConnections, LinkMatchError> {
    let bytes = fs::read(path.as_ref())?;
    let content = decode_export_bytes(bytes);
    parse_connections(&content)
}

/// Decode export bytes: UTF-8 when valid, otherwise Windows-1252
/// (common for spreadsheet-exported CSVs).
pub(crate) fn decode_export_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Parse already-decoded export text. Exposed separately so callers and
/// tests can feed in-memory content.
pub fn parse_connections(content: &str) -> Result<LoadedConnections, LinkMatchError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    // Skip the note block: everything before the row whose first field
    // is "First Name". The export's preamble length is not fixed.
    let mut offset = 0usize;
    let mut found_header = false;
    for line in content.split_inclusive('\n') {
        if line.trim_start().starts_with("First Name") {
            found_header = true;
            break;
        }
        offset += line.len();
    }
    if !found_header {
        return Err(LinkMatchError::InvalidInput(
            "no 'First Name' header row found in export".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content[offset..].as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in reader.deserialize::<ExportRow>().enumerate() {
        // Header is row 1; data starts at row 2.
        let line = i + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("rejecting malformed export row {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        let first_name = row.first_name.trim();
        let url = row.url.trim();
        if url.is_empty() || first_name.is_empty() {
            tracing::warn!(
                "rejecting export row {}: missing {}",
                line,
                if url.is_empty() { "URL" } else { "first name" }
            );
            skipped += 1;
            continue;
        }

        records.push(ConnectionRecord {
            first_name: first_name.to_string(),
            last_name: row.last_name.trim().to_string(),
            linkedin_url: url.to_string(),
            email: non_empty(&row.email),
            company: non_empty(&row.company),
            position: non_empty(&row.position),
            connected_on: parse_connected_on(&row.connected_on),
        });
    }

    Ok(LoadedConnections { records, skipped })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse the export's `DD-Mon-YY` connection date. Unparseable input
/// becomes `None` rather than an error.
pub fn parse_connected_on(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d-%b-%y").ok()
}
