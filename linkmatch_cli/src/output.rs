use linkmatch_lib::{MatchOutcome, ResolutionReport, UnmatchedConnectionRow};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct OutcomeRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Confidence")]
    #[serde(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Notes")]
    #[serde(rename = "Notes")]
    notes: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
pub struct StoredRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Confidence")]
    #[serde(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
pub struct StatsRow {
    #[tabled(rename = "Confidence")]
    #[serde(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Connections")]
    #[serde(rename = "Connections")]
    connections: i64,
}

/// Row for the manual-review CSV export. Text fields are sanitized so
/// the file is safe to open in a spreadsheet.
#[derive(Serialize)]
pub struct ReviewRow {
    first_name: String,
    last_name: String,
    company: String,
    linkedin_url: String,
    confidence: String,
    notes: String,
}

impl ReviewRow {
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        let record = &outcome.record;
        Self {
            first_name: sanitize_csv_field(&record.first_name),
            last_name: sanitize_csv_field(&record.last_name),
            company: sanitize_csv_field(record.company.as_deref().unwrap_or("")),
            linkedin_url: record.linkedin_url.clone(),
            confidence: outcome.confidence.to_string(),
            notes: sanitize_csv_field(&outcome.notes),
        }
    }
}

/// Prefix a tab when a field starts with a spreadsheet formula trigger,
/// so an exported CSV cannot execute on open.
pub fn sanitize_csv_field(field: &str) -> String {
    match field.chars().next() {
        Some('=') | Some('+') | Some('-') | Some('@') => format!("\t{}", field),
        _ => field.to_string(),
    }
}

// -- Row builders --

fn build_outcome_rows<'a>(outcomes: impl IntoIterator<Item = &'a MatchOutcome>) -> Vec<OutcomeRow> {
    outcomes
        .into_iter()
        .map(|o| OutcomeRow {
            name: o.record.display_name(),
            company: o.record.company.clone().unwrap_or_default(),
            confidence: o.confidence.to_string(),
            notes: o.notes.clone(),
            url: o.record.linkedin_url.clone(),
        })
        .collect()
}

fn build_stored_rows(rows: &[UnmatchedConnectionRow]) -> Vec<StoredRow> {
    rows.iter()
        .map(|r| StoredRow {
            name: format!("{} {}", r.first_name, r.last_name).trim().to_string(),
            company: r.company.clone().unwrap_or_default(),
            confidence: r.match_confidence.clone(),
            url: r.linkedin_url.clone(),
        })
        .collect()
}

fn build_stats_rows(counts: &[(String, i64)]) -> Vec<StatsRow> {
    counts
        .iter()
        .map(|(confidence, connections)| StatsRow {
            confidence: confidence.clone(),
            connections: *connections,
        })
        .collect()
}

// -- Batch report --

pub fn print_report(
    report: &ResolutionReport,
    format: &OutputFormat,
    preview: usize,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for outcome in report.matched.iter().chain(report.unmatched.iter()) {
                wtr.serialize(ReviewRow::from_outcome(outcome))?;
            }
            wtr.flush()?;
        }
        OutputFormat::Table => {
            println!("Matching results");
            println!("  Total connections:    {}", report.total);
            println!("  Matched (email):      {}", report.counts.email);
            println!("  Matched (exact):      {}", report.counts.exact);
            println!("  Matched (fuzzy):      {}", report.counts.fuzzy);
            println!("  Ambiguous (multiple): {}", report.counts.ambiguous());
            println!("  Unmatched:            {}", report.counts.unmatched);

            if !report.unmatched.is_empty() {
                println!();
                println!("Needs manual review:");
                let rows = build_outcome_rows(report.unmatched.iter().take(preview));
                println!("{}", Table::new(rows));
                if report.unmatched.len() > preview {
                    println!(
                        "  ... and {} more (use --preview to show more)",
                        report.unmatched.len() - preview
                    );
                }
            }
        }
    }
    Ok(())
}

// -- Stored listings --

pub fn print_stored(rows: &[UnmatchedConnectionRow], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in build_stored_rows(rows) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Table => println!("{}", Table::new(build_stored_rows(rows))),
    }
    Ok(())
}

pub fn print_stats(counts: &[(String, i64)], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = counts
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
                .collect();
            print_json(&map);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in build_stats_rows(counts) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Table => println!("{}", Table::new(build_stats_rows(counts))),
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkmatch_lib::{ConnectionRecord, MatchConfidence};

    fn outcome(confidence: MatchConfidence, contact_id: Option<&str>) -> MatchOutcome {
        MatchOutcome {
            record: ConnectionRecord {
                first_name: "Jenny".into(),
                last_name: "Lee".into(),
                linkedin_url: "https://linkedin.com/in/jennylee".into(),
                email: None,
                company: Some("Acme".into()),
                position: None,
                connected_on: None,
            },
            contact_id: contact_id.map(String::from),
            confidence,
            notes: "Exact match: Jenny Lee".into(),
        }
    }

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    // -- sanitize_csv_field --

    #[test]
    fn test_sanitize_csv_field_equals() {
        assert_eq!(sanitize_csv_field("=SUM(A1)"), "\t=SUM(A1)");
    }

    #[test]
    fn test_sanitize_csv_field_plus() {
        assert_eq!(sanitize_csv_field("+1234"), "\t+1234");
    }

    #[test]
    fn test_sanitize_csv_field_minus() {
        assert_eq!(sanitize_csv_field("-cmd|'/C calc'!A0"), "\t-cmd|'/C calc'!A0");
    }

    #[test]
    fn test_sanitize_csv_field_at() {
        assert_eq!(sanitize_csv_field("@SUM(A1:A2)"), "\t@SUM(A1:A2)");
    }

    #[test]
    fn test_sanitize_csv_field_normal() {
        assert_eq!(sanitize_csv_field("Apple Inc"), "Apple Inc");
        assert_eq!(sanitize_csv_field(""), "");
    }

    // -- format flag --

    #[test]
    fn test_format_from_flag() {
        assert_eq!(OutputFormat::from_flag("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flag("csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_flag("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from_flag("anything"), OutputFormat::Table);
    }

    // -- rows --

    #[test]
    fn test_outcome_row_fields() {
        let rows = build_outcome_rows(&[outcome(MatchConfidence::Exact, Some("c1"))][..]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jenny Lee");
        assert_eq!(rows[0].company, "Acme");
        assert_eq!(rows[0].confidence, "exact");
    }

    #[test]
    fn test_csv_outcome_headers() {
        let rows = build_outcome_rows(&[outcome(MatchConfidence::Unmatched, None)][..]);
        let csv = csv_from_rows(&rows);
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Name,Company,Confidence,Notes,URL");
    }

    #[test]
    fn test_review_row_sanitizes_text_fields() {
        let mut out = outcome(MatchConfidence::Unmatched, None);
        out.record.company = Some("=HYPERLINK(...)".into());
        let row = ReviewRow::from_outcome(&out);
        assert_eq!(row.company, "\t=HYPERLINK(...)");
        let csv = csv_from_rows(&[row]);
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "first_name,last_name,company,linkedin_url,confidence,notes"
        );
    }

    #[test]
    fn test_stats_rows() {
        let rows = build_stats_rows(&[("exact".to_string(), 12), ("unmatched".to_string(), 3)]);
        let csv = csv_from_rows(&rows);
        assert!(csv.contains("exact,12"));
        assert!(csv.contains("unmatched,3"));
    }

    #[test]
    fn test_report_json_serializable() {
        let outcomes = vec![outcome(MatchConfidence::Exact, Some("c1"))];
        let report = ResolutionReport::from_outcomes(&outcomes);
        let val = serde_json::to_value(&report).unwrap();
        assert_eq!(val["total"], 1);
        assert_eq!(val["counts"]["exact"], 1);
        assert!(val["matched"].is_array());
    }
}
