//! CSV contact list ingestion
//!
//! Parses an uploaded contact list into [`Recipient`] records.
//!
//! # Format
//! - `,` delimited, first non-blank line is the header
//! - Columns are located by case-insensitive substring match on the header,
//!   so `Full Name` or `username` both resolve the `name` column
//! - Fields may be wrapped in `"`, which are stripped; quoted commas are not
//!   supported and split the field
//! - Rows missing a name or phone are skipped without error
//! - At most [`MAX_RECIPIENTS`] rows are accepted, the rest are dropped

use crate::contacts::Recipient;
use thiserror::Error;
use tracing::debug;

/// Maximum number of recipients accepted from a single file
pub const MAX_RECIPIENTS: usize = 1000;

/// Maximum upload size (5MB)
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Demo file offered for download
const DEMO_ROWS: [[&str; 3]; 6] = [
    ["Name", "Phone", "Email"],
    ["John Doe", "+1234567890", "john@example.com"],
    ["Jane Smith", "+1987654321", "jane@example.com"],
    ["Mike Johnson", "+1122334455", "mike@example.com"],
    ["Sarah Wilson", "+1555666777", "sarah@example.com"],
    ["David Brown", "+1999888777", "david@example.com"],
];

/// Rejection of a whole contact file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    #[error("CSV file must have at least a header and one data row")]
    MissingRows,

    #[error("CSV must contain Name and Phone columns")]
    MissingColumns,

    #[error("Please upload a CSV file (got {0})")]
    NotCsv(String),

    #[error("File is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
}

/// Column positions resolved from the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    phone: usize,
    email: Option<usize>,
}

impl Columns {
    fn resolve(header: &str) -> Result<Self, CsvError> {
        let headers: Vec<String> = header
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .collect();

        let find = |needle: &str| headers.iter().position(|h| h.contains(needle));

        match (find("name"), find("phone")) {
            (Some(name), Some(phone)) => Ok(Self {
                name,
                phone,
                email: find("email"),
            }),
            _ => Err(CsvError::MissingColumns),
        }
    }

    /// Number of fields a row needs before name and phone can be read
    fn min_fields(&self) -> usize {
        self.name.max(self.phone) + 1
    }
}

/// Parse raw CSV text into recipients
///
/// Returns the accepted rows in file order. An empty result is not an error
/// here; callers decide how to report a file with no usable rows.
pub fn parse_contacts(text: &str) -> Result<Vec<Recipient>, CsvError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(CsvError::MissingRows);
    }

    let columns = Columns::resolve(lines[0])?;
    let mut recipients = Vec::new();

    for (line_no, line) in lines.iter().enumerate().skip(1) {
        if recipients.len() >= MAX_RECIPIENTS {
            debug!(
                "Recipient cap of {} reached, dropping {} remaining rows",
                MAX_RECIPIENTS,
                lines.len() - line_no
            );
            break;
        }

        let values: Vec<String> = line.split(',').map(clean_field).collect();

        if values.len() < columns.min_fields() {
            debug!("Skipping row {}: only {} fields", line_no, values.len());
            continue;
        }

        let name = &values[columns.name];
        let phone = &values[columns.phone];
        if name.is_empty() || phone.is_empty() {
            debug!("Skipping row {}: missing name or phone", line_no);
            continue;
        }

        let email = columns
            .email
            .and_then(|idx| values.get(idx))
            .cloned()
            .unwrap_or_default();

        recipients.push(Recipient::new(name.clone(), phone.clone(), email));
    }

    Ok(recipients)
}

/// Trim, drop every `"`, then trim again so `" Ann "` and `" "` count as
/// `Ann` and empty.
fn clean_field(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

/// Check an upload before it is read as a contact list
///
/// The file must be CSV by extension or declared media type, and no larger
/// than `max_bytes`.
pub fn validate_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<(), CsvError> {
    let by_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("text/csv"))
        .unwrap_or(false);
    let by_name = file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".csv"))
        .unwrap_or(false);

    if !by_type && !by_name {
        let described = file_name.or(content_type).unwrap_or("unnamed file");
        return Err(CsvError::NotCsv(described.to_string()));
    }

    if size > max_bytes {
        return Err(CsvError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Sample contact list users can download as a starting point
pub fn demo_csv() -> String {
    DEMO_ROWS
        .iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n")
}
