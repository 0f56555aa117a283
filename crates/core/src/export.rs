//! Flat CSV rendering for result exports.

use std::borrow::Cow;

/// Column header for media exports.
pub const MEDIA_CSV_HEADER: &str =
    "id,filename,filepath,type,emotion,valence,arousal,status,created_at,updated_at";

/// Quote a field if it contains a delimiter, quote, or line break.
///
/// Embedded quotes are doubled (RFC 4180).
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Join fields into one CSV record terminated by `\n`.
pub fn csv_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}
