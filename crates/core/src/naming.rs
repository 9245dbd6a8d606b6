use crate::sequence::format_sequence;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// `YYYYMMDD` key that groups files for sequence numbering.
pub fn date_key(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// `{YYYYMMDD}_{NNNN}{ext}`. `extension` is lowercased with its dot, or empty.
pub fn file_name(timestamp: &NaiveDateTime, sequence: u32, extension: &str) -> String {
    format!(
        "{}_{}{}",
        date_key(timestamp),
        format_sequence(sequence),
        extension
    )
}

/// `{YYYY}/{MM}/{file_name}`, relative to the destination root.
pub fn relative_destination(timestamp: &NaiveDateTime, sequence: u32, extension: &str) -> PathBuf {
    PathBuf::from(timestamp.format("%Y").to_string())
        .join(timestamp.format("%m").to_string())
        .join(file_name(timestamp, sequence, extension))
}
