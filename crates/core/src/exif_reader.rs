use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Layout of every EXIF date-time field: `YYYY:MM:DD HH:MM:SS`.
pub const CAPTURE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// EXIF fields that can carry a capture timestamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaptureField {
    DateTimeOriginal,
    DateTime,
    DateTimeDigitized,
}

impl CaptureField {
    /// Lookup order; the first field that is present and parses wins.
    pub const SEARCH_ORDER: [CaptureField; 3] = [
        CaptureField::DateTimeOriginal,
        CaptureField::DateTime,
        CaptureField::DateTimeDigitized,
    ];

    fn tag(self) -> Tag {
        match self {
            CaptureField::DateTimeOriginal => Tag::DateTimeOriginal,
            CaptureField::DateTime => Tag::DateTime,
            CaptureField::DateTimeDigitized => Tag::DateTimeDigitized,
        }
    }
}

/// Reads the embedded capture time of an image.
///
/// Unreadable files, unsupported containers and missing or malformed fields
/// all collapse into `None`; callers fall back to the modification time.
pub fn read_capture_time(path: &Path) -> Option<(NaiveDateTime, CaptureField)> {
    match read_exif(path) {
        Ok(exif) => {
            let found = find_capture_time(&exif);
            if found.is_none() {
                debug!("No usable capture time in EXIF: {}", path.display());
            }
            found
        }
        Err(err) => {
            debug!("EXIF unavailable for {}: {err:#}", path.display());
            None
        }
    }
}

fn read_exif(path: &Path) -> Result<Exif> {
    let file = File::open(path)
        .with_context(|| format!("failed to open for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("failed to parse EXIF: {}", path.display()))
}

fn find_capture_time(exif: &Exif) -> Option<(NaiveDateTime, CaptureField)> {
    CaptureField::SEARCH_ORDER.iter().find_map(|&field| {
        let raw = ascii_value(exif, field.tag())?;
        parse_capture_time(&raw).map(|dt| (dt, field))
    })
}

fn ascii_value(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .map(|raw| String::from_utf8_lossy(raw).into_owned()),
        _ => None,
    }
}

pub(crate) fn parse_capture_time(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(normalized, CAPTURE_TIME_FORMAT).ok()
}
