use crate::exif_reader::{read_capture_time, CaptureField};
use crate::extensions::ExtensionSet;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateSource {
    Exif(CaptureField),
    FileModified,
}

/// Best-known timestamp of a file, in local wall-clock time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedDate {
    pub timestamp: NaiveDateTime,
    pub source: DateSource,
}

impl ResolvedDate {
    pub fn is_capture_time(&self) -> bool {
        matches!(self.source, DateSource::Exif(_))
    }
}

/// Resolves the timestamp of `path`.
///
/// Images (by `extension`, already lowercased with its dot) are probed for an
/// embedded capture time first. Everything else, and every image without a
/// usable one, gets the file's modification time. The only error is failing
/// to stat the file.
pub fn resolve_date(
    path: &Path,
    extension: &str,
    image_extensions: &ExtensionSet,
) -> io::Result<ResolvedDate> {
    if image_extensions.contains(extension) {
        if let Some((timestamp, field)) = read_capture_time(path) {
            return Ok(ResolvedDate {
                timestamp,
                source: DateSource::Exif(field),
            });
        }
    }

    Ok(ResolvedDate {
        timestamp: file_modified_local(path)?,
        source: DateSource::FileModified,
    })
}

fn file_modified_local(path: &Path) -> io::Result<NaiveDateTime> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}
