use crate::extensions::{extension_of, ExtensionSet};
use crate::metadata::{resolve_date, ResolvedDate};
use crate::naming::{date_key, relative_destination};
use crate::sequence::{SequenceAllocator, MAX_PADDED_SEQUENCE};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub recursive: bool,
    /// Allow-list; empty means every file is a candidate.
    pub extensions: ExtensionSet,
    /// Extensions probed for embedded capture metadata.
    pub image_extensions: ExtensionSet,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            dest: PathBuf::new(),
            recursive: false,
            extensions: ExtensionSet::default(),
            image_extensions: ExtensionSet::default_images(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub extension: String,
    pub resolved: ResolvedDate,
    pub date_key: String,
    pub sequence: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub scanned_files: usize,
    pub skipped_by_filter: usize,
    pub planned: usize,
    pub from_capture_time: usize,
    pub from_file_modified: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovePlan {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub moves: Vec<PlannedMove>,
    pub stats: PlanStats,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Source '{}' does not exist or is not a directory.", .0.display())]
    InvalidSource(PathBuf),
    #[error("failed to scan {}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read modification time of {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scans `options.source` and plans a destination for every candidate.
pub fn generate_plan(options: &PlanOptions) -> Result<MovePlan, PlanError> {
    if !options.source.is_dir() {
        return Err(PlanError::InvalidSource(options.source.clone()));
    }

    let files = collect_files(&options.source, options.recursive)?;
    plan_files(files, options)
}

/// Plans moves for an explicit list of files, in sorted path order.
pub fn plan_files(mut files: Vec<PathBuf>, options: &PlanOptions) -> Result<MovePlan, PlanError> {
    files.sort();

    let mut stats = PlanStats {
        scanned_files: files.len(),
        ..PlanStats::default()
    };
    let mut sequences = SequenceAllocator::new();
    let mut moves = Vec::with_capacity(files.len());

    for path in files {
        if !options.extensions.allows(&path) {
            debug!("Skipping (extension filter): {}", path.display());
            stats.skipped_by_filter += 1;
            continue;
        }

        let planned = plan_file(path, options, &mut sequences)?;
        if planned.resolved.is_capture_time() {
            stats.from_capture_time += 1;
        } else {
            stats.from_file_modified += 1;
        }
        info!(
            "Will move: {} -> {}",
            planned.source.display(),
            planned.destination.display()
        );
        moves.push(planned);
    }

    stats.planned = moves.len();
    Ok(MovePlan {
        source_root: options.source.clone(),
        dest_root: options.dest.clone(),
        moves,
        stats,
    })
}

fn plan_file(
    path: PathBuf,
    options: &PlanOptions,
    sequences: &mut SequenceAllocator,
) -> Result<PlannedMove, PlanError> {
    let extension = extension_of(&path);
    let resolved = match resolve_date(&path, &extension, &options.image_extensions) {
        Ok(resolved) => resolved,
        Err(source) => return Err(PlanError::Stat { path, source }),
    };

    let key = date_key(&resolved.timestamp);
    let sequence = sequences.next(&key);
    if sequence == MAX_PADDED_SEQUENCE + 1 {
        warn!(
            "More than {MAX_PADDED_SEQUENCE} files dated {key}; sequence numbers widen past four digits"
        );
    }

    let destination =
        options
            .dest
            .join(relative_destination(&resolved.timestamp, sequence, &extension));

    Ok(PlannedMove {
        source: path,
        destination,
        extension,
        resolved,
        date_key: key,
        sequence,
    })
}

fn collect_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, PlanError> {
    let scan_err = |source: io::Error| PlanError::Scan {
        path: root.to_path_buf(),
        source,
    };
    let mut out = Vec::new();

    if recursive {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(scan_err(err.into())),
                Err(err) => {
                    warn!("Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if entry.path().is_file() {
                out.push(entry.into_path());
            }
        }
    } else {
        for entry in fs::read_dir(root).map_err(scan_err)? {
            let path = entry.map_err(scan_err)?.path();
            if path.is_file() {
                out.push(path);
            }
        }
    }

    out.sort();
    Ok(out)
}
