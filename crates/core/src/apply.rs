use crate::config::DEFAULT_MAX_COLLISION_SUFFIX;
use crate::planner::MovePlan;
use filetime::FileTime;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApplyOptions {
    pub dry_run: bool,
    /// Highest `_k` suffix tried before giving up on a destination.
    pub max_collision_suffix: usize,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_collision_suffix: DEFAULT_MAX_COLLISION_SUFFIX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommittedMove {
    pub source: PathBuf,
    pub planned: PathBuf,
    pub destination: PathBuf,
}

impl CommittedMove {
    pub fn disambiguated(&self) -> bool {
        self.planned != self.destination
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub dry_run: bool,
    pub moves: Vec<CommittedMove>,
}

impl ApplyResult {
    pub fn processed(&self) -> usize {
        self.moves.len()
    }

    pub fn disambiguated(&self) -> usize {
        self.moves.iter().filter(|m| m.disambiguated()).count()
    }
}

/// Commit failures. Moves before the failing one stay in place; `committed`
/// says how many.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to create directory {} ({committed} file(s) already moved)", path.display())]
    CreateDir {
        path: PathBuf,
        committed: usize,
        #[source]
        source: io::Error,
    },
    #[error(
        "no free name for {} after {attempts} suffixes ({committed} file(s) already moved)",
        planned.display()
    )]
    CollisionsExhausted {
        planned: PathBuf,
        attempts: usize,
        committed: usize,
    },
    #[error(
        "failed to move {} -> {} ({committed} file(s) already moved)",
        from.display(),
        to.display()
    )]
    Move {
        from: PathBuf,
        to: PathBuf,
        committed: usize,
        #[source]
        source: io::Error,
    },
}

/// Executes `plan` in order, stopping at the first failure.
///
/// Destination directories are created in both modes. In dry-run mode no
/// source file is touched and planned paths are reported as-is.
pub fn apply_plan(plan: &MovePlan, options: &ApplyOptions) -> Result<ApplyResult, ApplyError> {
    let mut moves = Vec::with_capacity(plan.moves.len());

    for planned in &plan.moves {
        let committed = moves.len();
        if let Some(parent) = planned.destination.parent() {
            fs::create_dir_all(parent).map_err(|source| ApplyError::CreateDir {
                path: parent.to_path_buf(),
                committed,
                source,
            })?;
        }

        if options.dry_run {
            info!(
                "[DRY RUN] mv {} -> {}",
                planned.source.display(),
                planned.destination.display()
            );
            moves.push(CommittedMove {
                source: planned.source.clone(),
                planned: planned.destination.clone(),
                destination: planned.destination.clone(),
            });
            continue;
        }

        let destination = free_destination(&planned.destination, options.max_collision_suffix)
            .ok_or_else(|| ApplyError::CollisionsExhausted {
                planned: planned.destination.clone(),
                attempts: options.max_collision_suffix,
                committed,
            })?;

        info!(
            "Moving: {} -> {}",
            planned.source.display(),
            destination.display()
        );
        move_file(&planned.source, &destination).map_err(|source| ApplyError::Move {
            from: planned.source.clone(),
            to: destination.clone(),
            committed,
            source,
        })?;

        moves.push(CommittedMove {
            source: planned.source.clone(),
            planned: planned.destination.clone(),
            destination,
        });
    }

    Ok(ApplyResult {
        dry_run: options.dry_run,
        moves,
    })
}

/// First of `planned`, `stem_1.ext`, `stem_2.ext`, ... that does not exist.
fn free_destination(planned: &Path, max_suffix: usize) -> Option<PathBuf> {
    if !occupied(planned) {
        return Some(planned.to_path_buf());
    }

    (1..=max_suffix)
        .map(|n| with_suffix(planned, n))
        .find(|candidate| {
            let taken = occupied(candidate);
            if taken {
                debug!("Destination taken: {}", candidate.display());
            }
            !taken
        })
}

// Dangling symlinks count as taken.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn with_suffix(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut name = format!("{stem}_{n}");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Cross-device move, copying: {}", from.display());
            copy_then_remove(from, to)
        }
        other => other,
    }
}

/// Copy keeping the modification time, then drop the source. A failed copy
/// leaves nothing behind at `to`.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(&fs::metadata(from)?);
    let copied = fs::copy(from, to).and_then(|_| filetime::set_file_mtime(to, mtime));
    if let Err(err) = copied {
        let _ = fs::remove_file(to);
        return Err(err);
    }
    fs::remove_file(from)
}
