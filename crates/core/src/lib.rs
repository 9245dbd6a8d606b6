mod apply;
mod config;
mod exif_reader;
mod extensions;
mod metadata;
mod naming;
mod planner;
mod sequence;

#[cfg(test)]
mod test_support;

pub use apply::{apply_plan, ApplyError, ApplyOptions, ApplyResult, CommittedMove};
pub use config::{app_paths, load_config, AppConfig, AppPaths, DEFAULT_MAX_COLLISION_SUFFIX};
pub use exif_reader::{read_capture_time, CaptureField, CAPTURE_TIME_FORMAT};
pub use extensions::{extension_of, normalize_extension, ExtensionSet, DEFAULT_IMAGE_EXTENSIONS};
pub use metadata::{resolve_date, DateSource, ResolvedDate};
pub use naming::{date_key, file_name, relative_destination};
pub use planner::{
    generate_plan, plan_files, MovePlan, PlanError, PlanOptions, PlanStats, PlannedMove,
};
pub use sequence::{format_sequence, SequenceAllocator, MAX_PADDED_SEQUENCE, SEQUENCE_WIDTH};
