use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};
use mediasort_core::{
    apply_plan, generate_plan, load_config, AppConfig, ApplyOptions, ApplyResult, ExtensionSet,
    MovePlan, PlanOptions,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "mediasort", version)]
#[command(about = "Rename and organize photos/files into a YYYY/MM tree by date")]
struct Cli {
    /// Source folder containing files
    #[arg(short, long)]
    source: PathBuf,
    /// Destination root folder
    #[arg(short, long)]
    dest: PathBuf,
    /// Limit to extensions, e.g. .jpg png (a bare -e filters nothing)
    #[arg(short, long = "ext", num_args = 0..)]
    ext: Vec<String>,
    /// Do not move anything, only log the planned actions
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Process files in subdirectories too
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// Only process the top level, even if the config enables recursion
    #[arg(long, default_value_t = false, conflicts_with = "recursive")]
    no_recursive: bool,
    /// Verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Log)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Log,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let options = PlanOptions {
        recursive: recursion_enabled(&cli, &config),
        source: cli.source,
        dest: cli.dest,
        extensions: ExtensionSet::new(&cli.ext),
        image_extensions: config.image_extension_set(),
    };
    let plan = generate_plan(&options)?;

    let apply_options = ApplyOptions {
        dry_run: cli.dry_run,
        max_collision_suffix: config.max_collision_suffix,
    };
    let result = apply_plan(&plan, &apply_options)?;

    if cli.output == OutputFormat::Json {
        print_json(&plan, &result)?;
    }

    info!("Done. Processed {} files.", result.processed());
    Ok(())
}

fn recursion_enabled(cli: &Cli, config: &AppConfig) -> bool {
    !cli.no_recursive && (cli.recursive || config.recursive_default)
}

fn print_json(plan: &MovePlan, result: &ApplyResult) -> Result<()> {
    let body = serde_json::json!({ "plan": plan, "result": result });
    let rendered = serde_json::to_string_pretty(&body).context("failed to serialize the plan")?;
    println!("{rendered}");
    Ok(())
}
