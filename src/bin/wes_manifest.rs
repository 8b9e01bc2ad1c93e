use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use wes_manifest::app::{App, BuildOptions, BuildResult, LogSink};
use wes_manifest::config::{ConfigLoader, ConfigOverrides};
use wes_manifest::domain::Caller;
use wes_manifest::error::ManifestError;
use wes_manifest::output::{Destination, JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "wes-manifest")]
#[command(about = "Describe every output file a WES pipeline run is expected to produce")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true, help = "Print summaries as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build the output manifest")]
    Build(BuildArgs),
    #[command(about = "Print the resolved file-template catalog")]
    Catalog(SourceArgs),
}

#[derive(Args, Clone)]
struct SourceArgs {
    #[arg(long, help = "Config file (default: ./wes-manifest.json if present)")]
    config: Option<String>,

    #[arg(long, help = "Catalog JSON to use instead of the built-in one")]
    catalog: Option<Utf8PathBuf>,
}

#[derive(Args, Clone)]
struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(short = 't', long, help = "Describe files for the tumor-only assay")]
    tumor_only: bool,

    #[arg(
        long,
        conflicts_with = "tumor_only",
        help = "Describe files for the matched tumor/normal assay, even if the config says tumor-only"
    )]
    matched: bool,

    #[arg(long, value_enum)]
    caller: Option<Caller>,

    #[arg(long)]
    output_dir: Option<Utf8PathBuf>,

    #[arg(long, conflicts_with = "output_dir", help = "Write the manifest to stdout")]
    stdout: bool,

    #[arg(long, conflicts_with = "stdout")]
    dry_run: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<ManifestError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ManifestError) -> u8 {
    match error {
        ManifestError::ConfigRead(_)
        | ManifestError::ConfigParse(_)
        | ManifestError::CatalogRead(_)
        | ManifestError::CatalogParse(_) => 2,
        ManifestError::MissingField { .. } | ManifestError::UnresolvedPlaceholder { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Commands::Build(args)) => run_build(args, output_mode),
        Some(Commands::Catalog(args)) => run_catalog(args),
        None => Err(miette::Report::msg(
            "command required (try `wes-manifest build --help`)",
        )),
    }
}

fn run_build(args: BuildArgs, output_mode: OutputMode) -> miette::Result<()> {
    let BuildArgs {
        source,
        tumor_only,
        matched,
        caller,
        output_dir,
        stdout,
        dry_run,
    } = args;

    let tumor_only = match (tumor_only, matched) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let resolved = ConfigLoader::resolve(
        source.config.as_deref(),
        ConfigOverrides {
            tumor_only,
            caller,
            catalog: source.catalog,
            output_dir,
        },
    )?;

    let mut options = BuildOptions::from_config(&resolved);
    if stdout {
        options.destination = Destination::Stdout;
    } else if dry_run {
        options.destination = Destination::Discard;
    }

    let app = App::new(resolved.catalog);
    let result = app.build(&options, &LogSink)?;

    // stdout already carries the manifest itself
    if stdout {
        return Ok(());
    }
    match output_mode {
        OutputMode::Json => JsonOutput::print_build(&result).into_diagnostic(),
        OutputMode::Human => {
            print_build_summary(&result);
            Ok(())
        }
    }
}

fn run_catalog(args: SourceArgs) -> miette::Result<()> {
    let resolved = ConfigLoader::resolve(
        args.config.as_deref(),
        ConfigOverrides {
            catalog: args.catalog,
            ..ConfigOverrides::default()
        },
    )?;

    let catalog = App::new(resolved.catalog).catalog(&JsonOutput)?;
    JsonOutput::print_catalog(&catalog).into_diagnostic()
}

fn print_build_summary(result: &BuildResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!(
        "{cyan}WES manifest ({} assay, caller {}){reset}",
        result.mode, result.caller
    );
    for group in &result.groups {
        println!(
            "{green}  {:<16} {:>3} files ({} optional, {} source view){reset}",
            group.key, group.entries, group.optional, group.source_view
        );
        if group.dropped > 0 {
            println!(
                "{yellow}  {:<16} {:>3} not applicable to tumor-only{reset}",
                "", group.dropped
            );
        }
    }
    match &result.output_path {
        Some(path) => println!("{cyan}  written to {path}{reset}"),
        None => println!("{yellow}  dry run, nothing written{reset}"),
    }
}
