use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use vibes_viz::app::{App, BundleRequest};
use vibes_viz::config::{ConfigLoader, ConfigOverrides};
use vibes_viz::error::VibesError;
use vibes_viz::output::{HumanOutput, JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "vibes-viz")]
#[command(about = "Produce SODA-based visualizations from the output of the VIBES pipeline")]
#[command(version, author)]
struct Cli {
    /// Print machine-readable JSON instead of a text summary
    #[arg(long, global = true)]
    json: bool,

    /// Path to a vibes-viz.json config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Write one page per bacterial genome")]
    Render(RenderArgs),
    #[command(about = "Inline data, stylesheet and bundle into one HTML file")]
    Bundle(BundleArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// The top-level directory of VIBES output files
    #[arg(value_name = "DIR")]
    vibes_output_dir: Utf8PathBuf,

    /// Path to the VIBES-SODA JavaScript bundle
    #[arg(short = 'b', value_name = "BUNDLE_JS")]
    bundle: Option<Utf8PathBuf>,

    /// Path to the template HTML file
    #[arg(short = 't', value_name = "TEMPLATE_HTML")]
    template: Option<Utf8PathBuf>,

    /// Path to the output directory
    #[arg(short = 'o', value_name = "DIR")]
    outdir: Option<Utf8PathBuf>,
}

#[derive(Args)]
struct BundleArgs {
    #[arg(long)]
    data: Utf8PathBuf,

    /// Defaults to the config file's stylesheet
    #[arg(long)]
    css: Option<Utf8PathBuf>,

    /// Defaults to the config file's bundle
    #[arg(long)]
    soda: Option<Utf8PathBuf>,

    /// Defaults to the config file's template
    #[arg(long)]
    template: Option<Utf8PathBuf>,

    #[arg(short = 'o', default_value = "vibes-blob.html")]
    output: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<VibesError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &VibesError) -> u8 {
    match error {
        VibesError::Format { .. } | VibesError::MissingAuthority(_) => 2,
        VibesError::UnknownSequenceLength { .. }
        | VibesError::UnknownVirusLength { .. }
        | VibesError::BucketShape(_) => 3,
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
    let resolved = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => {
            let app = App::new(resolved.with_overrides(ConfigOverrides {
                bundle: args.bundle,
                template: args.template,
                outdir: args.outdir,
            }));
            match output_mode {
                OutputMode::Json => {
                    let summary = app.render(&args.vibes_output_dir, &JsonOutput)?;
                    JsonOutput::print_summary(&summary).into_diagnostic()?;
                }
                OutputMode::Human => {
                    let summary = app.render(&args.vibes_output_dir, &HumanOutput)?;
                    HumanOutput::print_summary(&summary);
                }
            }
            Ok(())
        }
        Commands::Bundle(args) => {
            let stylesheet = args
                .css
                .or_else(|| resolved.stylesheet.clone())
                .ok_or_else(|| {
                    miette::Report::msg(
                        "no stylesheet given (use --css or set `stylesheet` in the config)",
                    )
                })?;
            let request = BundleRequest {
                template: args.template.unwrap_or_else(|| resolved.template.clone()),
                data: args.data,
                stylesheet,
                bundle: args.soda.unwrap_or_else(|| resolved.bundle.clone()),
                output: args.output,
            };
            let app = App::new(resolved);
            match output_mode {
                OutputMode::Json => {
                    let result = app.bundle(&request, &JsonOutput)?;
                    JsonOutput::print_bundle(&result).into_diagnostic()?;
                }
                OutputMode::Human => {
                    let result = app.bundle(&request, &HumanOutput)?;
                    HumanOutput::print_bundle(&result);
                }
            }
            Ok(())
        }
    }
}
