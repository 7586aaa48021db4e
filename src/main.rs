use clap::{Parser, Subcommand};
use std::path::PathBuf;
use texnaming::batch::{self, AssetReport, BatchOptions};
use texnaming::config::{self, Config, DocumentFormat};
use texnaming::{output, scan, sink::FsSink};

/// Shared flags for commands that take texture paths.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Texture files or directories to scan for textures
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Only scan the top level of each directory
    #[arg(long)]
    non_recursive: bool,
}

#[derive(Parser)]
#[command(name = "texnaming")]
#[command(about = "Suffix-driven texture settings for game asset pipelines")]
#[command(long_about = "\
Suffix-driven texture settings for game asset pipelines

Texture file names carry their settings as trailing suffixes. The rule table
(Config.json) lists which suffixes are allowed at each position and what each
one means:

  T_Rock_cc_nml.png
         │  └── texture type   → compression, sRGB, mip generation, group
         └───── address mode   → U/V wrapping (cc = clamp/clamp)

Names that do not match the table are rejected (and optionally deleted).
Valid names get their effective settings written next to the image:

  T_Rock_cc_nml.png.texture.json

Logging goes to stderr and is controlled with RUST_LOG (default: warn).

Run 'texnaming gen-config' to print a stock rule table.")]
#[command(version)]
struct Cli {
    /// Rule table (.json, or .toml)
    #[arg(long, default_value = "Config.json", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate names and write texture settings sidecars
    Apply {
        #[command(flatten)]
        input: InputArgs,

        /// Delete textures whose names fail validation
        #[arg(long)]
        delete: bool,
    },
    /// Validate names and show resolved settings without writing anything
    Check(InputArgs),
    /// Print a stock rule table
    GenConfig,
    /// Print the rule table in canonical form
    Normalize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Apply { input, delete } => {
            let config = Config::load(&cli.config)?;
            let paths = texture_paths(&input)?;
            let (tx, printer) = spawn_printer();
            let summary = batch::run_batch(
                &paths,
                &config,
                &FsSink::new(),
                BatchOptions {
                    delete_on_suffix_error: delete,
                },
                Some(tx),
            );
            printer.join().unwrap();
            output::print_apply_summary(&summary);
        }
        Command::Check(input) => {
            let config = Config::load(&cli.config)?;
            let paths = texture_paths(&input)?;
            let (tx, printer) = spawn_printer();
            let summary = batch::check_batch(&paths, &config, Some(tx));
            printer.join().unwrap();
            output::print_check_summary(&summary);
            if summary.rejected() > 0 {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
        Command::Normalize => {
            let config = Config::load(&cli.config)?;
            println!("{}", config.render(DocumentFormat::from_path(&cli.config))?);
        }
    }

    Ok(())
}

/// Expand the inputs into texture paths, as strings the batch can parse.
fn texture_paths(input: &InputArgs) -> Result<Vec<String>, scan::ScanError> {
    let paths = scan::expand_inputs(&input.paths, !input.non_recursive)?;
    if paths.is_empty() {
        println!("No textures found");
    }
    Ok(paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

/// Print asset reports as the batch produces them.
fn spawn_printer() -> (
    std::sync::mpsc::Sender<AssetReport>,
    std::thread::JoinHandle<()>,
) {
    let (tx, rx) = std::sync::mpsc::channel::<AssetReport>();
    let printer = std::thread::spawn(move || {
        for (i, report) in rx.into_iter().enumerate() {
            output::print_asset_report(i + 1, &report);
        }
    });
    (tx, printer)
}
