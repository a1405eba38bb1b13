use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use asset_pipeline::{DEFAULT_CONFIG_FILE, PipelineFile, Resolution};

#[derive(Parser)]
#[command(name = "asset-pipeline")]
#[command(about = "Resolve bundler transform pipelines from a declarative rule table", long_about = None)]
struct Cli {
    /// Path to the pipeline configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list the entries it declares.
    Check,
    /// Print the transform chain applied to each path.
    Resolve {
        /// Candidate source paths to resolve.
        paths: Vec<PathBuf>,
    },
    /// Print the versioned artifact name for every entry.
    Artifacts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = PipelineFile::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let pipeline = file
        .into_pipeline()
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;

    match cli.cmd {
        Commands::Check => {
            println!(
                "{} entries, {} rules, version {}",
                pipeline.entries().len(),
                pipeline.rules().len(),
                pipeline.version()
            );
            for entry in pipeline.entries() {
                println!("  {} ({} sources)", entry.name, entry.sources.len());
            }
        }
        Commands::Resolve { paths } => {
            for path in paths {
                match pipeline.transforms_for(&path) {
                    Ok(Resolution::Transform(steps)) => {
                        let names: Vec<&str> =
                            steps.iter().map(|step| step.name.as_str()).collect();
                        let marker = if pipeline.is_parse_exempt(&path.to_string_lossy()) {
                            " [no-parse]"
                        } else {
                            ""
                        };
                        println!("{}: {}{}", path.display(), names.join(" -> "), marker);
                    }
                    Ok(Resolution::PassThrough) => {
                        println!("{}: pass-through", path.display());
                    }
                    // Per-file failures are reported and never abort the rest.
                    Err(err) => eprintln!("{}: {}", path.display(), err),
                }
            }
        }
        Commands::Artifacts => {
            for (entry, artifact) in pipeline.artifact_names() {
                println!("{}: {}", entry, artifact);
            }
        }
    }

    Ok(())
}
