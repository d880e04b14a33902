//! ModelNet40 dataset tool

use clap::{ArgAction, Parser, Subcommand};
use modelnet_core::acquire::{ensure_downloaded, fetcher_for_url, Acquisition};
use modelnet_core::integrity::verify_entries;
use modelnet_core::{IndexedDataset, LoaderConfig, ModelNet40};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modelnet")]
#[command(about = "Download, verify and inspect the ModelNet40 point-cloud dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dataset root directory
    #[arg(long, env = "MODELNET_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every shard file against its checksum
    Verify,
    /// Fetch and extract the archive if the files do not verify
    Download,
    /// Load a split and print a summary
    Inspect {
        /// Inspect the evaluation split instead of the training split
        #[arg(long)]
        test: bool,
        /// Print one sample
        #[arg(long)]
        index: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = LoaderConfig::from_env()?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    let descriptor = config.load_descriptor()?;

    match cli.command {
        Commands::Verify => {
            let issues = verify_entries(&config.root, &descriptor.name, &descriptor.all_entries());
            if issues.is_empty() {
                info!("All {} files verified", descriptor.all_entries().len());
                return Ok(ExitCode::SUCCESS);
            }
            for issue in &issues {
                println!("{}", issue);
            }
            Ok(ExitCode::FAILURE)
        }
        Commands::Download => {
            let fetcher = fetcher_for_url(&descriptor.url, &config.http)?;
            match ensure_downloaded(&config.root, &descriptor, fetcher.as_ref())? {
                Acquisition::AlreadyPresent => info!("Dataset already present"),
                Acquisition::Downloaded { dataset_dir, .. } => {
                    info!("Dataset extracted to {}", dataset_dir.display())
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { test, index } => {
            config.train = !test;
            let dataset = ModelNet40::new(config.options()?)?;

            println!("split:   {}", dataset.split());
            println!("samples: {}", dataset.len());
            println!("points:  {:?}", &dataset.points().shape()[1..]);
            for (label, count) in dataset.class_counts() {
                let name = dataset.category_name(label as i64).unwrap_or("?");
                println!("  {:>3} {:<12} {}", label, name, count);
            }

            if let Some(index) = index {
                let (points, label) = dataset.get(index)?;
                println!(
                    "sample {}: label {} ({}), first point {:?}",
                    index,
                    label,
                    dataset.category_name(label).unwrap_or("?"),
                    points.outer_iter().next().map(|p| p.to_vec())
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
