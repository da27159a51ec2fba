use crate::requirements::{CloudProvider, DeploymentStrategy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autodeploy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze a repository and decide how to deploy it")]
#[command(long_about = "Analyzes a code repository (language, framework, dependencies, entry point, port, database needs) and turns it plus a plain-language deployment description into an infrastructure decision: compute model, sizing, networking, data services and a cost estimate.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository and display the detected profile
    Analyze {
        /// Path to the repository to analyze
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,

        /// Output analysis results in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Analyze a repository and decide its infrastructure
    Plan {
        /// Path to the repository to analyze
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,

        /// Plain-language deployment description
        #[arg(short, long, value_name = "TEXT")]
        description: String,

        /// Cloud provider, overriding the description (aws, gcp, azure)
        #[arg(short, long, value_name = "PROVIDER")]
        provider: Option<CloudProvider>,

        /// Deployment type, overriding the description (vm, container, kubernetes, serverless)
        #[arg(long, value_name = "TYPE")]
        deployment_type: Option<DeploymentStrategy>,

        /// Output the decision in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show supported languages, frameworks and manifests
    Support {
        /// Show only languages
        #[arg(long)]
        languages: bool,

        /// Show only frameworks
        #[arg(long)]
        frameworks: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
