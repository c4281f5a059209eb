// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands, their arguments and the global output flags.

use boxrun::config::ImagePolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boxrun")]
#[command(about = "Detect a project's language and run it in a disposable container")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a config file (default: discover boxrun.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect, build and run a project from a directory or git URL
    Run {
        /// Local directory or git URL (http, https, git@, ssh)
        source: String,

        /// Skip detection and use this ecosystem
        #[arg(short, long)]
        lang: Option<String>,

        /// Do not ask for confirmation of the detected ecosystem
        #[arg(short, long)]
        yes: bool,

        /// Require this text in the container's stdout
        #[arg(short, long)]
        marker: Option<String>,
    },

    /// Print the detected ecosystem of a directory
    Detect {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the ecosystems boxrun can detect
    Languages,

    /// Run the fixture suite and write a report
    Suite {
        /// Only run cases of this ecosystem
        #[arg(long)]
        only: Option<String>,

        /// Number of cases to run concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// When to remove built images: keep, before, after or both
        #[arg(long)]
        images: Option<ImagePolicy>,

        /// Fixture projects directory
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Directory for test_results.json and report.html
        #[arg(long)]
        results: Option<PathBuf>,

        /// Write missing built-in fixture projects before running
        #[arg(long)]
        generate: bool,

        /// Run the critical cases first and ask before continuing if they fail
        #[arg(long)]
        preflight: bool,

        /// Continue after a failed preflight without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove every image built by boxrun
    Clean,

    /// Initialize a new boxrun.yml configuration file
    Init {
        /// Overwrite an existing boxrun.yml
        #[arg(short, long)]
        force: bool,
    },
}
