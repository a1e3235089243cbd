//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Course catalog lookup: load course records into an ordered tree and query them
#[derive(Parser, Debug)]
#[command(name = "courseplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Catalog file (default: catalog_file from settings)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "COURSEPLAN_FILE")]
    pub file: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/courseplan/courseplan.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu (default when no command is given)
    ///
    /// Preloads `--file`, or `catalog_file` from config when set.
    Shell,

    /// Print all courses in course-number order
    List,

    /// Print one course with its prerequisites
    Show {
        /// Course number, case-insensitive
        course: String,
    },

    /// Show the shape of the course tree
    Tree,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print config file location
    Path,
    /// Print a commented config template
    Template,
}
