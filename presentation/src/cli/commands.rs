//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for octophyx_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => octophyx_domain::OutputFormat::Text,
            OutputFormat::Json => octophyx_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for octophyx
#[derive(Parser, Debug)]
#[command(name = "octophyx")]
#[command(author, version, about = "Physics explanations, animations and diagrams on demand")]
#[command(long_about = r#"
OctoPhyx turns a physics topic into a rendered explanation, Manim animation
code and a diagram.

A submitted topic moves through pending -> generating -> completed | failed.
Generation runs in the background; `generate` polls the record until it
settles. With --detach it prints the new id right away and then waits
quietly, so the record still settles before the process exits.

`solve` does the same for a written problem: a step-by-step solution and
a diagram, plus bookmarks and hints afterwards.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./octophyx.toml     Project-level config
3. ~/.config/octophyx/config.toml   Global config

Example:
  octophyx generate "Snell's Law"
  octophyx generate "Quantum Tunneling" --owner 7 --detach
  octophyx solve "A 2 kg block slides down a 30 degree incline..." --category mechanics
  octophyx hints 3
  octophyx render notes.md
  octophyx serve --bind 0.0.0.0:3000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format in config)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a topic and wait for its content
    Generate {
        /// Physics topic, e.g. "Newton's Second Law"
        topic: String,

        /// Owner (user id) to record the request under
        #[arg(long, value_name = "ID")]
        owner: Option<i64>,

        /// Print the new id at once and skip progress output; still exits
        /// only after the request settles (Ctrl+C fails it)
        #[arg(long)]
        detach: bool,
    },

    /// Submit a physics problem and wait for a step-by-step solution
    Solve {
        /// Problem statement, at least 10 characters
        text: String,

        /// Owner (user id) to record the problem under
        #[arg(long, value_name = "ID")]
        owner: Option<i64>,

        /// Topic category, e.g. mechanics or optics
        #[arg(long, value_name = "CATEGORY")]
        category: Option<String>,

        /// Print the new id at once and skip progress output
        #[arg(long)]
        detach: bool,
    },

    /// Show one problem and its solution
    Problem {
        /// Problem id
        id: i64,
    },

    /// List an owner's problems, newest first
    Problems {
        #[arg(long, value_name = "ID")]
        owner: i64,
    },

    /// Toggle the bookmark on a problem
    Bookmark {
        /// Problem id
        id: i64,
    },

    /// Ask for hints on a problem without revealing the answer
    Hints {
        /// Problem id
        id: i64,
    },

    /// Show one content request
    Show {
        /// Content request id
        id: i64,
    },

    /// List an owner's content requests, newest first
    History {
        #[arg(long, value_name = "ID")]
        owner: i64,
    },

    /// Render a markdown file with math to the terminal
    Render {
        /// Markdown file; reads stdin when omitted
        path: Option<PathBuf>,
    },

    /// Browse the built-in topic catalog
    Topics {
        /// Search names and keywords
        query: Option<String>,

        /// Only list topics in this category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<String>,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}
