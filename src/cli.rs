use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use versecraft::community::SortOrder;

/// versecraft - highlight, compare, store and generate Verse scripts
#[derive(Parser, Debug)]
#[command(name = "versecraft", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a Verse snippet with syntax colouring
    Highlight {
        /// File path, `-` for stdin, or `script:<id>` for a saved script
        #[arg(value_hint = ValueHint::FilePath)]
        source: String,

        /// Print `kind:"text"` tokens instead of colours
        #[arg(long)]
        plain: bool,

        /// Hide the line number gutter
        #[arg(long)]
        no_line_numbers: bool,

        /// Lines to mark, e.g. `3,5`
        #[arg(long, value_delimiter = ',')]
        highlight_lines: Vec<usize>,
    },

    /// Compare two versions line by line
    Diff {
        /// Old version: file path, `-`, or `script:<id>`
        #[arg(value_hint = ValueHint::FilePath)]
        old: String,

        /// New version: file path, `-`, or `script:<id>`
        #[arg(value_hint = ValueHint::FilePath)]
        new: String,

        /// Emit the diff as JSON
        #[arg(long)]
        json: bool,

        /// Disable colours
        #[arg(long)]
        no_color: bool,
    },

    /// Manage the local script library
    Scripts {
        #[command(subcommand)]
        action: ScriptsCommand,
    },

    /// Browse community scripts
    Community {
        #[command(subcommand)]
        action: CommunityCommand,
    },

    /// Read the bundled Verse reference
    Docs {
        /// Section id to print, e.g. `functions`
        section: Option<String>,

        /// Print every section whose title or text contains this
        #[arg(long, conflicts_with = "section")]
        query: Option<String>,
    },

    /// Generate Verse code with the AI model
    Generate {
        /// What the code should do
        #[arg(required_unless_present = "examples")]
        prompt: Option<String>,

        /// List sample prompts and exit
        #[arg(long)]
        examples: bool,

        /// Model name (`gemini-flash`, `gemini-pro` or a full model id)
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature between 0.0 and 1.0
        #[arg(long)]
        temperature: Option<f32>,

        /// Extend the code in this file
        #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "edit")]
        continue_from: Option<PathBuf>,

        /// Edit the code in this file (requires --instructions)
        #[arg(long, value_hint = ValueHint::FilePath, requires = "instructions")]
        edit: Option<PathBuf>,

        /// How to change the edited code
        #[arg(long, requires = "edit")]
        instructions: Option<String>,

        /// Integrate the code in this file
        #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "edit")]
        insert: Option<PathBuf>,

        /// Do not add the result to the library
        #[arg(long)]
        no_save: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScriptsCommand {
    /// List saved scripts, most recent first
    List {
        /// Only scripts whose title or prompt contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// Print one script
    Show { id: String },
    /// Save a script from a file
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Replace a script's content, keeping the old content in its history
    Update {
        id: String,
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        #[arg(long, default_value = "Manual edit")]
        description: String,
    },
    /// List a script's versions
    History { id: String },
    /// Compare a version with the current content
    Diff {
        id: String,
        version: u32,
        #[arg(long)]
        no_color: bool,
    },
    /// Make a version the current content
    Restore { id: String, version: u32 },
    /// Remove a script
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CommunityCommand {
    /// List catalog scripts
    List {
        /// Match title, description or author
        #[arg(long)]
        query: Option<String>,

        /// Require a tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, value_enum, default_value_t = SortOrder::Popular)]
        sort: SortOrder,

        /// Catalog JSON file instead of the bundled one
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },
    /// Print a catalog script
    Show {
        id: String,
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },
    /// List every tag in the catalog
    Tags {
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },
    /// Copy a catalog script into the local library
    Save {
        id: String,
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Change one setting
    Set { key: String, value: String },
    /// Print the settings file location
    Path,
}

/// Where a piece of source text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    /// A script in the local library, by id or id prefix
    Script(String),
}

impl Source {
    /// Parse a source argument into a Source
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            return Source::Stdin;
        }
        match arg.strip_prefix("script:") {
            Some(id) if !id.is_empty() => Source::Script(id.to_string()),
            _ => Source::File(PathBuf::from(arg)),
        }
    }
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    generate(shell, &mut cmd, "versecraft", &mut io::stdout());
}
