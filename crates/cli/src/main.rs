// gdoctable CLI - read and edit tables in Google Docs documents

mod docs;
mod exit_codes;
mod input;
mod logger;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use gdoctable_config::{ConfigError, Settings};
use gdoctable_docs_client::DocsError;
use gdoctable_planner::PlanError;

use exit_codes::{
    plan_exit_code, EXIT_CONFIG_INVALID, EXIT_DOCS_AUTH, EXIT_DOCS_NOT_AUTH, EXIT_DOCS_NOT_FOUND,
    EXIT_DOCS_UPSTREAM, EXIT_DOCS_VALIDATION, EXIT_PLAN_TABLE_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "gdoctable")]
#[command(about = "Read and edit tables in Google Docs documents")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// OAuth access token with the documents scope (overrides saved credentials)
    #[arg(long, global = true, env = "GDOCTABLE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Docs API base URL (default from settings)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Settings file (default: ~/.config/gdoctable/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Include every raw API response in the output
    #[arg(long, global = true)]
    show_api_responses: bool,

    /// Print JSON on one line
    #[arg(long, global = true)]
    compact: bool,

    /// Log planning steps to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

/// Which table of the document to work on.
#[derive(Args)]
struct TableArg {
    /// Zero-based index among the document's tables
    #[arg(long = "table", default_value_t = 0, value_name = "N")]
    index: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List every table with its values and position
    Tables {
        document_id: String,
    },

    /// Print the values of one table
    Values {
        document_id: String,
        #[command(flatten)]
        table: TableArg,
    },

    /// Write values into a table, adding rows and columns when needed
    #[command(after_help = "\
Examples:
  gdoctable set DOC_ID --values '[[\"Name\", \"Qty\"], [\"Apples\", 3]]'
  gdoctable set DOC_ID --table 1 --values @values.json
  gdoctable set DOC_ID --blocks '[{\"range\": {\"startRowIndex\": 2, \"startColumnIndex\": 1}, \"values\": [[\"x\"]]}]'")]
    Set {
        document_id: String,
        #[command(flatten)]
        table: TableArg,

        /// 2-D array written from the top-left cell (JSON, @file, or -)
        #[arg(long, value_name = "JSON", required_unless_present = "blocks", conflicts_with = "blocks")]
        values: Option<String>,

        /// Value blocks with their own start cells (JSON, @file, or -)
        #[arg(long, value_name = "JSON")]
        blocks: Option<String>,
    },

    /// Add rows below the last row of a table
    AppendRow {
        document_id: String,
        #[command(flatten)]
        table: TableArg,

        /// Rows to append as a 2-D array (JSON, @file, or -)
        #[arg(long, value_name = "JSON")]
        values: String,
    },

    /// Delete a whole table
    DeleteTable {
        document_id: String,
        #[command(flatten)]
        table: TableArg,
    },

    /// Delete rows and/or columns of a table
    #[command(after_help = "\
Examples:
  gdoctable delete DOC_ID --rows 0,3
  gdoctable delete DOC_ID --table 2 --columns 1 --rows 4")]
    Delete {
        document_id: String,
        #[command(flatten)]
        table: TableArg,

        /// Zero-based row indices, comma separated
        #[arg(long, value_delimiter = ',', value_name = "N,...")]
        rows: Vec<usize>,

        /// Zero-based column indices, comma separated
        #[arg(long, value_delimiter = ',', value_name = "N,...")]
        columns: Vec<usize>,
    },

    /// Create a table, optionally filled with values
    #[command(after_help = "\
Examples:
  gdoctable create DOC_ID --rows 3 --columns 2 --append
  gdoctable create DOC_ID --rows 2 --columns 2 --index 1 --values '[[\"a\", \"b\"], [\"c\", \"d\"]]'")]
    Create {
        document_id: String,

        #[arg(long)]
        rows: usize,

        #[arg(long)]
        columns: usize,

        /// Document offset to insert the table at
        #[arg(long, conflicts_with = "append", allow_negative_numbers = true)]
        index: Option<i64>,

        /// Insert at the end of the document
        #[arg(long)]
        append: bool,

        /// Initial values as a 2-D array (JSON, @file, or -)
        #[arg(long, value_name = "JSON")]
        values: Option<String>,
    },

    /// Replace marker text inside table cells with an inline image
    ReplaceImages {
        document_id: String,
        #[command(flatten)]
        table: TableArg,

        /// Text to replace, e.g. {{logo}}
        #[arg(long)]
        marker: String,

        /// Publicly reachable image URL
        #[arg(long, value_name = "URL")]
        image_url: String,

        /// Image width in points
        #[arg(long, default_value_t = 100.0)]
        width: f64,

        /// Image height in points
        #[arg(long, default_value_t = 100.0)]
        height: f64,

        /// Search every table instead of only --table
        #[arg(long)]
        all_tables: bool,
    },

    /// Save an access token for later commands
    Login {
        /// Label stored next to the token
        #[arg(long)]
        account: Option<String>,
    },

    /// Remove the saved access token
    Logout,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logger::init(if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;

    match cli.command {
        Commands::Login { account } => docs::cmd_login(global.token, account),
        Commands::Logout => docs::cmd_logout(),
        Commands::Tables { document_id } => docs::cmd_tables(&context(global)?, &document_id),
        Commands::Values { document_id, table } => {
            docs::cmd_values(&context(global)?, &document_id, table.index)
        }
        Commands::Set { document_id, table, values, blocks } => {
            docs::cmd_set(&context(global)?, &document_id, table.index, values, blocks)
        }
        Commands::AppendRow { document_id, table, values } => {
            docs::cmd_append_row(&context(global)?, &document_id, table.index, &values)
        }
        Commands::DeleteTable { document_id, table } => {
            docs::cmd_delete_table(&context(global)?, &document_id, table.index)
        }
        Commands::Delete { document_id, table, rows, columns } => {
            docs::cmd_delete(&context(global)?, &document_id, table.index, rows, columns)
        }
        Commands::Create { document_id, rows, columns, index, append, values } => {
            docs::cmd_create(&context(global)?, &document_id, rows, columns, index, append, values)
        }
        Commands::ReplaceImages { document_id, table, marker, image_url, width, height, all_tables } => {
            docs::cmd_replace_images(
                &context(global)?,
                &document_id,
                table.index,
                marker,
                image_url,
                (width, height),
                all_tables,
            )
        }
    }
}

/// Flags layered over the settings file.
fn context(global: GlobalArgs) -> Result<docs::Context, CliError> {
    let settings = match &global.config {
        Some(path) => Settings::load_from(path).map_err(CliError::config)?,
        None => Settings::load(),
    };
    Ok(docs::Context {
        token: global.token,
        api_base: global.api_base.unwrap_or(settings.api_base),
        timeout: Duration::from_secs(settings.timeout_secs),
        show_api_responses: global.show_api_responses || settings.show_api_responses,
        pretty: settings.pretty && !global.compact,
    })
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Create error from a planner error with proper exit code.
    pub fn plan(err: PlanError) -> Self {
        let code = plan_exit_code(&err);
        let hint = match (&err, code) {
            (PlanError::TableNotFound { .. }, EXIT_PLAN_TABLE_NOT_FOUND) => {
                Some("run `gdoctable tables DOC_ID` to list the document's tables".to_string())
            }
            (_, EXIT_DOCS_AUTH) => {
                Some("the token may have expired or lack the documents scope".to_string())
            }
            (_, EXIT_DOCS_NOT_FOUND) => {
                Some("check the document id and that the token's account can open it".to_string())
            }
            (_, EXIT_DOCS_VALIDATION) => {
                Some("the document may have changed since it was read; run the command again".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn docs(err: DocsError) -> Self {
        let code = match &err {
            DocsError::NotAuthenticated => EXIT_DOCS_NOT_AUTH,
            DocsError::Http(401, _) | DocsError::Http(403, _) => EXIT_DOCS_AUTH,
            DocsError::Http(404, _) => EXIT_DOCS_NOT_FOUND,
            DocsError::Validation(..) => EXIT_DOCS_VALIDATION,
            DocsError::Network(_) | DocsError::Http(..) | DocsError::Parse(_) => EXIT_DOCS_UPSTREAM,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: EXIT_CONFIG_INVALID, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
