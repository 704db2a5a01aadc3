//! Document commands plus login/logout.
//!
//! `gdoctable tables|values`: read tables
//! `gdoctable set|append-row`: write values
//! `gdoctable delete|delete-table|create|replace-images`: structural edits
//! `gdoctable login|logout`: manage the saved access token

use std::io::{self, Write};
use std::time::Duration;

use gdoctable_docs_client::{
    delete_auth, load_auth, resolve_token, save_auth, AuthCredentials, DocsClient, DocsError, TOKEN_ENV,
};
use gdoctable_planner::{
    CreateTableRequest, DeletionRequest, EditSession, ImageReplacement, Operation, Outcome,
    Placement, ReplaceScope, SessionOptions, ValueBlock,
};

use crate::exit_codes::*;
use crate::input::{parse_blocks, parse_values, read_json_arg};
use crate::CliError;

/// Resolved global options for document commands.
pub struct Context {
    pub token: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
    pub show_api_responses: bool,
    pub pretty: bool,
}

// ── Read ────────────────────────────────────────────────────────────

pub fn cmd_tables(ctx: &Context, document_id: &str) -> Result<(), CliError> {
    execute(ctx, document_id, 0, Operation::GetTables)
}

pub fn cmd_values(ctx: &Context, document_id: &str, table: usize) -> Result<(), CliError> {
    execute(ctx, document_id, table, Operation::GetValues)
}

// ── Write ───────────────────────────────────────────────────────────

pub fn cmd_set(
    ctx: &Context,
    document_id: &str,
    table: usize,
    values: Option<String>,
    blocks: Option<String>,
) -> Result<(), CliError> {
    let blocks = match (values, blocks) {
        (Some(values), None) => vec![ValueBlock::from_array(values_arg(&values)?)],
        (None, Some(blocks)) => {
            parse_blocks(read_json_arg(&blocks).map_err(CliError::usage)?).map_err(CliError::usage)?
        }
        _ => return Err(CliError::usage("pass exactly one of --values and --blocks")),
    };
    execute(ctx, document_id, table, Operation::SetValues(blocks))
}

pub fn cmd_append_row(ctx: &Context, document_id: &str, table: usize, values: &str) -> Result<(), CliError> {
    execute(ctx, document_id, table, Operation::AppendRow(values_arg(values)?))
}

// ── Structure ───────────────────────────────────────────────────────

pub fn cmd_delete_table(ctx: &Context, document_id: &str, table: usize) -> Result<(), CliError> {
    execute(ctx, document_id, table, Operation::DeleteTable)
}

pub fn cmd_delete(
    ctx: &Context,
    document_id: &str,
    table: usize,
    rows: Vec<usize>,
    columns: Vec<usize>,
) -> Result<(), CliError> {
    execute(
        ctx,
        document_id,
        table,
        Operation::DeleteRowsAndColumns(DeletionRequest { rows, columns }),
    )
}

pub fn cmd_create(
    ctx: &Context,
    document_id: &str,
    rows: usize,
    columns: usize,
    index: Option<i64>,
    append: bool,
    values: Option<String>,
) -> Result<(), CliError> {
    let placement = match (index, append) {
        (Some(index), _) => Some(Placement::AtIndex(index)),
        (None, true) => Some(Placement::Append),
        (None, false) => None,
    };
    let values = match values {
        Some(values) => vec![ValueBlock::from_array(values_arg(&values)?)],
        None => Vec::new(),
    };
    let request = CreateTableRequest { rows, columns, placement, values };
    execute(ctx, document_id, 0, Operation::CreateTable(request))
}

pub fn cmd_replace_images(
    ctx: &Context,
    document_id: &str,
    table: usize,
    marker: String,
    image_url: String,
    (width, height): (f64, f64),
    all_tables: bool,
) -> Result<(), CliError> {
    let replacement = ImageReplacement {
        marker,
        image_uri: image_url,
        width,
        height,
        scope: if all_tables { ReplaceScope::AllTables } else { ReplaceScope::Table },
    };
    execute(ctx, document_id, table, Operation::ReplaceTextsToImages(replacement))
}

// ── Login ───────────────────────────────────────────────────────────

pub fn cmd_login(token: Option<String>, account: Option<String>) -> Result<(), CliError> {
    // Resolve token: --token flag / GDOCTABLE_TOKEN env > interactive prompt
    let token = match resolve_token(token.as_deref(), None, None) {
        Some(t) => t,
        None if atty::is(atty::Stream::Stdin) => {
            eprint!("Access token: ");
            io::stderr().flush().ok();
            let mut buf = String::new();
            io::stdin().read_line(&mut buf)
                .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
            resolve_token(Some(&buf), None, None).ok_or_else(|| {
                CliError::usage("No token provided")
                    .with_hint(format!("pass --token or set {}", TOKEN_ENV))
            })?
        }
        None => {
            return Err(CliError::usage("No token provided and stdin is not a TTY")
                .with_hint(format!("pass --token or set {}", TOKEN_ENV)));
        }
    };

    let creds = AuthCredentials { token, account };
    let path = save_auth(&creds).map_err(|e| CliError {
        code: EXIT_CONFIG_AUTH_STORE,
        message: e,
        hint: None,
    })?;

    eprintln!("Saved access token to {}", path.display());
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    let removed = delete_auth().map_err(|e| CliError {
        code: EXIT_CONFIG_AUTH_STORE,
        message: e,
        hint: None,
    })?;
    if removed {
        eprintln!("Removed saved access token");
    } else {
        eprintln!("No saved access token");
    }
    Ok(())
}

// ── Shared ──────────────────────────────────────────────────────────

fn values_arg(arg: &str) -> Result<Vec<Vec<serde_json::Value>>, CliError> {
    let json = read_json_arg(arg).map_err(CliError::usage)?;
    parse_values(json).map_err(CliError::usage)
}

/// Validate locally, then run one session against the Docs API and print
/// its outcome.
fn execute(ctx: &Context, document_id: &str, table: usize, operation: Operation) -> Result<(), CliError> {
    operation.validate().map_err(CliError::plan)?;

    let token = resolve_token(ctx.token.as_deref(), None, load_auth()).ok_or_else(|| {
        CliError::docs(DocsError::NotAuthenticated)
            .with_hint(format!("pass --token, set {}, or run `gdoctable login`", TOKEN_ENV))
    })?;

    let mut client = DocsClient::new(&ctx.api_base, &token, ctx.timeout).map_err(CliError::docs)?;
    let options = SessionOptions {
        table_index: table,
        show_api_responses: ctx.show_api_responses,
    };
    let outcome = EditSession::new(&mut client, document_id, options)
        .run(operation)
        .map_err(CliError::plan)?;

    print_outcome(&outcome, ctx.pretty)
}

fn print_outcome(outcome: &Outcome, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    }
    .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })
}
