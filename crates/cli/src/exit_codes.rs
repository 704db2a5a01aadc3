//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts branch on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                                  |
//! |---------|------------------|----------------------------------------------|
//! | 0       | Universal        | Success                                      |
//! | 1       | Universal        | General error (unspecified)                  |
//! | 2       | Universal        | CLI usage error (bad args, unreadable input) |
//! | 3-9     | plan             | Request rejected before or while planning    |
//! | 10-19   | docs             | Docs API and credentials                     |
//! | 20-29   | config           | Settings and credential storage              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the mapping functions below

use gdoctable_planner::{PlanError, ServiceError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or malformed JSON input.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Plan (3-9)
// =============================================================================

/// Invalid request: duplicate cells, unsupported value types, empty input,
/// bad creation or image parameters.
pub const EXIT_PLAN_INPUT: u8 = 3;

/// Row or column index outside the current table.
pub const EXIT_PLAN_BOUNDS: u8 = 4;

/// The document has no table at the requested index.
pub const EXIT_PLAN_TABLE_NOT_FOUND: u8 = 5;

/// The fetched table could not be parsed.
pub const EXIT_PLAN_MALFORMED: u8 = 6;

// =============================================================================
// Docs (10-19)
// =============================================================================

/// No access token (flag, env var, or saved credentials).
pub const EXIT_DOCS_NOT_AUTH: u8 = 10;

/// Token rejected (401/403).
pub const EXIT_DOCS_AUTH: u8 = 11;

/// Request rejected by the service (400/422).
pub const EXIT_DOCS_VALIDATION: u8 = 12;

/// Document not found (404).
pub const EXIT_DOCS_NOT_FOUND: u8 = 13;

/// Upstream error (5xx), network failure, or unreadable response.
pub const EXIT_DOCS_UPSTREAM: u8 = 14;

// =============================================================================
// Config (20-29)
// =============================================================================

/// Settings file unreadable or invalid.
pub const EXIT_CONFIG_INVALID: u8 = 20;

/// Credentials file could not be written or removed.
pub const EXIT_CONFIG_AUTH_STORE: u8 = 21;

// =============================================================================
// Mapping
// =============================================================================

/// Map a PlanError to its exit code.
pub fn plan_exit_code(err: &PlanError) -> u8 {
    match err {
        PlanError::DuplicateAddress(_)
        | PlanError::UnsupportedValueType { .. }
        | PlanError::EmptyDeletionRequest
        | PlanError::EmptyValues
        | PlanError::InvalidTableCreationParameters(_)
        | PlanError::InvalidImageReplacement(_) => EXIT_PLAN_INPUT,
        PlanError::IndexOutOfBounds { .. } => EXIT_PLAN_BOUNDS,
        PlanError::TableNotFound { .. } => EXIT_PLAN_TABLE_NOT_FOUND,
        PlanError::MalformedSnapshot(_) => EXIT_PLAN_MALFORMED,
        PlanError::Service(e) => service_exit_code(e),
        PlanError::SessionReused => EXIT_ERROR,
    }
}

/// Map a ServiceError to its exit code.
pub fn service_exit_code(err: &ServiceError) -> u8 {
    match err.status {
        Some(401) | Some(403) => EXIT_DOCS_AUTH,
        Some(400) | Some(422) => EXIT_DOCS_VALIDATION,
        Some(404) => EXIT_DOCS_NOT_FOUND,
        _ => EXIT_DOCS_UPSTREAM,
    }
}
