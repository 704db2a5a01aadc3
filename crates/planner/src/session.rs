//! One edit request against one document, driven as a small state machine.
//!
//! ```text
//! Idle → SnapshotFetched → [GrowthPlanned → GrowthApplied → SnapshotFetched]
//!      → ContentPlanned → ContentApplied → Done
//! ```
//!
//! Every round trip completes before the next batch is planned, because each
//! batch is computed from the document the previous one produced. Any error
//! moves the session to `Failed`; nothing is retried or rolled back.

use std::fmt;

use gdoctable_protocol::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::build_content_ops;
use crate::creation::{appended_base_index, plan_creation, CreateTableRequest};
use crate::deletion::{plan_deletion, plan_table_deletion, DeletionRequest};
use crate::error::PlanError;
use crate::growth::{growth_ops, required_growth};
use crate::images::{plan_image_replacement, ImageReplacement, ReplaceScope};
use crate::ops::{to_requests, EditOp, Placement};
use crate::service::{fetch_document, find_table, last_table, tables, DocumentService};
use crate::snapshot::{parse_table, Grid};
use crate::values::{resolve, Assignment, ValueBlock};

pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exactly one thing a session does.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetTables,
    GetValues,
    SetValues(Vec<ValueBlock>),
    /// Rows written below the table's current last row.
    AppendRow(Vec<Vec<Value>>),
    DeleteTable,
    DeleteRowsAndColumns(DeletionRequest),
    CreateTable(CreateTableRequest),
    ReplaceTextsToImages(ImageReplacement),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetTables => "get-tables",
            Operation::GetValues => "get-values",
            Operation::SetValues(_) => "set-values",
            Operation::AppendRow(_) => "append-row",
            Operation::DeleteTable => "delete-table",
            Operation::DeleteRowsAndColumns(_) => "delete-rows-columns",
            Operation::CreateTable(_) => "create-table",
            Operation::ReplaceTextsToImages(_) => "replace-texts-to-images",
        }
    }

    /// Checks that need no snapshot. Runs before anything is fetched.
    pub fn validate(&self) -> Result<(), PlanError> {
        match self {
            Operation::SetValues(blocks) => resolve(blocks).map(|_| ()),
            Operation::AppendRow(values) => {
                if values.iter().all(Vec::is_empty) {
                    return Err(PlanError::EmptyValues);
                }
                resolve(&[ValueBlock::from_array(values.clone())]).map(|_| ())
            }
            Operation::DeleteRowsAndColumns(request) if request.is_empty() => {
                Err(PlanError::EmptyDeletionRequest)
            }
            Operation::CreateTable(request) => plan_creation(request).map(|_| ()),
            Operation::ReplaceTextsToImages(replacement) => replacement.validate(),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePosition {
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub index: usize,
    pub values: Vec<Vec<String>>,
    pub table_position: TablePosition,
}

/// What a session hands back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<String>>>,
    /// Raw service responses, only when requested.
    #[serde(rename = "responseFromAPIs", default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<Value>>,
    pub library_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    SnapshotFetched,
    GrowthPlanned,
    GrowthApplied,
    ContentPlanned,
    ContentApplied,
    Done,
    Failed,
}

impl SessionState {
    fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (_, Failed)
                | (Idle, SnapshotFetched | GrowthPlanned | ContentPlanned)
                | (SnapshotFetched, GrowthPlanned | ContentPlanned | Done)
                | (GrowthPlanned, GrowthApplied)
                | (GrowthApplied, SnapshotFetched | Done)
                | (ContentPlanned, ContentApplied | Done)
                | (ContentApplied, Done)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::SnapshotFetched => "snapshot-fetched",
            SessionState::GrowthPlanned => "growth-planned",
            SessionState::GrowthApplied => "growth-applied",
            SessionState::ContentPlanned => "content-planned",
            SessionState::ContentApplied => "content-applied",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Which table of the document to work on (0-based, tables only).
    pub table_index: usize,
    /// Keep every raw service response in the outcome.
    pub show_api_responses: bool,
}

/// Single-use driver for one [`Operation`].
pub struct EditSession<'a, S: DocumentService + ?Sized> {
    service: &'a mut S,
    document_id: String,
    options: SessionOptions,
    state: SessionState,
    history: Vec<SessionState>,
    responses: Vec<Value>,
}

impl<'a, S: DocumentService + ?Sized> EditSession<'a, S> {
    pub fn new(service: &'a mut S, document_id: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            service,
            document_id: document_id.into(),
            options,
            state: SessionState::Idle,
            history: vec![SessionState::Idle],
            responses: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    pub fn run(&mut self, operation: Operation) -> Result<Outcome, PlanError> {
        if self.state != SessionState::Idle {
            return Err(PlanError::SessionReused);
        }
        log::debug!("{} on document {}", operation.name(), self.document_id);

        match self.dispatch(operation) {
            Ok(outcome) => {
                self.advance(SessionState::Done);
                Ok(outcome)
            }
            Err(err) => {
                log::debug!("session failed in state {}: {}", self.state, err);
                self.advance(SessionState::Failed);
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, operation: Operation) -> Result<Outcome, PlanError> {
        operation.validate()?;

        match operation {
            Operation::GetTables => self.get_tables(),
            Operation::GetValues => {
                let grid = self.fetch_grid()?;
                let outcome = Outcome { values: Some(grid.values()), ..self.outcome() };
                Ok(self.finish(outcome))
            }
            Operation::SetValues(blocks) => {
                let assignments = resolve(&blocks)?;
                let grid = self.fetch_grid()?;
                self.write_values(grid, assignments)
            }
            Operation::AppendRow(values) => {
                let grid = self.fetch_grid()?;
                let assignments = resolve(&[ValueBlock::at(grid.rows(), 0, values)])?;
                self.write_values(grid, assignments)
            }
            Operation::DeleteTable => {
                let grid = self.fetch_grid()?;
                self.apply_content(vec![plan_table_deletion(&grid)])?;
                let outcome = self.outcome();
                Ok(self.finish(outcome))
            }
            Operation::DeleteRowsAndColumns(request) => {
                let grid = self.fetch_grid()?;
                let ops = plan_deletion(&grid, &request)?;
                self.apply_content(ops)?;
                let outcome = self.outcome();
                Ok(self.finish(outcome))
            }
            Operation::CreateTable(request) => self.create_table(&request),
            Operation::ReplaceTextsToImages(replacement) => self.replace_images(&replacement),
        }
    }

    fn get_tables(&mut self) -> Result<Outcome, PlanError> {
        let document = self.fetch_document()?;
        let mut infos = Vec::new();
        for (index, element) in tables(&document).into_iter().enumerate() {
            let grid = parse_table(element)?;
            infos.push(TableInfo {
                index,
                values: grid.values(),
                table_position: TablePosition {
                    start_index: element.start_index,
                    end_index: element.end_index,
                },
            });
        }
        self.advance(SessionState::SnapshotFetched);
        let outcome = Outcome { tables: Some(infos), ..self.outcome() };
        Ok(self.finish(outcome))
    }

    /// Grow if needed (separate batch + re-fetch), then write the values.
    fn write_values(&mut self, grid: Grid, assignments: Vec<Assignment>) -> Result<Outcome, PlanError> {
        let grid = match required_growth(&grid, &assignments) {
            Some(spec) => {
                let ops = growth_ops(&grid, spec);
                self.advance(SessionState::GrowthPlanned);
                log::debug!(
                    "growing table from {}x{} to {}x{}",
                    grid.rows(),
                    grid.columns(),
                    spec.target_rows,
                    spec.target_columns
                );
                self.apply(&ops)?;
                self.advance(SessionState::GrowthApplied);
                self.fetch_grid()?
            }
            None => grid,
        };

        let ops = build_content_ops(&grid, &assignments)?;
        self.apply_content(ops)?;
        let outcome = self.outcome();
        Ok(self.finish(outcome))
    }

    fn create_table(&mut self, request: &CreateTableRequest) -> Result<Outcome, PlanError> {
        let plan = plan_creation(request)?;
        if !plan.ignored().is_empty() {
            let cells: Vec<String> = plan.ignored().iter().map(|a| a.to_string()).collect();
            log::warn!(
                "ignoring values for cell(s) {} outside the new {}x{} table",
                cells.join(", "),
                plan.rows,
                plan.columns
            );
        }

        match plan.placement {
            Placement::AtIndex(index) => {
                // The fresh table's layout is known, so insertion and values share a batch.
                let mut ops = vec![plan.insert_table()];
                ops.extend(plan.value_ops(index));
                self.apply_content(ops)?;
            }
            Placement::Append => {
                self.advance(SessionState::GrowthPlanned);
                self.apply(&[plan.insert_table()])?;
                self.advance(SessionState::GrowthApplied);

                if plan.has_values() {
                    let document = self.fetch_document()?;
                    let table = last_table(&document).ok_or_else(|| {
                        PlanError::MalformedSnapshot("appended table not found in document".into())
                    })?;
                    let base_index = appended_base_index(table.start_index);
                    self.advance(SessionState::SnapshotFetched);
                    self.apply_content(plan.value_ops(base_index))?;
                }
            }
        }

        let outcome = self.outcome();
        Ok(self.finish(outcome))
    }

    fn replace_images(&mut self, replacement: &ImageReplacement) -> Result<Outcome, PlanError> {
        let document = self.fetch_document()?;
        let grids = match replacement.scope {
            ReplaceScope::Table => vec![parse_table(find_table(&document, self.options.table_index)?)?],
            ReplaceScope::AllTables => tables(&document)
                .into_iter()
                .map(parse_table)
                .collect::<Result<Vec<_>, _>>()?,
        };
        self.advance(SessionState::SnapshotFetched);

        let ops = plan_image_replacement(&grids, replacement)?;
        let replaced = ops.len() / 2;
        self.apply_content(ops)?;

        let outcome = Outcome {
            message: Some(format!("replaced {} occurrence(s) of {:?}", replaced, replacement.marker)),
            ..self.outcome()
        };
        Ok(self.finish(outcome))
    }

    // ── Round trips ─────────────────────────────────────────────────

    fn fetch_document(&mut self) -> Result<Document, PlanError> {
        let (document, raw) = fetch_document(&mut *self.service, &self.document_id)?;
        if self.options.show_api_responses {
            self.responses.push(raw);
        }
        Ok(document)
    }

    fn fetch_grid(&mut self) -> Result<Grid, PlanError> {
        let document = self.fetch_document()?;
        let grid = parse_table(find_table(&document, self.options.table_index)?)?;
        self.advance(SessionState::SnapshotFetched);
        Ok(grid)
    }

    /// Plan state for a content batch; an empty batch is skipped.
    fn apply_content(&mut self, ops: Vec<EditOp>) -> Result<(), PlanError> {
        self.advance(SessionState::ContentPlanned);
        if ops.is_empty() {
            log::debug!("nothing to apply");
            return Ok(());
        }
        self.apply(&ops)?;
        self.advance(SessionState::ContentApplied);
        Ok(())
    }

    fn apply(&mut self, ops: &[EditOp]) -> Result<(), PlanError> {
        if ops.is_empty() {
            return Ok(());
        }
        let response = self.service.batch_update(&self.document_id, to_requests(ops))?;
        log::info!("applied batch of {} request(s) to {}", ops.len(), self.document_id);
        if self.options.show_api_responses {
            self.responses.push(response);
        }
        Ok(())
    }

    // ── State ───────────────────────────────────────────────────────

    fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid session transition {} -> {}",
            self.state,
            next
        );
        log::debug!("session {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    fn outcome(&self) -> Outcome {
        Outcome { library_version: LIBRARY_VERSION.to_string(), ..Outcome::default() }
    }

    fn finish(&mut self, mut outcome: Outcome) -> Outcome {
        if self.options.show_api_responses {
            outcome.responses = Some(std::mem::take(&mut self.responses));
        }
        outcome
    }
}
