// src/templates/resources.rs
use bevy::prelude::*;

use super::definitions::{TemplateGridSnapshot, TemplateState};
use super::error::TemplateError;
use super::mapping_store::MappingStore;
use super::workbook::TemplateWorkbook;

/// Mappings being edited in the Settings view.
#[derive(Resource, Debug, Default)]
pub struct MappingSession {
    pub store: MappingStore,
}

/// The configuration export uses. Empty until the user applies a template.
#[derive(Resource, Debug, Default)]
pub struct CommittedTemplate {
    pub state: TemplateState,
}

/// Outcome of matching a fetch result against the current generation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded,
    Failed(TemplateError),
    Stale,
}

/// Loaded template grid plus fetch bookkeeping.
///
/// Each fetch takes a new generation number; only the result carrying the
/// latest generation is applied.
#[derive(Resource, Debug, Default)]
pub struct TemplateGridState {
    pub snapshot: Option<TemplateGridSnapshot>,
    pub workbook: Option<TemplateWorkbook>,
    pub loading: bool,
    pub last_error: Option<String>,
    generation: u64,
}

impl TemplateGridState {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the grid currently loaded. An in-flight or failed fetch never changes it.
    pub fn loaded_spreadsheet_id(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.spreadsheet_id.as_str())
    }

    /// Marks a new fetch in flight and returns its generation.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.last_error = None;
        self.generation
    }

    /// Applies a fetch result unless a newer fetch has started since.
    /// A failure keeps the previously loaded grid.
    pub fn accept_result(
        &mut self,
        generation: u64,
        result: Result<TemplateGridSnapshot, TemplateError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(snapshot) => {
                self.workbook = Some(TemplateWorkbook::from_snapshot(&snapshot));
                self.snapshot = Some(snapshot);
                self.last_error = None;
                FetchOutcome::Loaded
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed(e)
            }
        }
    }
}
