// src/templates/events.rs
use bevy::prelude::Event;

use super::definitions::{CellCoordinate, TemplateGridSnapshot};
use super::error::TemplateError;
use super::field_catalog::FieldId;

/// Load (or reload) a template grid. `input` is a sheet URL or a bare id.
#[derive(Event, Debug, Clone)]
pub struct RequestTemplateFetch {
    pub input: String,
}

/// Sent from the background fetch task back to the main thread.
#[derive(Event, Debug, Clone)]
pub struct TemplateFetchCompleted {
    pub generation: u64,
    pub spreadsheet_id: String,
    pub result: Result<TemplateGridSnapshot, TemplateError>,
}

/// A catalog field was dropped onto a grid cell.
#[derive(Event, Debug, Clone)]
pub struct RequestCreateMapping {
    pub source_id: FieldId,
    pub target_cell: CellCoordinate,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveMapping {
    pub target_cell: CellCoordinate,
}

#[derive(Event, Debug, Clone)]
pub struct RequestResetMappings;

/// Commit the in-progress mappings as the export configuration.
#[derive(Event, Debug, Clone)]
pub struct RequestApplyTemplate;

/// Populate the loaded template from the form and save it.
#[derive(Event, Debug, Clone)]
pub struct RequestTemplateExport;
