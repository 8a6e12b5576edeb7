// src/sow/events.rs
use bevy::prelude::Event;

/// Status-line message for the user. Every handled failure ends up here.
#[derive(Event, Debug, Clone)]
pub struct OperationFeedback {
    pub message: String,
    pub is_error: bool,
}

impl OperationFeedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: true }
    }
}

#[derive(Event, Debug, Clone)]
pub struct AddRowRequest;

#[derive(Event, Debug, Clone)]
pub struct ToggleRowSelection {
    pub index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct SelectAllRows {
    pub selected: bool,
}

/// Sent after the user confirms the delete dialog.
#[derive(Event, Debug, Clone)]
pub struct RequestDeleteSelectedRows;

#[derive(Event, Debug, Clone)]
pub struct RequestDuplicateSelectedRows;

#[derive(Event, Debug, Clone)]
pub struct RequestMoveRow {
    pub from: usize,
    pub to: usize,
}

/// Plain SOW table export (no template).
#[derive(Event, Debug, Clone)]
pub struct RequestSowExport;

/// Pick an Excel file and load it into the import preview.
#[derive(Event, Debug, Clone)]
pub struct RequestExcelImport;

/// Replace the form rows with the imported data.
#[derive(Event, Debug, Clone)]
pub struct RequestApplyImport;

/// Persist the current import column mapping.
#[derive(Event, Debug, Clone)]
pub struct RequestSaveColumnMapping;
