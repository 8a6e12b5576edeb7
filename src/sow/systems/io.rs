// src/sow/systems/io.rs
use bevy::prelude::*;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::{io::save_settings_to_file, AppSettings, SavedColumnMapping};
use crate::sow::{
    definitions::{FormState, RowField},
    events::{
        OperationFeedback, RequestApplyImport, RequestExcelImport, RequestSaveColumnMapping,
        RequestSowExport,
    },
    import::{apply_mapping, read_workbook, validate_file, ColumnMapping, ImportError, ImportedTable},
    resources::{ImportSession, SowDocument},
    rich_text::to_plain,
};
use crate::templates::workbook::{encode_workbook, export_file_name, TemplateWorkbook, WorkbookSheet};

pub const SOW_SHEET_NAME: &str = "SOW";
pub const SAVE_MAPPING_ERROR: &str = "Error saving template mapping. Please try again.";

/// Header row plus one plain-text row per SOW row.
pub fn sow_table_rows(form: &FormState) -> Vec<Vec<String>> {
    let header: Vec<String> = RowField::ALL.iter().map(|f| f.header().to_string()).collect();
    let body = form.rows.iter().map(|row| {
        RowField::ALL
            .iter()
            .map(|&f| {
                if f.is_rich_text() {
                    to_plain(row.field(f))
                } else {
                    row.field(f).to_string()
                }
            })
            .collect::<Vec<String>>()
    });
    std::iter::once(header).chain(body).collect()
}

pub fn sow_workbook(form: &FormState) -> TemplateWorkbook {
    TemplateWorkbook {
        sheets: vec![WorkbookSheet::from_rows(SOW_SHEET_NAME, sow_table_rows(form))],
    }
}

/// Validates and decodes an Excel file from disk.
pub fn load_import_file(path: &Path) -> Result<(String, ImportedTable), ImportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let size = fs::metadata(path)?.len();
    validate_file(&file_name, size)?;
    let table = read_workbook(fs::read(path)?)?;
    Ok((file_name, table))
}

/// The saved mapping is reused only if every header it names still exists.
pub fn restore_saved_mapping(saved: Option<&SavedColumnMapping>, table: &ImportedTable) -> ColumnMapping {
    let Some(saved) = saved else {
        return ColumnMapping::default();
    };
    let all_present = RowField::ALL
        .iter()
        .filter_map(|&f| saved.mapping.get(f))
        .all(|header| table.headers.iter().any(|h| h == header));
    if all_present {
        saved.mapping.clone()
    } else {
        ColumnMapping::default()
    }
}

pub fn write_export(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

fn pick_save_path(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Excel workbook", &["xlsx"])
        .set_file_name(default_name)
        .save_file()
}

pub fn handle_sow_export_request(
    mut events: EventReader<RequestSowExport>,
    document: Res<SowDocument>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let bytes = match encode_workbook(&sow_workbook(&document.form)) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Sow: Export encoding failed: {}", e);
            feedback_writer.write(OperationFeedback::error(e.to_string()));
            return;
        }
    };
    let Some(path) = pick_save_path(&export_file_name(Utc::now())) else {
        info!("Sow: Export cancelled.");
        return;
    };
    match write_export(&path, &bytes) {
        Ok(()) => {
            let msg = format!("Exported SOW to '{}'.", path.display());
            info!("Sow: {}", msg);
            feedback_writer.write(OperationFeedback::info(msg));
        }
        Err(e) => {
            let msg = format!("Failed to write '{}': {}", path.display(), e);
            error!("Sow: {}", msg);
            feedback_writer.write(OperationFeedback::error(msg));
        }
    }
}

pub fn handle_excel_import_request(
    mut events: EventReader<RequestExcelImport>,
    mut session: ResMut<ImportSession>,
    settings: Res<AppSettings>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let Some(path) = rfd::FileDialog::new()
        .add_filter("Excel files", &["xlsx", "xls"])
        .pick_file()
    else {
        info!("SowImport: File selection cancelled.");
        return;
    };

    match load_import_file(&path) {
        Ok((file_name, table)) => {
            info!(
                "SowImport: Loaded '{}' with {} columns and {} rows.",
                file_name,
                table.headers.len(),
                table.rows.len()
            );
            session.mapping = restore_saved_mapping(settings.column_mapping.as_ref(), &table);
            session.file_name = Some(file_name);
            session.table = Some(table);
            session.last_error = None;
        }
        Err(e) => {
            warn!("SowImport: {}", e);
            session.table = None;
            session.file_name = None;
            session.last_error = Some(e.to_string());
            feedback_writer.write(OperationFeedback::error(e.to_string()));
        }
    }
}

pub fn handle_apply_import(
    mut events: EventReader<RequestApplyImport>,
    mut session: ResMut<ImportSession>,
    mut document: ResMut<SowDocument>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for _ in events.read() {
        let Some(table) = session.table.as_ref() else {
            feedback_writer.write(OperationFeedback::error("No Excel file loaded."));
            continue;
        };
        if !session.mapping.is_valid() {
            feedback_writer.write(OperationFeedback::error(
                "Map Process and Impact, Components, Assumptions and Hours before importing.",
            ));
            continue;
        }
        let rows = apply_mapping(table, &session.mapping);
        let msg = format!("Imported {} row(s).", rows.len());
        document.form.rows = rows;
        document.selected_rows.clear();
        session.last_error = None;
        info!("SowImport: {}", msg);
        feedback_writer.write(OperationFeedback::info(msg));
    }
}

pub fn handle_save_column_mapping(
    mut events: EventReader<RequestSaveColumnMapping>,
    session: Res<ImportSession>,
    mut settings: ResMut<AppSettings>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for _ in events.read() {
        settings.column_mapping = Some(SavedColumnMapping {
            file_name: session.file_name.clone().unwrap_or_default(),
            mapping: session.mapping.clone(),
            last_updated: Utc::now(),
        });
        match save_settings_to_file(&*settings) {
            Ok(()) => {
                feedback_writer.write(OperationFeedback::info("Template mapping saved."));
            }
            Err(e) => {
                error!("SowImport: Saving column mapping failed: {}", e);
                feedback_writer.write(OperationFeedback::error(SAVE_MAPPING_ERROR));
            }
        }
    }
}
