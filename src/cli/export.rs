// src/cli/export.rs
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::{read_json, CliError};
use crate::sow::definitions::FormState;
use crate::templates::definitions::{TemplateGridSnapshot, TemplateState};
use crate::templates::exporter::{check_template_matches, export_template};
use crate::templates::sheets_api::{sheet_id_from_input, SheetsClient};
use crate::templates::workbook::{encode_workbook, export_file_name, TemplateWorkbook};

pub async fn run(
    api_key: String,
    form_path: &Path,
    state_path: &Path,
    template: &str,
    out_dir: &Path,
) -> Result<(), CliError> {
    let form: FormState = read_json(form_path)?;
    let state: TemplateState = read_json(state_path)?;
    let spreadsheet_id = sheet_id_from_input(template)?;
    let snapshot = SheetsClient::new(api_key).fetch_grid(&spreadsheet_id).await?;

    let path = export_to_dir(&snapshot, &state, &form, out_dir, Utc::now())?;
    println!("{}", path.display());
    Ok(())
}

/// Fills the template and writes it into `out_dir`. The file is only
/// created once the workbook has been fully encoded.
pub fn export_to_dir(
    snapshot: &TemplateGridSnapshot,
    state: &TemplateState,
    form: &FormState,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, CliError> {
    check_template_matches(&snapshot.spreadsheet_id, state)?;
    let template = TemplateWorkbook::from_snapshot(snapshot);
    let filled = export_template(Some(&template), state, form)?;
    let bytes = encode_workbook(&filled)?;

    let path = out_dir.join(export_file_name(now));
    fs::write(&path, bytes).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::definitions::{CellCoordinate, Mapping};
    use crate::templates::error::TemplateError;
    use crate::templates::grid::build_snapshot;

    fn snapshot() -> TemplateGridSnapshot {
        build_snapshot("abc", "T", "Sheet1", vec![vec!["Hours".into(), String::new()]])
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = TemplateState {
            spreadsheet_id: "abc".into(),
            cell_mappings: vec![Mapping {
                source_id: "hours".into(),
                target_cell: CellCoordinate::new(0, 1),
            }],
        };
        let now = DateTime::parse_from_rfc3339("2024-03-05T10:20:30.456Z")
            .unwrap()
            .with_timezone(&Utc);
        let path = export_to_dir(&snapshot(), &state, &FormState::default(), dir.path(), now).unwrap();
        assert_eq!(path.file_name().unwrap(), "sow_export_2024-03-05T102030.xlsx");
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_without_mappings_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_to_dir(
            &snapshot(),
            &TemplateState::default(),
            &FormState::default(),
            dir.path(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Template(TemplateError::NoMappingsConfigured)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_for_other_template_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state = TemplateState {
            spreadsheet_id: "other".into(),
            cell_mappings: vec![Mapping {
                source_id: "hours".into(),
                target_cell: CellCoordinate::new(0, 1),
            }],
        };
        let err = export_to_dir(&snapshot(), &state, &FormState::default(), dir.path(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CliError::Template(TemplateError::TemplateMismatch { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
