// src/templates/exporter.rs
//! Populates a copy of the template workbook with resolved field values.

use crate::sow::definitions::FormState;

use super::definitions::{TemplateState, VerticalAlign};
use super::error::{TemplateError, TemplateResult};
use super::resolver::resolve;
use super::workbook::{within_xlsx_limits, TemplateWorkbook};

/// Committed mappings only apply to the template they were created against.
pub fn check_template_matches(loaded_id: &str, state: &TemplateState) -> TemplateResult<()> {
    if state.cell_mappings.is_empty() || state.spreadsheet_id == loaded_id {
        Ok(())
    } else {
        Err(TemplateError::TemplateMismatch {
            committed: state.spreadsheet_id.clone(),
            loaded: loaded_id.to_string(),
        })
    }
}

/// Returns a new workbook where every mapped cell of the primary sheet holds
/// its resolved text. The template itself is never modified.
///
/// Mappings are applied in sequence order, so when two target the same cell
/// the later one wins.
pub fn export_template(
    template: Option<&TemplateWorkbook>,
    state: &TemplateState,
    form: &FormState,
) -> TemplateResult<TemplateWorkbook> {
    let template = template.ok_or(TemplateError::NoTemplateLoaded)?;
    if state.cell_mappings.is_empty() {
        return Err(TemplateError::NoMappingsConfigured);
    }
    if let Some(mapping) = state
        .cell_mappings
        .iter()
        .find(|m| !within_xlsx_limits(m.target_cell))
    {
        return Err(TemplateError::OutOfBounds(mapping.target_cell));
    }

    let mut output = template.clone();
    let sheet = output
        .primary_sheet_mut()
        .ok_or(TemplateError::NoTemplateLoaded)?;

    for mapping in &state.cell_mappings {
        let value = resolve(&mapping.source_id, form);
        let cell = sheet.cell_mut(mapping.target_cell);
        cell.value = value;
        cell.format.wrap = true;
        cell.format.vertical_align = VerticalAlign::Top;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sow::definitions::RowData;
    use crate::templates::definitions::{CellCoordinate, CellFormat, Mapping, TemplateGridSnapshot};
    use crate::templates::grid::build_snapshot;

    fn template() -> TemplateWorkbook {
        let mut snapshot: TemplateGridSnapshot = build_snapshot(
            "sheet-1",
            "Quote",
            "Sheet1",
            vec![
                vec!["Item".to_string(), "old".to_string(), "".to_string()],
                vec!["Footer".to_string(), "".to_string(), "keep".to_string()],
            ],
        );
        snapshot.formats = vec![
            vec![
                CellFormat { bold: true, ..Default::default() },
                CellFormat { italic: true, background_color: Some(0xEEEEEE), ..Default::default() },
                CellFormat::default(),
            ],
            vec![CellFormat::default(); 3],
        ];
        TemplateWorkbook::from_snapshot(&snapshot)
    }

    fn mapping(source: &str, row: usize, col: usize) -> Mapping {
        Mapping {
            source_id: source.into(),
            target_cell: CellCoordinate::new(row, col),
        }
    }

    fn state(mappings: Vec<Mapping>) -> TemplateState {
        TemplateState {
            spreadsheet_id: "sheet-1".to_string(),
            cell_mappings: mappings,
        }
    }

    fn form() -> FormState {
        FormState {
            rows: vec![RowData {
                process_and_impact: "<p>Build API</p>".to_string(),
                hours: "4".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_export() {
        let template = template();
        let state = state(vec![mapping("process", 0, 1), mapping("hours", 0, 2)]);
        let out = export_template(Some(&template), &state, &form()).unwrap();
        let sheet = out.primary_sheet().unwrap();

        assert_eq!(sheet.cells[0][1].value, "Build API");
        assert_eq!(sheet.cells[0][2].value, "4.0");
        // Written cells keep their styling and gain wrap + top alignment.
        assert!(sheet.cells[0][1].format.italic);
        assert_eq!(sheet.cells[0][1].format.background_color, Some(0xEEEEEE));
        assert!(sheet.cells[0][1].format.wrap);
        assert_eq!(sheet.cells[0][2].format.vertical_align, VerticalAlign::Top);
        // Everything else is untouched.
        let source = template.primary_sheet().unwrap();
        assert_eq!(sheet.cells[0][0], source.cells[0][0]);
        assert_eq!(sheet.cells[1], source.cells[1]);
        assert_eq!(sheet.column_widths, source.column_widths);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let template = template();
        let before = template.clone();
        let state = state(vec![mapping("process", 0, 0), mapping("notes", 1, 2)]);
        export_template(Some(&template), &state, &form()).unwrap();
        assert_eq!(template, before);
    }

    #[test]
    fn test_errors() {
        let template = template();
        assert_eq!(
            export_template(None, &state(vec![mapping("hours", 0, 0)]), &form()),
            Err(TemplateError::NoTemplateLoaded)
        );
        assert_eq!(
            export_template(Some(&template), &state(Vec::new()), &form()),
            Err(TemplateError::NoMappingsConfigured)
        );
        assert_eq!(
            export_template(Some(&TemplateWorkbook::default()), &state(vec![mapping("hours", 0, 0)]), &form()),
            Err(TemplateError::NoTemplateLoaded)
        );
    }

    #[test]
    fn test_duplicate_targets_last_write_wins() {
        let template = template();
        let state = state(vec![mapping("hours", 0, 1), mapping("process", 0, 1)]);
        let first = export_template(Some(&template), &state, &form()).unwrap();
        let second = export_template(Some(&template), &state, &form()).unwrap();
        assert_eq!(first.primary_sheet().unwrap().cells[0][1].value, "Build API");
        assert_eq!(first, second);
    }

    #[test]
    fn test_mapping_outside_template_grows_sheet() {
        let template = template();
        let state = state(vec![mapping("hours", 4, 5)]);
        let out = export_template(Some(&template), &state, &form()).unwrap();
        assert_eq!(out.primary_sheet().unwrap().cells[4][5].value, "4.0");
    }

    #[test]
    fn test_mapping_past_xlsx_limits_is_rejected() {
        let template = template();
        let before = template.clone();
        let far = CellCoordinate::new(0, 65_537);
        let wide = state(vec![mapping("hours", 0, 1), mapping("notes", far.row, far.col)]);
        assert_eq!(
            export_template(Some(&template), &wide, &form()),
            Err(TemplateError::OutOfBounds(far))
        );
        assert_eq!(
            export_template(Some(&template), &state(vec![mapping("hours", 1_048_576, 0)]), &form()),
            Err(TemplateError::OutOfBounds(CellCoordinate::new(1_048_576, 0)))
        );
        assert_eq!(template, before);
    }

    #[test]
    fn test_check_template_matches() {
        let committed = state(vec![mapping("hours", 0, 1)]);
        assert_eq!(check_template_matches("sheet-1", &committed), Ok(()));
        assert_eq!(
            check_template_matches("sheet-2", &committed),
            Err(TemplateError::TemplateMismatch {
                committed: "sheet-1".to_string(),
                loaded: "sheet-2".to_string(),
            })
        );
        // Nothing applied yet: the export reports the missing mappings instead.
        assert_eq!(check_template_matches("sheet-2", &state(Vec::new())), Ok(()));
    }

    #[test]
    fn test_unknown_field_writes_empty_text() {
        let template = template();
        let state = state(vec![mapping("legacy.field", 0, 1)]);
        let out = export_template(Some(&template), &state, &form()).unwrap();
        assert_eq!(out.primary_sheet().unwrap().cells[0][1].value, "");
    }
}
