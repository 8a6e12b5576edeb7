// tests/export_flow.rs
// Mapping session to exported workbook, through the public API only.

use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;

use sow_builder::sow::definitions::{FormState, RowData};
use sow_builder::templates::definitions::CellCoordinate;
use sow_builder::templates::error::TemplateError;
use sow_builder::templates::exporter::export_template;
use sow_builder::templates::field_catalog::FieldId;
use sow_builder::templates::grid::build_snapshot;
use sow_builder::templates::mapping_store::MappingStore;
use sow_builder::templates::resolver::resolve;
use sow_builder::templates::workbook::{encode_workbook, TemplateWorkbook};

fn form() -> FormState {
    let mut form = FormState {
        rows: vec![
            RowData {
                process_and_impact: "<p>Build API</p>".into(),
                hours: "4".into(),
                ..RowData::default()
            },
            RowData {
                process_and_impact: "<p>Test <b>it</b></p>".into(),
                hours: "2.5".into(),
                ..RowData::default()
            },
        ],
        ..FormState::default()
    };
    form.role_hours.sa = "10".into();
    form.add_out_of_scope("Data migration".into());
    form
}

#[test]
fn resolves_catalog_fields() {
    let form = form();
    assert_eq!(resolve(&FieldId::from("process"), &form), "Build API\n\nTest it");
    assert_eq!(resolve(&FieldId::from("hours"), &form), "6.5");
    assert_eq!(resolve(&FieldId::from("roleHours.sa"), &form), "10");
    assert_eq!(resolve(&FieldId::from("outOfScope"), &form), "Data migration");
    assert_eq!(resolve(&FieldId::from("nope"), &form), "");
}

#[test]
fn mapped_template_round_trips_through_xlsx() {
    let snapshot = build_snapshot(
        "sheet-1",
        "Template",
        "Sheet1",
        vec![
            vec!["Process".into(), String::new()],
            vec!["Total".into(), String::new()],
        ],
    );
    let template = TemplateWorkbook::from_snapshot(&snapshot);

    let mut store = MappingStore::new();
    store
        .create_mapping(FieldId::from("process"), CellCoordinate::new(0, 1))
        .unwrap();
    store
        .create_mapping(FieldId::from("hours"), CellCoordinate::new(1, 1))
        .unwrap();
    let state = store.commit("sheet-1").unwrap();

    let filled = export_template(Some(&template), &state, &form()).unwrap();
    let bytes = encode_workbook(&filled).unwrap();

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
    assert_eq!(rows[0], vec!["Process", "Build API\n\nTest it"]);
    assert_eq!(rows[1], vec!["Total", "6.5"]);
}

#[test]
fn export_guards() {
    let snapshot = build_snapshot("s", "T", "Sheet1", vec![vec!["a".into()]]);
    let template = TemplateWorkbook::from_snapshot(&snapshot);
    let store = MappingStore::new();
    assert_eq!(store.commit("s"), Err(TemplateError::EmptyMappingSet));

    let mut store = MappingStore::new();
    store
        .create_mapping(FieldId::from("notes"), CellCoordinate::new(0, 0))
        .unwrap();
    let state = store.commit("s").unwrap();
    assert_eq!(
        export_template(None, &state, &form()),
        Err(TemplateError::NoTemplateLoaded)
    );
    assert!(export_template(Some(&template), &state, &form()).is_ok());
}
