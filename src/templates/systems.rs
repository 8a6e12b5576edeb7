// src/templates/systems.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use chrono::Utc;
use std::path::PathBuf;

use super::definitions::{CellCoordinate, TemplateGridSnapshot};
use super::error::{TemplateError, TemplateResult};
use super::events::{
    RequestApplyTemplate, RequestCreateMapping, RequestRemoveMapping, RequestResetMappings,
    RequestTemplateExport, RequestTemplateFetch, TemplateFetchCompleted,
};
use super::exporter::{check_template_matches, export_template};
use super::mapping_store::MappingStore;
use super::resources::{CommittedTemplate, FetchOutcome, MappingSession, TemplateGridState};
use super::sheets_api::{sheet_id_from_input, SheetsClient};
use super::workbook::{encode_workbook, export_file_name};
use crate::settings::{api_key::load_api_key, io::save_settings_to_file, AppSettings};
use crate::sow::{events::OperationFeedback, resources::SowDocument};

/// A drop target must exist in the loaded grid.
pub fn check_target_cell(snapshot: Option<&TemplateGridSnapshot>, cell: CellCoordinate) -> TemplateResult<()> {
    let snapshot = snapshot.ok_or(TemplateError::NoTemplateLoaded)?;
    if snapshot.contains(cell) {
        Ok(())
    } else {
        Err(TemplateError::OutOfBounds(cell))
    }
}

/// Populates the loaded template and encodes it. Nothing is written unless
/// every step succeeds.
pub fn build_export_bytes(
    grid: &TemplateGridState,
    committed: &CommittedTemplate,
    document: &SowDocument,
) -> TemplateResult<Vec<u8>> {
    if let Some(loaded_id) = grid.loaded_spreadsheet_id() {
        check_template_matches(loaded_id, &committed.state)?;
    }
    let workbook = export_template(grid.workbook.as_ref(), &committed.state, &document.form)?;
    encode_workbook(&workbook)
}

pub fn handle_template_fetch_request(
    mut events: EventReader<RequestTemplateFetch>,
    mut grid: ResMut<TemplateGridState>,
    mut settings: ResMut<AppSettings>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    // Only the newest request matters when several arrive in one frame.
    let Some(event) = events.read().last() else {
        return;
    };
    let spreadsheet_id = match sheet_id_from_input(&event.input) {
        Ok(id) => id,
        Err(e) => {
            warn!("Templates: {}", e);
            grid.last_error = Some(e.to_string());
            feedback_writer.write(OperationFeedback::error(e.to_string()));
            return;
        }
    };
    let Some(api_key) = load_api_key() else {
        let msg = "Google Sheets API key not set. Add one in Settings.";
        grid.last_error = Some(msg.to_string());
        feedback_writer.write(OperationFeedback::error(msg));
        return;
    };

    if settings.last_sheet_url.as_deref() != Some(event.input.trim()) {
        settings.last_sheet_url = Some(event.input.trim().to_string());
        if let Err(e) = save_settings_to_file(&*settings) {
            warn!("Templates: Could not remember sheet URL: {}", e);
        }
    }

    let generation = grid.begin_fetch();
    info!("Templates: Fetching '{}' (generation {}).", spreadsheet_id, generation);

    runtime.spawn_background_task(move |mut ctx| async move {
        let client = SheetsClient::new(api_key);
        let result = client.fetch_grid(&spreadsheet_id).await;
        ctx.run_on_main_thread(move |ctx| {
            ctx.world.send_event(TemplateFetchCompleted {
                generation,
                spreadsheet_id,
                result,
            });
        })
        .await;
    });
}

pub fn handle_template_fetch_completed(
    mut events: EventReader<TemplateFetchCompleted>,
    mut grid: ResMut<TemplateGridState>,
    mut session: ResMut<MappingSession>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        let previous_id = grid.loaded_spreadsheet_id().map(str::to_string);
        match grid.accept_result(event.generation, event.result.clone()) {
            FetchOutcome::Loaded => {
                if previous_id.as_deref() != Some(event.spreadsheet_id.as_str()) {
                    session.store.reset_all();
                }
                let msg = match &grid.snapshot {
                    Some(s) => format!(
                        "Loaded template '{}' ({} x {}).",
                        s.title,
                        s.row_count(),
                        s.column_count()
                    ),
                    None => "Loaded template.".to_string(),
                };
                info!("Templates: {}", msg);
                feedback_writer.write(OperationFeedback::info(msg));
            }
            FetchOutcome::Failed(e) => {
                error!("Templates: {}", e);
                feedback_writer.write(OperationFeedback::error(e.to_string()));
            }
            FetchOutcome::Stale => {
                debug!(
                    "Templates: Dropped stale result for generation {} (current {}).",
                    event.generation,
                    grid.generation()
                );
            }
        }
    }
}

pub fn handle_create_mapping(
    mut events: EventReader<RequestCreateMapping>,
    grid: Res<TemplateGridState>,
    mut session: ResMut<MappingSession>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        let result = check_target_cell(grid.snapshot.as_ref(), event.target_cell)
            .and_then(|()| session.store.create_mapping(event.source_id.clone(), event.target_cell));
        match result {
            Ok(()) => info!("Templates: Mapped '{}' to {}.", event.source_id, event.target_cell),
            Err(e) => {
                warn!("Templates: {}", e);
                feedback_writer.write(OperationFeedback::error(e.to_string()));
            }
        }
    }
}

pub fn handle_remove_mapping(
    mut events: EventReader<RequestRemoveMapping>,
    mut session: ResMut<MappingSession>,
) {
    for event in events.read() {
        if session.store.remove_mapping(event.target_cell).is_none() {
            debug!("Templates: No mapping at {} to remove.", event.target_cell);
        }
    }
}

pub fn handle_reset_mappings(
    mut events: EventReader<RequestResetMappings>,
    mut session: ResMut<MappingSession>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    session.store.reset_all();
    info!("Templates: Cleared all mappings.");
}

pub fn handle_apply_template(
    mut events: EventReader<RequestApplyTemplate>,
    session: Res<MappingSession>,
    grid: Res<TemplateGridState>,
    mut committed: ResMut<CommittedTemplate>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for _ in events.read() {
        let result = grid
            .loaded_spreadsheet_id()
            .ok_or(TemplateError::NoTemplateLoaded)
            .and_then(|spreadsheet_id| session.store.commit(spreadsheet_id));
        match result {
            Ok(state) => {
                let msg = format!("Template applied with {} mapping(s).", state.cell_mappings.len());
                committed.state = state;
                info!("Templates: {}", msg);
                feedback_writer.write(OperationFeedback::info(msg));
            }
            Err(e) => {
                warn!("Templates: {}", e);
                feedback_writer.write(OperationFeedback::error(e.to_string()));
            }
        }
    }
}

fn pick_export_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Excel workbook", &["xlsx"])
        .set_file_name(export_file_name(Utc::now()))
        .save_file()
}

pub fn handle_template_export(
    mut events: EventReader<RequestTemplateExport>,
    grid: Res<TemplateGridState>,
    committed: Res<CommittedTemplate>,
    document: Res<SowDocument>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let bytes = match build_export_bytes(&grid, &committed, &document) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Templates: Export failed: {}", e);
            feedback_writer.write(OperationFeedback::error(e.to_string()));
            return;
        }
    };
    let Some(path) = pick_export_path() else {
        info!("Templates: Export cancelled.");
        return;
    };
    match std::fs::write(&path, bytes) {
        Ok(()) => {
            let msg = format!("Exported to '{}'.", path.display());
            info!("Templates: {}", msg);
            feedback_writer.write(OperationFeedback::info(msg));
        }
        Err(e) => {
            let msg = format!("Failed to write '{}': {}", path.display(), e);
            error!("Templates: {}", msg);
            feedback_writer.write(OperationFeedback::error(msg));
        }
    }
}

/// Starts a session from the committed mappings, if the store is empty.
pub fn seed_session_from_committed(session: &mut MappingStore, committed: &CommittedTemplate) {
    if session.is_empty() && !committed.state.cell_mappings.is_empty() {
        *session = MappingStore::from_state(&committed.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::field_catalog::FieldId;
    use crate::templates::grid::build_snapshot;

    fn snapshot() -> TemplateGridSnapshot {
        build_snapshot(
            "sheet-1",
            "Template",
            "Sheet1",
            vec![
                vec!["Process".to_string(), "".to_string()],
                vec!["Hours".to_string(), "".to_string()],
            ],
        )
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<RequestCreateMapping>()
            .add_event::<RequestRemoveMapping>()
            .add_event::<RequestResetMappings>()
            .add_event::<RequestApplyTemplate>()
            .add_event::<TemplateFetchCompleted>()
            .add_event::<OperationFeedback>()
            .init_resource::<TemplateGridState>()
            .init_resource::<MappingSession>()
            .init_resource::<CommittedTemplate>()
            .add_systems(
                Update,
                (
                    handle_template_fetch_completed,
                    handle_create_mapping,
                    handle_remove_mapping,
                    handle_reset_mappings,
                    handle_apply_template,
                )
                    .chain(),
            );
        app
    }

    fn load_snapshot(app: &mut App) {
        complete_fetch(app, "sheet-1", Ok(snapshot()));
    }

    fn complete_fetch(app: &mut App, spreadsheet_id: &str, result: TemplateResult<TemplateGridSnapshot>) {
        let generation = app.world_mut().resource_mut::<TemplateGridState>().begin_fetch();
        app.world_mut().send_event(TemplateFetchCompleted {
            generation,
            spreadsheet_id: spreadsheet_id.to_string(),
            result,
        });
        app.update();
    }

    fn map_cell(app: &mut App, field: &str, row: usize, col: usize) {
        app.world_mut().send_event(RequestCreateMapping {
            source_id: FieldId::from(field),
            target_cell: CellCoordinate::new(row, col),
        });
        app.update();
    }

    fn errors(app: &App) -> Vec<String> {
        let events = app.world().resource::<Events<OperationFeedback>>();
        let mut cursor = events.get_cursor();
        cursor
            .read(events)
            .filter(|f| f.is_error)
            .map(|f| f.message.clone())
            .collect()
    }

    #[test]
    fn test_check_target_cell() {
        let snap = snapshot();
        assert!(check_target_cell(Some(&snap), CellCoordinate::new(1, 1)).is_ok());
        assert_eq!(
            check_target_cell(Some(&snap), CellCoordinate::new(2, 0)),
            Err(TemplateError::OutOfBounds(CellCoordinate::new(2, 0)))
        );
        assert_eq!(
            check_target_cell(None, CellCoordinate::new(0, 0)),
            Err(TemplateError::NoTemplateLoaded)
        );
    }

    #[test]
    fn test_create_then_apply() {
        let mut app = test_app();
        load_snapshot(&mut app);
        app.world_mut().send_event(RequestCreateMapping {
            source_id: FieldId::from("process"),
            target_cell: CellCoordinate::new(0, 1),
        });
        app.update();
        app.world_mut().send_event(RequestApplyTemplate);
        app.update();

        let committed = app.world().resource::<CommittedTemplate>();
        assert_eq!(committed.state.spreadsheet_id, "sheet-1");
        assert_eq!(committed.state.cell_mappings.len(), 1);
        assert_eq!(committed.state.cell_mappings[0].target_cell, CellCoordinate::new(0, 1));
    }

    #[test]
    fn test_out_of_bounds_drop_is_reported() {
        let mut app = test_app();
        load_snapshot(&mut app);
        app.world_mut().send_event(RequestCreateMapping {
            source_id: FieldId::from("hours"),
            target_cell: CellCoordinate::new(5, 5),
        });
        app.update();
        assert!(app.world().resource::<MappingSession>().store.is_empty());
        assert!(errors(&app).iter().any(|m| m.contains("F6")));
    }

    #[test]
    fn test_apply_empty_set_keeps_committed() {
        let mut app = test_app();
        load_snapshot(&mut app);
        app.world_mut().send_event(RequestApplyTemplate);
        app.update();
        assert!(app.world().resource::<CommittedTemplate>().state.cell_mappings.is_empty());
        assert!(!errors(&app).is_empty());
    }

    #[test]
    fn test_remove_and_reset() {
        let mut app = test_app();
        load_snapshot(&mut app);
        for (field, row) in [("process", 0), ("hours", 1)] {
            app.world_mut().send_event(RequestCreateMapping {
                source_id: FieldId::from(field),
                target_cell: CellCoordinate::new(row, 1),
            });
        }
        app.update();
        assert_eq!(app.world().resource::<MappingSession>().store.len(), 2);

        app.world_mut().send_event(RequestRemoveMapping {
            target_cell: CellCoordinate::new(0, 1),
        });
        app.update();
        assert_eq!(app.world().resource::<MappingSession>().store.len(), 1);

        app.world_mut().send_event(RequestResetMappings);
        app.update();
        assert!(app.world().resource::<MappingSession>().store.is_empty());
    }

    #[test]
    fn test_stale_fetch_does_not_clobber() {
        let mut app = test_app();
        let stale = app
            .world_mut()
            .resource_mut::<TemplateGridState>()
            .begin_fetch();
        load_snapshot(&mut app);
        app.world_mut().send_event(TemplateFetchCompleted {
            generation: stale,
            spreadsheet_id: "old".to_string(),
            result: Err(TemplateError::TemplateFetch("late".to_string())),
        });
        app.update();
        let grid = app.world().resource::<TemplateGridState>();
        assert!(grid.last_error.is_none());
        assert_eq!(grid.snapshot.as_ref().unwrap().spreadsheet_id, "sheet-1");
    }

    #[test]
    fn test_export_bytes_require_template_and_mappings() {
        let grid = TemplateGridState::default();
        let committed = CommittedTemplate::default();
        let document = SowDocument::default();
        assert_eq!(
            build_export_bytes(&grid, &committed, &document),
            Err(TemplateError::NoTemplateLoaded)
        );
    }

    #[test]
    fn test_failed_fetch_keeps_loaded_template_and_session() {
        let mut app = test_app();
        load_snapshot(&mut app);
        map_cell(&mut app, "process", 0, 1);
        let before = app.world().resource::<MappingSession>().store.mappings().to_vec();

        complete_fetch(
            &mut app,
            "sheet-2",
            Err(TemplateError::TemplateFetch("Requested entity was not found.".to_string())),
        );
        assert_eq!(app.world().resource::<MappingSession>().store.mappings(), before.as_slice());
        assert!(errors(&app).iter().any(|m| m.contains("Requested entity was not found.")));

        app.world_mut().send_event(RequestApplyTemplate);
        app.update();
        let committed = app.world().resource::<CommittedTemplate>();
        assert_eq!(committed.state.spreadsheet_id, "sheet-1");
        assert_eq!(committed.state.cell_mappings.len(), 1);
    }

    #[test]
    fn test_apply_without_loaded_template_is_rejected() {
        let mut app = test_app();
        app.world_mut().send_event(RequestApplyTemplate);
        app.update();
        assert!(app.world().resource::<CommittedTemplate>().state.cell_mappings.is_empty());
        assert!(errors(&app).iter().any(|m| m.contains("No template loaded")));
    }

    #[test]
    fn test_export_bytes_reject_mismatched_template() {
        let mut app = test_app();
        load_snapshot(&mut app);
        map_cell(&mut app, "process", 0, 1);
        app.world_mut().send_event(RequestApplyTemplate);
        app.update();

        let other = build_snapshot("sheet-2", "Other", "Sheet1", vec![vec![String::new(); 2]; 2]);
        complete_fetch(&mut app, "sheet-2", Ok(other));

        let world = app.world();
        let grid = world.resource::<TemplateGridState>();
        let committed = world.resource::<CommittedTemplate>();
        assert_eq!(grid.loaded_spreadsheet_id(), Some("sheet-2"));
        assert_eq!(
            build_export_bytes(grid, committed, &SowDocument::default()),
            Err(TemplateError::TemplateMismatch {
                committed: "sheet-1".to_string(),
                loaded: "sheet-2".to_string(),
            })
        );
    }

    #[test]
    fn test_export_bytes_for_matching_template() {
        let mut app = test_app();
        load_snapshot(&mut app);
        map_cell(&mut app, "hours", 1, 1);
        app.world_mut().send_event(RequestApplyTemplate);
        app.update();

        let world = app.world();
        let bytes = build_export_bytes(
            world.resource::<TemplateGridState>(),
            world.resource::<CommittedTemplate>(),
            &SowDocument::default(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_seed_session_from_committed() {
        let mut store = MappingStore::new();
        store
            .create_mapping(FieldId::from("notes"), CellCoordinate::new(0, 0))
            .unwrap();
        let committed = CommittedTemplate {
            state: store.commit("sheet-1").unwrap(),
        };
        let mut session = MappingStore::new();
        seed_session_from_committed(&mut session, &committed);
        assert_eq!(session.len(), 1);
    }
}
