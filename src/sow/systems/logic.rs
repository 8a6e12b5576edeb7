// src/sow/systems/logic.rs
use bevy::prelude::*;

use crate::sow::{
    events::{
        AddRowRequest, OperationFeedback, RequestDeleteSelectedRows, RequestDuplicateSelectedRows,
        RequestMoveRow, SelectAllRows, ToggleRowSelection,
    },
    resources::SowDocument,
};

pub fn handle_add_row_request(
    mut events: EventReader<AddRowRequest>,
    mut document: ResMut<SowDocument>,
) {
    for _ in events.read() {
        document.form.add_row();
        debug!("Sow: Added row, now {} rows.", document.form.rows.len());
    }
}

pub fn handle_toggle_row_selection(
    mut events: EventReader<ToggleRowSelection>,
    mut document: ResMut<SowDocument>,
) {
    for event in events.read() {
        if event.index >= document.form.rows.len() {
            warn!("Sow: Ignoring selection of missing row {}.", event.index);
            continue;
        }
        if !document.selected_rows.remove(&event.index) {
            document.selected_rows.insert(event.index);
        }
    }
}

pub fn handle_select_all_rows(
    mut events: EventReader<SelectAllRows>,
    mut document: ResMut<SowDocument>,
) {
    for event in events.read() {
        document.selected_rows = if event.selected {
            (0..document.form.rows.len()).collect()
        } else {
            Default::default()
        };
    }
}

pub fn handle_delete_selected_rows(
    mut events: EventReader<RequestDeleteSelectedRows>,
    mut document: ResMut<SowDocument>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for _ in events.read() {
        if document.selected_rows.is_empty() {
            continue;
        }
        let SowDocument { form, selected_rows } = &mut *document;
        let removed = form.delete_rows(selected_rows);
        selected_rows.clear();
        let msg = format!("Deleted {} row(s).", removed);
        info!("Sow: {}", msg);
        feedback_writer.write(OperationFeedback::info(msg));
    }
}

pub fn handle_duplicate_selected_rows(
    mut events: EventReader<RequestDuplicateSelectedRows>,
    mut document: ResMut<SowDocument>,
    mut feedback_writer: EventWriter<OperationFeedback>,
) {
    for _ in events.read() {
        if document.selected_rows.is_empty() {
            continue;
        }
        let SowDocument { form, selected_rows } = &mut *document;
        let copied = form.duplicate_rows(selected_rows);
        selected_rows.clear();
        let msg = format!("Duplicated {} row(s).", copied);
        info!("Sow: {}", msg);
        feedback_writer.write(OperationFeedback::info(msg));
    }
}

pub fn handle_move_row(mut events: EventReader<RequestMoveRow>, mut document: ResMut<SowDocument>) {
    for event in events.read() {
        let SowDocument { form, selected_rows } = &mut *document;
        if !form.move_row(event.from, event.to, selected_rows) {
            debug!("Sow: Move {} -> {} ignored.", event.from, event.to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<AddRowRequest>()
            .add_event::<ToggleRowSelection>()
            .add_event::<SelectAllRows>()
            .add_event::<RequestDeleteSelectedRows>()
            .add_event::<RequestDuplicateSelectedRows>()
            .add_event::<RequestMoveRow>()
            .add_event::<OperationFeedback>()
            .init_resource::<SowDocument>()
            .add_systems(
                Update,
                (
                    handle_add_row_request,
                    handle_toggle_row_selection,
                    handle_select_all_rows,
                    handle_duplicate_selected_rows,
                    handle_delete_selected_rows,
                    handle_move_row,
                )
                    .chain(),
            );
        app
    }

    fn set_processes(app: &mut App, names: &[&str]) {
        let mut document = app.world_mut().resource_mut::<SowDocument>();
        document.form.rows.clear();
        for name in names {
            document.form.add_row();
            if let Some(row) = document.form.rows.last_mut() {
                row.process_and_impact = name.to_string();
            }
        }
    }

    fn processes(app: &App) -> Vec<String> {
        app.world()
            .resource::<SowDocument>()
            .form
            .rows
            .iter()
            .map(|r| r.process_and_impact.clone())
            .collect()
    }

    #[test]
    fn test_add_row() {
        let mut app = test_app();
        app.world_mut().send_event(AddRowRequest);
        app.update();
        assert_eq!(app.world().resource::<SowDocument>().form.rows.len(), 2);
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut app = test_app();
        set_processes(&mut app, &["a", "b", "c"]);
        app.world_mut().send_event(ToggleRowSelection { index: 1 });
        app.world_mut().send_event(ToggleRowSelection { index: 9 });
        app.update();
        let selected: Vec<usize> = app.world().resource::<SowDocument>().selected_rows.iter().copied().collect();
        assert_eq!(selected, vec![1]);

        app.world_mut().send_event(SelectAllRows { selected: true });
        app.update();
        assert!(app.world().resource::<SowDocument>().all_selected());

        app.world_mut().send_event(SelectAllRows { selected: false });
        app.update();
        assert!(app.world().resource::<SowDocument>().selected_rows.is_empty());
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut app = test_app();
        set_processes(&mut app, &["a", "b", "c"]);
        app.world_mut().send_event(ToggleRowSelection { index: 0 });
        app.world_mut().send_event(ToggleRowSelection { index: 2 });
        app.update();
        app.world_mut().send_event(RequestDeleteSelectedRows);
        app.update();
        assert_eq!(processes(&app), vec!["b"]);
        assert!(app.world().resource::<SowDocument>().selected_rows.is_empty());
    }

    #[test]
    fn test_duplicate_selected() {
        let mut app = test_app();
        set_processes(&mut app, &["a", "b"]);
        app.world_mut().send_event(ToggleRowSelection { index: 0 });
        app.update();
        app.world_mut().send_event(RequestDuplicateSelectedRows);
        app.update();
        assert_eq!(processes(&app), vec!["a", "a", "b"]);
    }

    #[test]
    fn test_move_row_keeps_selection_on_row() {
        let mut app = test_app();
        set_processes(&mut app, &["a", "b", "c"]);
        app.world_mut().send_event(ToggleRowSelection { index: 0 });
        app.update();
        app.world_mut().send_event(RequestMoveRow { from: 0, to: 2 });
        app.update();
        assert_eq!(processes(&app), vec!["b", "c", "a"]);
        let selected: Vec<usize> = app.world().resource::<SowDocument>().selected_rows.iter().copied().collect();
        assert_eq!(selected, vec![2]);
    }
}
