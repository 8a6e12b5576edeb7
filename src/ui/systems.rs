// src/ui/systems.rs
use bevy::prelude::*;

use crate::sow::events::OperationFeedback;
use crate::ui::UiFeedbackState;

/// Shows the first info message of the frame, or the last error if every
/// message was an error.
pub fn handle_ui_feedback(
    mut feedback_events: EventReader<OperationFeedback>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    let mut last_message = None;
    for event in feedback_events.read() {
        last_message = Some((event.message.clone(), event.is_error));
        if !event.is_error {
            break;
        }
    }
    if let Some((msg, is_error)) = last_message {
        ui_feedback_state.last_message = msg;
        ui_feedback_state.is_error = is_error;
        if is_error {
            warn!("UI Feedback (Error): {}", ui_feedback_state.last_message);
        } else {
            info!("UI Feedback: {}", ui_feedback_state.last_message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<OperationFeedback>()
            .init_resource::<UiFeedbackState>()
            .add_systems(Update, handle_ui_feedback);
        app
    }

    #[test]
    fn test_error_is_shown() {
        let mut app = test_app();
        app.world_mut().send_event(OperationFeedback::error("boom"));
        app.update();
        let state = app.world().resource::<UiFeedbackState>();
        assert_eq!(state.last_message, "boom");
        assert!(state.is_error);
    }

    #[test]
    fn test_info_preferred_over_later_errors() {
        let mut app = test_app();
        app.world_mut().send_event(OperationFeedback::error("first"));
        app.world_mut().send_event(OperationFeedback::info("saved"));
        app.world_mut().send_event(OperationFeedback::error("later"));
        app.update();
        let state = app.world().resource::<UiFeedbackState>();
        assert_eq!(state.last_message, "saved");
        assert!(!state.is_error);
    }
}
