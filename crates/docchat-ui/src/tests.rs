#[cfg(test)]
mod tests {
    use crate::state::*;
    use chrono::{TimeZone, Utc};
    use docchat_core::gate::GateState;
    use docchat_types::event::ClientEvent;
    use docchat_types::message::{DeliveryStatus, Message, Role};
    use docchat_types::session::Session;

    fn session(id: &str, document: Option<&str>) -> Session {
        Session::new(id, "t", document.map(String::from), Utc.timestamp_opt(1, 0).unwrap())
    }

    fn selected(id: &str) -> UiState {
        let mut state = UiState::new();
        state.process_events(vec![
            ClientEvent::DirectoryChanged {
                sessions: vec![session("a", Some("a.pdf")), session("b", None)],
            },
            ClientEvent::SelectionChanged {
                session_id: Some(id.to_string()),
            },
        ]);
        state
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.sessions.is_empty());
        assert!(state.active.is_none());
        assert!(state.messages.is_empty());
        assert!(state.input_text.is_empty());
        assert_eq!(state.status_text, "Ready");
        assert!(state.error.is_none());
        assert!(!state.is_busy());
        assert_eq!(state.gate_state(), None);
    }

    #[test]
    fn test_ui_state_gate_follows_directory() {
        assert_eq!(selected("a").gate_state(), Some(GateState::Ready));
        assert_eq!(selected("b").gate_state(), Some(GateState::AwaitingUpload));
        assert_eq!(selected("zzz").gate_state(), None);
    }

    #[test]
    fn test_ui_state_messages_for_active_only() {
        let mut state = selected("a");
        state.process_events(vec![ClientEvent::MessagesChanged {
            session_id: "b".to_string(),
            messages: vec![Message::from_server("1", Role::User, "other")],
            sending: false,
        }]);
        assert!(state.messages.is_empty());

        state.process_events(vec![ClientEvent::MessagesChanged {
            session_id: "a".to_string(),
            messages: vec![Message::pending(uuid::Uuid::new_v4(), "mine")],
            sending: true,
        }]);
        assert_eq!(state.messages.len(), 1);
        assert!(state.sending);
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Thinking...");
    }

    #[test]
    fn test_ui_state_selection_change_clears_messages() {
        let mut state = selected("a");
        state.process_events(vec![ClientEvent::MessagesChanged {
            session_id: "a".to_string(),
            messages: vec![Message::from_server("1", Role::User, "q")],
            sending: false,
        }]);
        state.process_events(vec![ClientEvent::SelectionChanged { session_id: None }]);
        assert!(state.active.is_none());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_ui_state_upload_lifecycle() {
        let mut state = selected("b");
        state.process_events(vec![ClientEvent::UploadStarted {
            session_id: "b".to_string(),
            file_name: "q3.xlsx".to_string(),
        }]);
        assert_eq!(state.uploading.as_deref(), Some("q3.xlsx"));
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Processing q3.xlsx...");

        state.process_events(vec![ClientEvent::UploadFinished {
            session_id: "b".to_string(),
            success: false,
        }]);
        assert!(state.uploading.is_none());
        assert_eq!(state.status_text, "Upload failed");
    }

    #[test]
    fn test_ui_state_upload_for_other_session_ignored() {
        let mut state = selected("a");
        state.process_events(vec![ClientEvent::UploadStarted {
            session_id: "b".to_string(),
            file_name: "x.pdf".to_string(),
        }]);
        assert!(state.uploading.is_none());
    }

    #[test]
    fn test_ui_state_error_and_dismiss() {
        let mut state = UiState::new();
        state.process_events(vec![ClientEvent::Error {
            message: "Transport error: HTTP 500: boom".to_string(),
        }]);
        assert_eq!(state.error.as_deref(), Some("Transport error: HTTP 500: boom"));
        assert!(state.status_text.starts_with("Error:"));
        state.dismiss_error();
        assert!(state.error.is_none());
    }

    #[test]
    fn test_ui_state_can_send_requires_ready_gate() {
        let mut state = selected("b");
        state.input_text = "hello".to_string();
        assert!(!state.can_send());

        let mut state = selected("a");
        assert!(!state.can_send());
        state.input_text = "   ".to_string();
        assert!(!state.can_send());
        state.input_text = "hello".to_string();
        assert!(state.can_send());
        state.sending = true;
        assert!(!state.can_send());
    }

    #[test]
    fn test_ui_state_keeps_failed_status() {
        let mut state = selected("a");
        let mut failed = Message::pending(uuid::Uuid::new_v4(), "lost");
        failed.status = DeliveryStatus::Failed;
        state.process_events(vec![ClientEvent::MessagesChanged {
            session_id: "a".to_string(),
            messages: vec![failed],
            sending: false,
        }]);
        assert!(state.messages[0].is_failed());
        assert!(state.messages[0].correlation_id().is_some());
    }
}
