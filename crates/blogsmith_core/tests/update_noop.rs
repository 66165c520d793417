use blogsmith_core::{update, AppState, GenerationOutcome, Msg, Stage};

#[test]
fn progress_without_a_run_changes_nothing() {
    let state = AppState::new();
    let (next, effects) = update(
        state.clone(),
        Msg::StageStarted {
            run_id: 1,
            stage: Stage::Outline,
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn late_completion_does_not_dirty_state() {
    let mut state = AppState::new();
    state.consume_dirty();
    let (mut next, effects) = update(
        state,
        Msg::GenerationFinished {
            run_id: 3,
            outcome: GenerationOutcome::Completed {
                content: "# Late".to_string(),
            },
        },
    );

    assert!(!next.consume_dirty());
    assert!(effects.is_empty());
    assert_eq!(next.final_content(), None);
}
