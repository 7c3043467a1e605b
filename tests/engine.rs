//! Cross-component scenarios: gestures feeding history, shortcut
//! dispatch driving the session, and replay rendering over the result.

use glasspen::ink::history::History;
use glasspen::ink::input::GestureController;
use glasspen::ink::messages::{HostSignal, SignalPump};
use glasspen::ink::model::{Annotation, Color, Point, Tool};
use glasspen::ink::render::Canvas;
use glasspen::ink::session::{ChordOutcome, HostRequest, SessionState};
use glasspen::ink::shortcuts::{Chord, Modifiers};

fn draw_shape(
    session: &SessionState,
    history: &mut History,
    gesture: &mut GestureController,
    from: (f32, f32),
    to: (f32, f32),
) {
    gesture.pointer_down(Point::new(from.0, from.1), session);
    gesture.pointer_move(Point::new((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    gesture.finish(Some(Point::new(to.0, to.1)), history);
}

#[test]
fn undo_twice_then_redo_scenario_through_gestures() {
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    // A three-point path…
    session.select_tool(Tool::Pen);
    gesture.pointer_down(Point::new(1.0, 1.0), &session);
    gesture.pointer_move(Point::new(2.0, 2.0));
    gesture.finish(Some(Point::new(3.0, 3.0)), &mut history);

    // …then a rectangle.
    session.select_tool(Tool::Rectangle);
    draw_shape(&session, &mut history, &mut gesture, (10.0, 10.0), (30.0, 25.0));

    assert_eq!(history.len(), 2);

    assert!(history.undo());
    assert!(history.undo());
    assert!(history.is_empty());
    assert_eq!(history.redo_len(), 2);

    assert!(history.redo());
    assert_eq!(history.len(), 1);
    assert_eq!(history.redo_len(), 1);
    assert!(matches!(history.records()[0], Annotation::Path { .. }));
}

#[test]
fn clear_via_action_is_undone_in_one_step() {
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    session.select_tool(Tool::Line);
    draw_shape(&session, &mut history, &mut gesture, (0.0, 0.0), (10.0, 10.0));
    session.select_tool(Tool::Circle);
    draw_shape(&session, &mut history, &mut gesture, (20.0, 20.0), (40.0, 40.0));
    let before = history.records().to_vec();

    session.execute_action("clear", &mut history);
    assert!(history.is_empty());

    session.execute_action("undo", &mut history);
    assert_eq!(history.records(), &before[..]);
}

#[test]
fn default_shortcuts_drive_history_operations() {
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    session.select_tool(Tool::Arrow);
    draw_shape(&session, &mut history, &mut gesture, (5.0, 5.0), (50.0, 5.0));
    assert_eq!(history.len(), 1);

    let ctrl_z = Chord::Key {
        id: "z".to_string(),
        mods: Modifiers::CTRL,
    };
    assert_eq!(
        session.handle_chord(&ctrl_z, &mut history),
        ChordOutcome::Action {
            name: "undo",
            request: None
        }
    );
    assert!(history.is_empty());

    // Ctrl+Shift+Z is a different chord and must not match the undo
    // binding.
    let ctrl_shift_z = Chord::Key {
        id: "z".to_string(),
        mods: Modifiers::CTRL_SHIFT,
    };
    assert_eq!(
        session.handle_chord(&ctrl_shift_z, &mut history),
        ChordOutcome::Unmatched
    );

    let ctrl_y = Chord::Key {
        id: "y".to_string(),
        mods: Modifiers::CTRL,
    };
    session.handle_chord(&ctrl_y, &mut history);
    assert_eq!(history.len(), 1);

    // Tool selection shortcut: Ctrl+4 selects the circle tool.
    let ctrl_4 = Chord::Key {
        id: "4".to_string(),
        mods: Modifiers::CTRL,
    };
    session.handle_chord(&ctrl_4, &mut history);
    assert_eq!(session.tool(), Tool::Circle);
}

#[test]
fn replay_output_depends_only_on_history_and_transient_state() {
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    session.select_color(Color::rgb(0, 128, 255));
    session.select_tool(Tool::Rectangle);
    draw_shape(&session, &mut history, &mut gesture, (30.0, 8.0), (6.0, 28.0));
    session.select_tool(Tool::Highlighter);
    gesture.pointer_down(Point::new(4.0, 4.0), &session);
    gesture.pointer_move(Point::new(40.0, 44.0));
    gesture.finish(Some(Point::new(60.0, 12.0)), &mut history);

    let mut canvas_a = Canvas::new(80, 60);
    let mut canvas_b = Canvas::new(80, 60);
    canvas_a.redraw(&history, None, None);
    canvas_b.redraw(&history, None, None);
    assert_eq!(canvas_a.pixels(), canvas_b.pixels());

    // Undo + redo round-trips to the identical painted output.
    let reference = canvas_a.pixels().to_vec();
    history.undo();
    history.redo();
    canvas_a.redraw(&history, None, None);
    assert_eq!(canvas_a.pixels(), &reference[..]);
}

#[test]
fn host_signals_reach_the_engine_through_the_pump() {
    let (tx, mut pump) = SignalPump::channel();
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    session.select_tool(Tool::Pen);
    draw_shape(&session, &mut history, &mut gesture, (0.0, 0.0), (9.0, 9.0));

    tx.send(HostSignal::SetTool(Tool::Eraser)).unwrap();
    tx.send(HostSignal::ClearCanvas).unwrap();
    tx.send(HostSignal::DrawingModeChanged(false)).unwrap();

    let mut requests = Vec::new();
    pump.pump(|signal| {
        if let Some(request) = session.apply_signal(signal, &mut history) {
            requests.push(request);
        }
    });

    assert_eq!(session.tool(), Tool::Eraser);
    assert!(history.is_empty());
    assert_eq!(history.redo_len(), 1);
    assert!(!session.drawing_mode());
    assert_eq!(requests, vec![HostRequest::CapturePointer(false)]);
}

#[test]
fn gestures_stay_dead_while_settings_are_open() {
    let mut session = SessionState::default();
    let mut history = History::default();
    let mut gesture = GestureController::default();

    session.open_settings();
    gesture.pointer_down(Point::new(5.0, 5.0), &session);
    gesture.finish(Some(Point::new(9.0, 9.0)), &mut history);
    assert!(history.is_empty());

    session.cancel_settings();
    gesture.pointer_down(Point::new(5.0, 5.0), &session);
    gesture.finish(Some(Point::new(9.0, 9.0)), &mut history);
    assert_eq!(history.len(), 1);
}
