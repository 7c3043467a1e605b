//! Pointer-gesture interpretation: one pointer-down → pointer-up cycle
//! produces at most one annotation, built incrementally from the live
//! pointer position and committed on release.

use crate::ink::history::History;
use crate::ink::model::{
    Annotation, Point, Rect, Tool, ERASER_WIDTH_FACTOR, HIGHLIGHTER_OPACITY,
};
use crate::ink::session::SessionState;

/// Floating text field state for the text tool. The UI owns editing the
/// buffer; the anchor is where the glyphs will land on commit.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub anchor: Point,
    pub buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Drawing mode off, a modal surface open, or a text entry already
    /// showing: the press is not a gesture.
    Ignored,
    /// An in-progress record was seeded.
    Started,
    /// Text tool: a floating input was opened instead of a record.
    TextPrompt,
}

#[derive(Debug, Default)]
pub struct GestureController {
    start: Point,
    active: Option<Annotation>,
    text_entry: Option<TextEntry>,
}

impl GestureController {
    pub fn pointer_down(&mut self, pos: Point, session: &SessionState) -> PointerOutcome {
        if !session.gestures_enabled() || self.text_entry.is_some() {
            return PointerOutcome::Ignored;
        }

        self.start = pos;

        if session.tool() == Tool::Text {
            self.text_entry = Some(TextEntry {
                anchor: pos,
                buffer: String::new(),
            });
            return PointerOutcome::TextPrompt;
        }

        self.active = Some(seed_record(session, pos));
        PointerOutcome::Started
    }

    /// Recompute the in-progress record from the live pointer position.
    /// Returns `true` when a redraw is due.
    pub fn pointer_move(&mut self, pos: Point) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        match active {
            Annotation::Path { points, .. } | Annotation::Eraser { points, .. } => {
                if points.last() != Some(&pos) {
                    points.push(pos);
                }
            }
            Annotation::Rectangle { rect, .. } | Annotation::Circle { rect, .. } => {
                *rect = Rect::from_corners(self.start, pos);
            }
            Annotation::Line { end, .. } | Annotation::Arrow { end, .. } => {
                *end = pos;
            }
            Annotation::Text { .. } => {}
        }
        true
    }

    /// Pointer-up or pointer-leave: commit the in-progress record, if
    /// any. Without one this is a silent no-op. A press-and-release with
    /// no movement commits the degenerate zero-length shape as-is.
    pub fn finish(&mut self, pos: Option<Point>, history: &mut History) -> bool {
        if let Some(pos) = pos {
            self.pointer_move(pos);
        }
        match self.active.take() {
            Some(record) => {
                history.commit(record);
                true
            }
            None => false,
        }
    }

    pub fn in_progress(&self) -> Option<&Annotation> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.text_entry.as_ref()
    }

    pub fn text_entry_mut(&mut self) -> Option<&mut TextEntry> {
        self.text_entry.as_mut()
    }

    /// Enter or blur-with-content: commit a text record at the stored
    /// anchor unless the trimmed buffer is empty.
    pub fn submit_text(&mut self, session: &SessionState, history: &mut History) -> bool {
        let Some(entry) = self.text_entry.take() else {
            return false;
        };
        if entry.buffer.trim().is_empty() {
            return false;
        }
        history.commit(Annotation::Text {
            anchor: entry.anchor,
            content: entry.buffer,
            color: session.color(),
            size: session.stroke_size(),
        });
        true
    }

    /// Escape or blur-while-empty: drop the field without committing.
    pub fn cancel_text(&mut self) {
        self.text_entry = None;
    }
}

fn seed_record(session: &SessionState, pos: Point) -> Annotation {
    let color = session.color();
    let width = session.stroke_size();
    match session.tool() {
        Tool::Pen => Annotation::Path {
            points: vec![pos],
            color,
            width,
            opacity: 1.0,
        },
        Tool::Highlighter => Annotation::Path {
            points: vec![pos],
            color,
            width,
            opacity: HIGHLIGHTER_OPACITY,
        },
        Tool::Eraser => Annotation::Eraser {
            points: vec![pos],
            width: width * ERASER_WIDTH_FACTOR,
        },
        Tool::Rectangle => Annotation::Rectangle {
            rect: Rect::from_corners(pos, pos),
            color,
            width,
        },
        Tool::Circle => Annotation::Circle {
            rect: Rect::from_corners(pos, pos),
            color,
            width,
        },
        Tool::Line => Annotation::Line {
            start: pos,
            end: pos,
            color,
            width,
        },
        Tool::Arrow => Annotation::Arrow {
            start: pos,
            end: pos,
            color,
            width,
        },
        // Text never reaches seeding; pointer_down opens the prompt.
        Tool::Text => Annotation::Text {
            anchor: pos,
            content: String::new(),
            color,
            size: width,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ink::model::Color;

    fn session_with(tool: Tool) -> SessionState {
        let mut session = SessionState::default();
        session.select_tool(tool);
        session
    }

    #[test]
    fn pen_gesture_commits_one_path_with_all_points() {
        let session = session_with(Tool::Pen);
        let mut gesture = GestureController::default();
        let mut history = History::default();

        assert_eq!(
            gesture.pointer_down(Point::new(1.0, 1.0), &session),
            PointerOutcome::Started
        );
        assert!(gesture.pointer_move(Point::new(2.0, 2.0)));
        assert!(gesture.finish(Some(Point::new(3.0, 3.0)), &mut history));

        assert_eq!(history.len(), 1);
        match &history.records()[0] {
            Annotation::Path { points, opacity, .. } => {
                assert_eq!(points.len(), 3);
                assert_eq!(*opacity, 1.0);
            }
            other => panic!("expected path, got {other:?}"),
        }
        assert!(!gesture.is_active());
    }

    #[test]
    fn highlighter_and_eraser_carry_their_width_and_opacity_rules() {
        let mut session = session_with(Tool::Highlighter);
        session.set_stroke_size(4.0);
        let mut gesture = GestureController::default();
        gesture.pointer_down(Point::new(0.0, 0.0), &session);
        match gesture.in_progress().unwrap() {
            Annotation::Path { opacity, width, .. } => {
                assert_eq!(*opacity, HIGHLIGHTER_OPACITY);
                assert_eq!(*width, 4.0);
            }
            other => panic!("expected path, got {other:?}"),
        }

        session.select_tool(Tool::Eraser);
        let mut gesture = GestureController::default();
        gesture.pointer_down(Point::new(0.0, 0.0), &session);
        match gesture.in_progress().unwrap() {
            Annotation::Eraser { width, .. } => assert_eq!(*width, 12.0),
            other => panic!("expected eraser, got {other:?}"),
        }
    }

    #[test]
    fn shape_gestures_recompute_from_the_fixed_start_corner() {
        let session = session_with(Tool::Rectangle);
        let mut gesture = GestureController::default();
        let mut history = History::default();

        gesture.pointer_down(Point::new(100.0, 100.0), &session);
        gesture.pointer_move(Point::new(70.0, 50.0));
        gesture.finish(Some(Point::new(40.0, 20.0)), &mut history);

        match &history.records()[0] {
            Annotation::Rectangle { rect, .. } => {
                assert_eq!((rect.x, rect.y, rect.w, rect.h), (40.0, 20.0, 60.0, 80.0));
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn click_without_movement_commits_a_degenerate_shape() {
        let session = session_with(Tool::Line);
        let mut gesture = GestureController::default();
        let mut history = History::default();

        gesture.pointer_down(Point::new(5.0, 5.0), &session);
        gesture.finish(Some(Point::new(5.0, 5.0)), &mut history);

        match &history.records()[0] {
            Annotation::Line { start, end, .. } => assert_eq!(start, end),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn finish_without_an_active_gesture_is_a_silent_no_op() {
        let mut gesture = GestureController::default();
        let mut history = History::default();
        assert!(!gesture.finish(Some(Point::new(1.0, 1.0)), &mut history));
        assert!(history.is_empty());
    }

    #[test]
    fn moves_in_idle_state_are_rejected() {
        let mut gesture = GestureController::default();
        assert!(!gesture.pointer_move(Point::new(9.0, 9.0)));
    }

    #[test]
    fn gestures_are_ignored_while_disabled() {
        let mut session = session_with(Tool::Pen);
        session.toggle_drawing_mode();
        let mut gesture = GestureController::default();
        assert_eq!(
            gesture.pointer_down(Point::new(0.0, 0.0), &session),
            PointerOutcome::Ignored
        );

        let mut session = session_with(Tool::Pen);
        session.open_settings();
        assert_eq!(
            gesture.pointer_down(Point::new(0.0, 0.0), &session),
            PointerOutcome::Ignored
        );

        let mut session = session_with(Tool::Pen);
        session.open_settings();
        session.arm_recording("undo");
        assert_eq!(
            gesture.pointer_down(Point::new(0.0, 0.0), &session),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn text_tool_opens_a_prompt_and_commits_on_submit() {
        let mut session = session_with(Tool::Text);
        session.select_color(Color::rgb(0, 0, 255));
        let mut gesture = GestureController::default();
        let mut history = History::default();

        assert_eq!(
            gesture.pointer_down(Point::new(30.0, 40.0), &session),
            PointerOutcome::TextPrompt
        );
        assert!(gesture.in_progress().is_none());

        gesture.text_entry_mut().unwrap().buffer.push_str("note");
        assert!(gesture.submit_text(&session, &mut history));
        match &history.records()[0] {
            Annotation::Text {
                anchor,
                content,
                color,
                ..
            } => {
                assert_eq!((anchor.x, anchor.y), (30.0, 40.0));
                assert_eq!(content, "note");
                assert_eq!(*color, Color::rgb(0, 0, 255));
            }
            other => panic!("expected text, got {other:?}"),
        }
        assert!(gesture.text_entry().is_none());
    }

    #[test]
    fn whitespace_only_text_is_discarded() {
        let session = session_with(Tool::Text);
        let mut gesture = GestureController::default();
        let mut history = History::default();

        gesture.pointer_down(Point::new(0.0, 0.0), &session);
        gesture.text_entry_mut().unwrap().buffer.push_str("   ");
        assert!(!gesture.submit_text(&session, &mut history));
        assert!(history.is_empty());
        assert!(gesture.text_entry().is_none());
    }

    #[test]
    fn cancel_text_discards_the_prompt() {
        let session = session_with(Tool::Text);
        let mut gesture = GestureController::default();

        gesture.pointer_down(Point::new(0.0, 0.0), &session);
        gesture.cancel_text();
        assert!(gesture.text_entry().is_none());

        // A second press opens a fresh prompt.
        assert_eq!(
            gesture.pointer_down(Point::new(1.0, 1.0), &session),
            PointerOutcome::TextPrompt
        );
    }
}
