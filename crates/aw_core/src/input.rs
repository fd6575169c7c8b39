//! Platform-neutral input events and their translation into demo actions.
//!
//! The window layer converts raw winit events into [`InputEvent`]s and queues
//! them; the fixed-step loop drains the queue and hands each event to
//! [`translate`]. Only presses matter here, releases are never queued.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window's close button was pressed.
    Closed,
    KeyPressed(Key),
    /// A mouse button went down at `position`, already in world coordinates.
    MousePressed { button: MouseBtn, position: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    RequestExit,
    SetMovementTarget(Vec2),
    ToggleOverlay,
}

pub fn translate(event: &InputEvent) -> Option<Action> {
    match *event {
        InputEvent::Closed => Some(Action::RequestExit),
        InputEvent::KeyPressed(Key::Escape) => Some(Action::RequestExit),
        InputEvent::KeyPressed(Key::F3) => Some(Action::ToggleOverlay),
        InputEvent::MousePressed {
            button: MouseBtn::Middle,
            position,
        } => Some(Action::SetMovementTarget(position)),
        InputEvent::MousePressed { .. } => None,
    }
}

/// Something the fixed-step loop can drain input from.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
}

impl EventSource for std::collections::VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn close_and_escape_request_exit() {
        assert_eq!(translate(&InputEvent::Closed), Some(Action::RequestExit));
        assert_eq!(
            translate(&InputEvent::KeyPressed(Key::Escape)),
            Some(Action::RequestExit)
        );
    }

    #[test]
    fn middle_click_sets_target() {
        let event = InputEvent::MousePressed {
            button: MouseBtn::Middle,
            position: Vec2::new(600.0, 300.0),
        };
        assert_eq!(
            translate(&event),
            Some(Action::SetMovementTarget(Vec2::new(600.0, 300.0)))
        );
    }

    #[test]
    fn other_mouse_buttons_are_ignored() {
        for button in [MouseBtn::Left, MouseBtn::Right] {
            let event = InputEvent::MousePressed {
                button,
                position: Vec2::new(10.0, 10.0),
            };
            assert_eq!(translate(&event), None);
        }
    }

    #[test]
    fn f3_toggles_overlay() {
        assert_eq!(
            translate(&InputEvent::KeyPressed(Key::F3)),
            Some(Action::ToggleOverlay)
        );
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue = VecDeque::new();
        queue.push_back(InputEvent::KeyPressed(Key::F3));
        queue.push_back(InputEvent::Closed);
        assert_eq!(queue.poll_event(), Some(InputEvent::KeyPressed(Key::F3)));
        assert_eq!(queue.poll_event(), Some(InputEvent::Closed));
        assert_eq!(queue.poll_event(), None);
    }
}
