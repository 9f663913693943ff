use crate::input::types::{BindId, ButtonState, Input};

/// Camera-target context attached to events when a target is available.
/// Supplied per frame by an external targeting system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetInfo {
    pub block_pos: [i32; 3],
    pub hit_position: [f32; 3],
    pub hit_normal: [f32; 3],
}

/// Mouse motion axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAxis {
    X,
    Y,
}

/// Payload of a semantic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEventKind {
    Key {
        input: Input,
        state: ButtonState,
        character: Option<char>,
    },
    MouseButton {
        input: Input,
        state: ButtonState,
        position: [i32; 2],
    },
    MouseWheel {
        position: [i32; 2],
        turns: i32,
    },
    MouseMove {
        axis: MouseAxis,
        value: f32,
    },
    BindButton {
        id: BindId,
        state: ButtonState,
    },
    BindAxis {
        id: String,
        value: f32,
    },
}

/// A semantic event routed through the receiver list. A receiver that
/// calls [`InputEvent::consume`] stops further delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    /// Frame delta in seconds at the time the event was raised.
    pub delta: f32,
    pub target: Option<TargetInfo>,
    consumed: bool,
}

impl InputEvent {
    pub fn new(kind: InputEventKind, delta: f32) -> Self {
        Self {
            kind,
            delta,
            target: None,
            consumed: false,
        }
    }

    pub fn with_target(mut self, target: Option<TargetInfo>) -> Self {
        self.target = target;
        self
    }

    /// Mark the event handled; later receivers will not see it.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A receiver of semantic input events, ordered by the caller.
pub trait InputReceiver {
    fn on_input(&mut self, event: &mut InputEvent);
}

/// Deliver an event to each receiver in order, stopping at the first one
/// that consumes it. Returns whether the event was consumed.
pub fn deliver(event: &mut InputEvent, receivers: &mut [&mut dyn InputReceiver]) -> bool {
    for receiver in receivers.iter_mut() {
        receiver.on_input(event);
        if event.consumed {
            break;
        }
    }
    event.consumed
}
