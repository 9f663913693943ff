use crate::input::types::{ButtonState, Input, InputKind};

/// A raw device action recorded during the frame, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputAction {
    pub input: Input,
    pub state: ButtonState,
    /// Pointer position when the action was recorded (mouse actions).
    pub position: [i32; 2],
    /// Signed wheel turn count (wheel actions only).
    pub turns: i32,
    /// Typed character, when the platform reports one (key actions).
    pub character: Option<char>,
}

impl InputAction {
    pub fn key(input: Input, state: ButtonState, character: Option<char>) -> Self {
        Self {
            input,
            state,
            position: [0, 0],
            turns: 0,
            character,
        }
    }

    pub fn mouse_button(input: Input, state: ButtonState, position: [i32; 2]) -> Self {
        Self {
            input,
            state,
            position,
            turns: 0,
            character: None,
        }
    }

    /// A wheel action; `turns` is signed, its sign selects the direction.
    pub fn mouse_wheel(turns: i32, position: [i32; 2]) -> Self {
        let input = if turns > 0 {
            Input::wheel_up()
        } else {
            Input::wheel_down()
        };
        Self {
            input,
            state: ButtonState::Down,
            position,
            turns,
            character: None,
        }
    }

    pub fn is_wheel(&self) -> bool {
        self.input.kind == InputKind::MouseWheel
    }
}

/// Source of mouse actions and motion for the frame.
pub trait MouseDevice {
    /// Motion accumulated since the last call; draining resets it.
    fn drain_motion(&mut self) -> [i32; 2];

    /// Current pointer position.
    fn position(&self) -> [i32; 2];

    /// Button and wheel actions recorded since the last call, in order.
    fn drain_queue(&mut self) -> Vec<InputAction>;
}

/// Source of keyboard actions for the frame.
pub trait KeyboardDevice {
    /// Key actions recorded since the last call, in order.
    fn drain_queue(&mut self) -> Vec<InputAction>;
}

/// Mouse device that never reports anything.
#[derive(Debug, Default)]
pub struct NullMouseDevice;

impl MouseDevice for NullMouseDevice {
    fn drain_motion(&mut self) -> [i32; 2] {
        [0, 0]
    }

    fn position(&self) -> [i32; 2] {
        [0, 0]
    }

    fn drain_queue(&mut self) -> Vec<InputAction> {
        Vec::new()
    }
}

/// Keyboard device that never reports anything.
#[derive(Debug, Default)]
pub struct NullKeyboardDevice;

impl KeyboardDevice for NullKeyboardDevice {
    fn drain_queue(&mut self) -> Vec<InputAction> {
        Vec::new()
    }
}

/// Buffered mouse device a platform backend pushes actions into.
#[derive(Debug, Default)]
pub struct QueuedMouseDevice {
    queue: Vec<InputAction>,
    motion: [i32; 2],
    position: [i32; 2],
}

impl QueuedMouseDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_action(&mut self, action: InputAction) {
        self.queue.push(action);
    }

    pub fn add_motion(&mut self, dx: i32, dy: i32) {
        self.motion[0] += dx;
        self.motion[1] += dy;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = [x, y];
    }
}

impl MouseDevice for QueuedMouseDevice {
    fn drain_motion(&mut self) -> [i32; 2] {
        std::mem::take(&mut self.motion)
    }

    fn position(&self) -> [i32; 2] {
        self.position
    }

    fn drain_queue(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.queue)
    }
}

/// Buffered keyboard device a platform backend pushes actions into.
#[derive(Debug, Default)]
pub struct QueuedKeyboardDevice {
    queue: Vec<InputAction>,
}

impl QueuedKeyboardDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_action(&mut self, action: InputAction) {
        self.queue.push(action);
    }
}

impl KeyboardDevice for QueuedKeyboardDevice {
    fn drain_queue(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.queue)
    }
}
