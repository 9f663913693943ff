use std::fmt;

use serde::{Deserialize, Serialize};

/// Class of physical input a descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Key,
    MouseButton,
    MouseWheel,
}

/// Immutable descriptor of a physical input: a keyboard key, a mouse
/// button or a mouse wheel direction. Equality and hashing use only
/// `(kind, code)`; names are derived lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Input {
    pub kind: InputKind,
    pub code: i32,
}

impl Input {
    pub fn key(code: i32) -> Self {
        Self {
            kind: InputKind::Key,
            code,
        }
    }

    pub fn mouse_button(code: i32) -> Self {
        Self {
            kind: InputKind::MouseButton,
            code,
        }
    }

    pub fn wheel_up() -> Self {
        Self {
            kind: InputKind::MouseWheel,
            code: mouse::WHEEL_UP,
        }
    }

    pub fn wheel_down() -> Self {
        Self {
            kind: InputKind::MouseWheel,
            code: mouse::WHEEL_DOWN,
        }
    }

    /// Canonical name of this input, e.g. `W`, `MouseLeft`, `MouseWheelUp`.
    pub fn name(&self) -> String {
        match self.kind {
            InputKind::Key => match keys::name(self.code) {
                Some(name) => name.to_string(),
                None => format!("Key{}", self.code),
            },
            InputKind::MouseButton => match self.code {
                mouse::LEFT => "MouseLeft".to_string(),
                mouse::RIGHT => "MouseRight".to_string(),
                mouse::MIDDLE => "MouseMiddle".to_string(),
                other => format!("Mouse{}", other),
            },
            InputKind::MouseWheel => {
                if self.code > 0 {
                    "MouseWheelUp".to_string()
                } else {
                    "MouseWheelDown".to_string()
                }
            }
        }
    }

    /// Human-readable name for binding UIs.
    pub fn display_name(&self) -> String {
        match self.kind {
            InputKind::Key => self.name(),
            InputKind::MouseButton => match self.code {
                mouse::LEFT => "Left Click".to_string(),
                mouse::RIGHT => "Right Click".to_string(),
                mouse::MIDDLE => "Middle Click".to_string(),
                other => format!("Mouse Button {}", other),
            },
            InputKind::MouseWheel => {
                if self.code > 0 {
                    "Mouse Wheel Up".to_string()
                } else {
                    "Mouse Wheel Down".to_string()
                }
            }
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identifier of a logical bind: `(module, name)`, unique across the
/// session and ordered by module then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindId {
    pub module: String,
    pub name: String,
}

impl BindId {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parse a `module:name` string.
    pub fn parse(s: &str) -> Option<Self> {
        let (module, name) = s.split_once(':')?;
        if module.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(module, name))
    }
}

impl fmt::Display for BindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.name)
    }
}

/// State carried by button transitions. Buttons only ever *store* Up or
/// Down; Repeat is a transient event kind emitted while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Up,
    Down,
    Repeat,
}

impl ButtonState {
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Down | ButtonState::Repeat)
    }
}

/// Circumstances under which a bind button emits events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivateMode {
    #[default]
    Both,
    Press,
    Release,
}

impl ActivateMode {
    pub fn activated_on_press(self) -> bool {
        matches!(self, ActivateMode::Both | ActivateMode::Press)
    }

    pub fn activated_on_release(self) -> bool {
        matches!(self, ActivateMode::Both | ActivateMode::Release)
    }
}

/// Mouse button and wheel codes.
pub mod mouse {
    pub const LEFT: i32 = 0;
    pub const RIGHT: i32 = 1;
    pub const MIDDLE: i32 = 2;

    /// Wheel direction codes; positive turns scroll up.
    pub const WHEEL_UP: i32 = 1;
    pub const WHEEL_DOWN: i32 = -1;
}

/// Keyboard scan codes and their canonical names.
pub mod keys {
    pub const ESCAPE: i32 = 1;
    pub const NUM_1: i32 = 2;
    pub const NUM_2: i32 = 3;
    pub const NUM_3: i32 = 4;
    pub const NUM_4: i32 = 5;
    pub const NUM_5: i32 = 6;
    pub const NUM_6: i32 = 7;
    pub const NUM_7: i32 = 8;
    pub const NUM_8: i32 = 9;
    pub const NUM_9: i32 = 10;
    pub const NUM_0: i32 = 11;
    pub const MINUS: i32 = 12;
    pub const EQUALS: i32 = 13;
    pub const BACKSPACE: i32 = 14;
    pub const TAB: i32 = 15;
    pub const Q: i32 = 16;
    pub const W: i32 = 17;
    pub const E: i32 = 18;
    pub const R: i32 = 19;
    pub const T: i32 = 20;
    pub const Y: i32 = 21;
    pub const U: i32 = 22;
    pub const I: i32 = 23;
    pub const O: i32 = 24;
    pub const P: i32 = 25;
    pub const LEFT_BRACKET: i32 = 26;
    pub const RIGHT_BRACKET: i32 = 27;
    pub const ENTER: i32 = 28;
    pub const LEFT_CONTROL: i32 = 29;
    pub const A: i32 = 30;
    pub const S: i32 = 31;
    pub const D: i32 = 32;
    pub const F: i32 = 33;
    pub const G: i32 = 34;
    pub const H: i32 = 35;
    pub const J: i32 = 36;
    pub const K: i32 = 37;
    pub const L: i32 = 38;
    pub const SEMICOLON: i32 = 39;
    pub const APOSTROPHE: i32 = 40;
    pub const GRAVE: i32 = 41;
    pub const LEFT_SHIFT: i32 = 42;
    pub const BACKSLASH: i32 = 43;
    pub const Z: i32 = 44;
    pub const X: i32 = 45;
    pub const C: i32 = 46;
    pub const V: i32 = 47;
    pub const B: i32 = 48;
    pub const N: i32 = 49;
    pub const M: i32 = 50;
    pub const COMMA: i32 = 51;
    pub const PERIOD: i32 = 52;
    pub const SLASH: i32 = 53;
    pub const RIGHT_SHIFT: i32 = 54;
    pub const LEFT_ALT: i32 = 56;
    pub const SPACE: i32 = 57;
    pub const CAPS_LOCK: i32 = 58;
    pub const F1: i32 = 59;
    pub const F2: i32 = 60;
    pub const F3: i32 = 61;
    pub const F4: i32 = 62;
    pub const F5: i32 = 63;
    pub const F6: i32 = 64;
    pub const F7: i32 = 65;
    pub const F8: i32 = 66;
    pub const F9: i32 = 67;
    pub const F10: i32 = 68;
    pub const F11: i32 = 87;
    pub const F12: i32 = 88;
    pub const RIGHT_CONTROL: i32 = 157;
    pub const RIGHT_ALT: i32 = 184;
    pub const HOME: i32 = 199;
    pub const UP: i32 = 200;
    pub const PAGE_UP: i32 = 201;
    pub const LEFT: i32 = 203;
    pub const RIGHT: i32 = 205;
    pub const END: i32 = 207;
    pub const DOWN: i32 = 208;
    pub const PAGE_DOWN: i32 = 209;
    pub const INSERT: i32 = 210;
    pub const DELETE: i32 = 211;

    /// Canonical name for a key code.
    pub fn name(code: i32) -> Option<&'static str> {
        let name = match code {
            ESCAPE => "Escape",
            NUM_1 => "1",
            NUM_2 => "2",
            NUM_3 => "3",
            NUM_4 => "4",
            NUM_5 => "5",
            NUM_6 => "6",
            NUM_7 => "7",
            NUM_8 => "8",
            NUM_9 => "9",
            NUM_0 => "0",
            MINUS => "Minus",
            EQUALS => "Equals",
            BACKSPACE => "Backspace",
            TAB => "Tab",
            Q => "Q",
            W => "W",
            E => "E",
            R => "R",
            T => "T",
            Y => "Y",
            U => "U",
            I => "I",
            O => "O",
            P => "P",
            LEFT_BRACKET => "LeftBracket",
            RIGHT_BRACKET => "RightBracket",
            ENTER => "Enter",
            LEFT_CONTROL => "LeftControl",
            A => "A",
            S => "S",
            D => "D",
            F => "F",
            G => "G",
            H => "H",
            J => "J",
            K => "K",
            L => "L",
            SEMICOLON => "Semicolon",
            APOSTROPHE => "Apostrophe",
            GRAVE => "Grave",
            LEFT_SHIFT => "LeftShift",
            BACKSLASH => "Backslash",
            Z => "Z",
            X => "X",
            C => "C",
            V => "V",
            B => "B",
            N => "N",
            M => "M",
            COMMA => "Comma",
            PERIOD => "Period",
            SLASH => "Slash",
            RIGHT_SHIFT => "RightShift",
            LEFT_ALT => "LeftAlt",
            SPACE => "Space",
            CAPS_LOCK => "CapsLock",
            F1 => "F1",
            F2 => "F2",
            F3 => "F3",
            F4 => "F4",
            F5 => "F5",
            F6 => "F6",
            F7 => "F7",
            F8 => "F8",
            F9 => "F9",
            F10 => "F10",
            F11 => "F11",
            F12 => "F12",
            RIGHT_CONTROL => "RightControl",
            RIGHT_ALT => "RightAlt",
            HOME => "Home",
            UP => "Up",
            PAGE_UP => "PageUp",
            LEFT => "Left",
            RIGHT => "Right",
            END => "End",
            DOWN => "Down",
            PAGE_DOWN => "PageDown",
            INSERT => "Insert",
            DELETE => "Delete",
            _ => return None,
        };
        Some(name)
    }
}
