use crate::input::bind_axis::SendEventMode;
use crate::input::types::{ActivateMode, BindId, Input};

/// Declaration of a logical bind button as supplied by a module registry.
///
/// Declaration order across the registry doubles as default-binding
/// priority: when two buttons declare the same default input, the first
/// declaration claims it.
#[derive(Debug, Clone)]
pub struct ButtonDeclaration {
    pub id: BindId,
    pub display_name: String,
    pub mode: ActivateMode,
    pub repeating: bool,
    pub repeat_ms: u32,
    /// Default physical inputs, in priority order.
    pub defaults: Vec<Input>,
}

impl ButtonDeclaration {
    pub fn new(id: BindId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            mode: ActivateMode::Both,
            repeating: false,
            repeat_ms: 200,
            defaults: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: ActivateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_repeating(mut self, repeat_ms: u32) -> Self {
        self.repeating = true;
        self.repeat_ms = repeat_ms;
        self
    }

    pub fn with_default(mut self, input: Input) -> Self {
        self.defaults.push(input);
        self
    }
}

/// Declaration of a logical bind axis, referencing two declared buttons.
#[derive(Debug, Clone)]
pub struct AxisDeclaration {
    pub id: String,
    pub positive: BindId,
    pub negative: BindId,
    pub send_mode: SendEventMode,
}

impl AxisDeclaration {
    pub fn new(id: impl Into<String>, positive: BindId, negative: BindId) -> Self {
        Self {
            id: id.into(),
            positive,
            negative,
            send_mode: SendEventMode::default(),
        }
    }

    pub fn with_send_mode(mut self, mode: SendEventMode) -> Self {
        self.send_mode = mode;
        self
    }
}

/// Source of bind declarations for all loaded modules. Stands in for the
/// module/plugin registry; the core never inspects code structure itself.
pub trait BindRegistry {
    fn button_declarations(&self) -> &[ButtonDeclaration];
    fn axis_declarations(&self) -> &[AxisDeclaration];
}

/// In-memory registry populated by hand, for engines without a dynamic
/// module system and for tests.
#[derive(Debug, Default)]
pub struct StaticBindRegistry {
    buttons: Vec<ButtonDeclaration>,
    axes: Vec<AxisDeclaration>,
}

impl StaticBindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_button(&mut self, declaration: ButtonDeclaration) {
        self.buttons.push(declaration);
    }

    pub fn add_axis(&mut self, declaration: AxisDeclaration) {
        self.axes.push(declaration);
    }
}

impl BindRegistry for StaticBindRegistry {
    fn button_declarations(&self) -> &[ButtonDeclaration] {
        &self.buttons
    }

    fn axis_declarations(&self) -> &[AxisDeclaration] {
        &self.axes
    }
}
