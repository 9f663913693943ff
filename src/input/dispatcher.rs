use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::binds::BindsConfig;
use crate::config::settings::InputSettings;
use crate::input::bind_axis::BindAxis;
use crate::input::bind_button::BindButton;
use crate::input::device::{KeyboardDevice, MouseDevice, NullKeyboardDevice, NullMouseDevice};
use crate::input::events::{
    InputEvent, InputEventKind, InputReceiver, MouseAxis, TargetInfo, deliver,
};
use crate::input::registry::{AxisDeclaration, BindRegistry, ButtonDeclaration};
use crate::input::types::{BindId, ButtonState, Input, InputKind};

/// Per-frame input orchestrator.
///
/// Drains the device queues, emits semantic events to the receiver list
/// with first-consumer-wins delivery, and keeps every registered bind
/// button and axis up to date. Bind state lives behind index lookups, so
/// re-applying binds invalidates nothing.
///
/// Update order within a frame is mouse motion, mouse queue, keyboard
/// queue, button repeat timers, axes.
pub struct InputDispatcher {
    mouse: Box<dyn MouseDevice>,
    keyboard: Box<dyn KeyboardDevice>,
    buttons: Vec<BindButton>,
    button_lookup: HashMap<BindId, usize>,
    axes: Vec<BindAxis>,
    axis_lookup: HashMap<String, usize>,
    key_binds: HashMap<i32, usize>,
    mouse_button_binds: HashMap<i32, usize>,
    wheel_up_bind: Option<usize>,
    wheel_down_bind: Option<usize>,
    mouse_sensitivity: f32,
    has_focus: bool,
    target: Option<TargetInfo>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self {
            mouse: Box::new(NullMouseDevice),
            keyboard: Box::new(NullKeyboardDevice),
            buttons: Vec::new(),
            button_lookup: HashMap::new(),
            axes: Vec::new(),
            axis_lookup: HashMap::new(),
            key_binds: HashMap::new(),
            mouse_button_binds: HashMap::new(),
            wheel_up_bind: None,
            wheel_down_bind: None,
            mouse_sensitivity: InputSettings::default().mouse_sensitivity,
            has_focus: true,
            target: None,
        }
    }

    pub fn set_mouse_device(&mut self, device: Box<dyn MouseDevice>) {
        self.mouse = device;
    }

    pub fn set_keyboard_device(&mut self, device: Box<dyn KeyboardDevice>) {
        self.keyboard = device;
    }

    pub fn apply_settings(&mut self, settings: &InputSettings) {
        self.mouse_sensitivity = settings.mouse_sensitivity;
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Camera-target context attached to events raised this frame.
    pub fn set_target(&mut self, target: Option<TargetInfo>) {
        self.target = target;
    }

    pub fn bind_button(&self, id: &BindId) -> Option<&BindButton> {
        self.button_lookup.get(id).map(|&i| &self.buttons[i])
    }

    pub fn bind_button_mut(&mut self, id: &BindId) -> Option<&mut BindButton> {
        match self.button_lookup.get(id) {
            Some(&i) => Some(&mut self.buttons[i]),
            None => None,
        }
    }

    pub fn bind_axis(&self, id: &str) -> Option<&BindAxis> {
        self.axis_lookup.get(id).map(|&i| &self.axes[i])
    }

    pub fn bind_axis_mut(&mut self, id: &str) -> Option<&mut BindAxis> {
        match self.axis_lookup.get(id) {
            Some(&i) => Some(&mut self.axes[i]),
            None => None,
        }
    }

    /// Register a declared button. Duplicate ids are reported and
    /// skipped; a repeating declaration with a zero interval is reported
    /// and registered with repeating disabled.
    pub fn register_bind_button(&mut self, declaration: &ButtonDeclaration) -> bool {
        if self.button_lookup.contains_key(&declaration.id) {
            warn!("duplicate button bind \"{}\", skipping", declaration.id);
            return false;
        }
        let mut button = BindButton::new(declaration.id.clone(), &declaration.display_name);
        button.set_mode(declaration.mode);
        if declaration.repeating && declaration.repeat_ms == 0 {
            warn!(
                "button bind \"{}\" declares repeating with a zero interval, disabling repeat",
                declaration.id
            );
        } else {
            button.set_repeating(declaration.repeating);
            button.set_repeat_time_ms(declaration.repeat_ms);
        }
        self.button_lookup
            .insert(declaration.id.clone(), self.buttons.len());
        self.buttons.push(button);
        true
    }

    /// Register a declared axis. Both referenced buttons must already be
    /// registered; a missing side is reported and the axis skipped.
    pub fn register_bind_axis(&mut self, declaration: &AxisDeclaration) -> bool {
        if self.axis_lookup.contains_key(&declaration.id) {
            warn!("duplicate axis bind \"{}\", skipping", declaration.id);
            return false;
        }
        let positive = match self.button_lookup.get(&declaration.positive) {
            Some(&i) => i,
            None => {
                warn!(
                    "failed to register axis \"{}\", missing positive button \"{}\"",
                    declaration.id, declaration.positive
                );
                return false;
            }
        };
        let negative = match self.button_lookup.get(&declaration.negative) {
            Some(&i) => i,
            None => {
                warn!(
                    "failed to register axis \"{}\", missing negative button \"{}\"",
                    declaration.id, declaration.negative
                );
                return false;
            }
        };
        let mut axis = BindAxis::new(declaration.id.clone(), positive, negative);
        axis.set_send_mode(declaration.send_mode);
        self.axis_lookup
            .insert(declaration.id.clone(), self.axes.len());
        self.axes.push(axis);
        true
    }

    /// Wire a physical input to a registered button through the link
    /// tables. An unregistered id is reported and ignored.
    pub fn link_bind_button_to_input(&mut self, input: Input, id: &BindId) {
        let index = match self.button_lookup.get(id) {
            Some(&i) => i,
            None => {
                warn!("cannot link {} to unregistered bind \"{}\"", input, id);
                return;
            }
        };
        match input.kind {
            InputKind::Key => {
                self.key_binds.insert(input.code, index);
            }
            InputKind::MouseButton => {
                self.mouse_button_binds.insert(input.code, index);
            }
            InputKind::MouseWheel => {
                if input.code > 0 {
                    self.wheel_up_bind = Some(index);
                } else {
                    self.wheel_down_bind = Some(index);
                }
            }
        }
    }

    /// Drop every registered button, axis and link.
    pub fn clear_binds(&mut self) {
        self.buttons.clear();
        self.button_lookup.clear();
        self.axes.clear();
        self.axis_lookup.clear();
        self.key_binds.clear();
        self.mouse_button_binds.clear();
        self.wheel_up_bind = None;
        self.wheel_down_bind = None;
    }

    /// Rebuild the bind tables from declarations and the user's binds
    /// config. Individual registration failures are reported and skipped;
    /// the rest proceed.
    pub fn apply_binds(&mut self, config: &BindsConfig, registry: &dyn BindRegistry) {
        self.clear_binds();
        for declaration in registry.button_declarations() {
            if self.register_bind_button(declaration) {
                for input in config.get_binds(&declaration.id) {
                    self.link_bind_button_to_input(*input, &declaration.id);
                }
                debug!("registered button bind: {}", declaration.id);
            }
        }
        for declaration in registry.axis_declarations() {
            if self.register_bind_axis(declaration) {
                debug!("registered axis bind: {}", declaration.id);
            }
        }
    }

    /// Process one frame of input. `delta` is the frame delta in seconds;
    /// `receivers` is the ordered receiver list for semantic events.
    pub fn update(&mut self, delta: f32, receivers: &mut [&mut dyn InputReceiver]) {
        self.process_mouse(delta, receivers);
        self.process_keyboard(delta, receivers);
        for button in &mut self.buttons {
            button.update(delta, receivers, self.target);
        }
        for i in 0..self.axes.len() {
            let positive_down = self.buttons[self.axes[i].positive_index()].state().is_down();
            let negative_down = self.buttons[self.axes[i].negative_index()].state().is_down();
            self.axes[i].update(positive_down, negative_down, delta, receivers, self.target);
        }
    }

    fn process_mouse(&mut self, delta: f32, receivers: &mut [&mut dyn InputReceiver]) {
        if !self.has_focus {
            // Without focus raw events are not dispatched, but releases
            // still reach the binds so no button stays stuck down.
            let _ = self.mouse.drain_motion();
            for action in self.mouse.drain_queue() {
                if action.state != ButtonState::Up {
                    continue;
                }
                if let Some(&index) = self.mouse_button_binds.get(&action.input.code) {
                    self.buttons[index]
                        .update_state(action.input, false, delta, receivers, self.target, false);
                }
            }
            return;
        }

        let motion = self.mouse.drain_motion();
        if motion[0] != 0 {
            let value = motion[0] as f32 * self.mouse_sensitivity;
            Self::dispatch(
                InputEventKind::MouseMove {
                    axis: MouseAxis::X,
                    value,
                },
                delta,
                self.target,
                receivers,
            );
        }
        if motion[1] != 0 {
            let value = motion[1] as f32 * self.mouse_sensitivity;
            Self::dispatch(
                InputEventKind::MouseMove {
                    axis: MouseAxis::Y,
                    value,
                },
                delta,
                self.target,
                receivers,
            );
        }

        for action in self.mouse.drain_queue() {
            match action.input.kind {
                InputKind::MouseButton => {
                    let down = action.state == ButtonState::Down;
                    let consumed = Self::dispatch(
                        InputEventKind::MouseButton {
                            input: action.input,
                            state: action.state,
                            position: action.position,
                        },
                        delta,
                        self.target,
                        receivers,
                    );
                    if let Some(&index) = self.mouse_button_binds.get(&action.input.code) {
                        self.buttons[index].update_state(
                            action.input,
                            down,
                            delta,
                            receivers,
                            self.target,
                            consumed,
                        );
                    }
                }
                InputKind::MouseWheel => {
                    if action.turns == 0 {
                        continue;
                    }
                    let consumed = Self::dispatch(
                        InputEventKind::MouseWheel {
                            position: action.position,
                            turns: action.turns,
                        },
                        delta,
                        self.target,
                        receivers,
                    );
                    let slot = if action.turns > 0 {
                        self.wheel_up_bind
                    } else {
                        self.wheel_down_bind
                    };
                    if let Some(index) = slot {
                        // Each recorded turn becomes a same-frame
                        // DOWN+UP pair on the bound button.
                        for _ in 0..action.turns.unsigned_abs() {
                            self.buttons[index].update_state(
                                action.input,
                                true,
                                delta,
                                receivers,
                                self.target,
                                consumed,
                            );
                            self.buttons[index].update_state(
                                action.input,
                                false,
                                delta,
                                receivers,
                                self.target,
                                consumed,
                            );
                        }
                    }
                }
                InputKind::Key => {}
            }
        }
    }

    fn process_keyboard(&mut self, delta: f32, receivers: &mut [&mut dyn InputReceiver]) {
        for action in self.keyboard.drain_queue() {
            if action.state == ButtonState::Repeat {
                // Device-reported repeats dispatch a semantic event only;
                // the buttons' own repeat timers are authoritative.
                if self.has_focus {
                    Self::dispatch(
                        InputEventKind::Key {
                            input: action.input,
                            state: action.state,
                            character: action.character,
                        },
                        delta,
                        self.target,
                        receivers,
                    );
                }
                continue;
            }
            let down = action.state == ButtonState::Down;
            if !self.has_focus && down {
                continue;
            }
            let consumed = if self.has_focus {
                Self::dispatch(
                    InputEventKind::Key {
                        input: action.input,
                        state: action.state,
                        character: action.character,
                    },
                    delta,
                    self.target,
                    receivers,
                )
            } else {
                false
            };
            if let Some(&index) = self.key_binds.get(&action.input.code) {
                self.buttons[index]
                    .update_state(action.input, down, delta, receivers, self.target, consumed);
            }
        }
    }

    fn dispatch(
        kind: InputEventKind,
        delta: f32,
        target: Option<TargetInfo>,
        receivers: &mut [&mut dyn InputReceiver],
    ) -> bool {
        let mut event = InputEvent::new(kind, delta).with_target(target);
        deliver(&mut event, receivers)
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
