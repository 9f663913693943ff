use std::collections::HashSet;

use crate::input::events::{InputEvent, InputEventKind, InputReceiver, TargetInfo, deliver};
use crate::input::types::{ActivateMode, BindId, ButtonState, Input};

/// Identifies a registered subscriber so it can be removed later.
/// Handles are unique per owning button or axis, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberHandle(u64);

impl SubscriberHandle {
    pub(crate) fn next(counter: &mut u64) -> Self {
        let handle = Self(*counter);
        *counter += 1;
        handle
    }
}

/// Direct subscriber to a bind button's transitions. Returning `true`
/// consumes the transition before it reaches the receiver list.
pub trait BindButtonSubscriber {
    fn on_press(&mut self, delta: f32, target: Option<&TargetInfo>) -> bool {
        let _ = (delta, target);
        false
    }

    fn on_release(&mut self, delta: f32, target: Option<&TargetInfo>) -> bool {
        let _ = (delta, target);
        false
    }

    fn on_repeat(&mut self, delta: f32, target: Option<&TargetInfo>) -> bool {
        let _ = (delta, target);
        false
    }
}

/// A digital, rebindable named control.
///
/// The button is Down while at least one of its linked physical inputs is
/// held. While Down with repeating enabled it emits Repeat events every
/// `repeat_ms`, carrying leftover elapsed time across frames so repeats
/// are neither lost nor duplicated under uneven frame deltas.
pub struct BindButton {
    id: BindId,
    display_name: String,
    mode: ActivateMode,
    repeating: bool,
    repeat_ms: u32,
    active_inputs: HashSet<Input>,
    state: ButtonState,
    repeat_accum_ms: f32,
    subscribers: Vec<(SubscriberHandle, Box<dyn BindButtonSubscriber>)>,
    next_subscriber: u64,
}

impl BindButton {
    pub fn new(id: BindId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            mode: ActivateMode::Both,
            repeating: false,
            repeat_ms: 200,
            active_inputs: HashSet::new(),
            state: ButtonState::Up,
            repeat_accum_ms: 0.0,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn id(&self) -> &BindId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mode(&self) -> ActivateMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ActivateMode) {
        self.mode = mode;
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    pub fn set_repeating(&mut self, repeating: bool) {
        self.repeating = repeating;
    }

    pub fn repeat_time_ms(&self) -> u32 {
        self.repeat_ms
    }

    pub fn set_repeat_time_ms(&mut self, repeat_ms: u32) {
        self.repeat_ms = repeat_ms;
    }

    /// Current stored state; always Up or Down.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn BindButtonSubscriber>) -> SubscriberHandle {
        let handle = SubscriberHandle::next(&mut self.next_subscriber);
        self.subscribers.push((handle, subscriber));
        handle
    }

    /// Remove a previously registered subscriber. Returns whether the
    /// handle was still registered.
    pub fn unsubscribe(&mut self, handle: SubscriberHandle) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(h, _)| *h != handle);
        self.subscribers.len() != before
    }

    /// Apply a physical transition of one linked input.
    ///
    /// `raw_consumed` is the consumption result of the raw device event;
    /// a consumed raw event suppresses the bind's own emission for this
    /// transition. Duplicate downs and releases of inputs that are not
    /// held are no-ops.
    pub fn update_state(
        &mut self,
        input: Input,
        down: bool,
        delta: f32,
        receivers: &mut [&mut dyn InputReceiver],
        target: Option<TargetInfo>,
        raw_consumed: bool,
    ) {
        if down {
            let was_empty = self.active_inputs.is_empty();
            self.active_inputs.insert(input);
            if was_empty {
                self.state = ButtonState::Down;
                self.repeat_accum_ms = 0.0;
                if self.mode.activated_on_press() {
                    self.trigger(ButtonState::Down, delta, receivers, target, raw_consumed);
                }
            }
        } else {
            self.active_inputs.remove(&input);
            if self.state == ButtonState::Down && self.active_inputs.is_empty() {
                self.state = ButtonState::Up;
                if self.mode.activated_on_release() {
                    self.trigger(ButtonState::Up, delta, receivers, target, raw_consumed);
                }
            }
        }
    }

    /// Advance the repeat timer by one frame delta (seconds), emitting as
    /// many Repeat events as full intervals elapsed.
    pub fn update(
        &mut self,
        delta: f32,
        receivers: &mut [&mut dyn InputReceiver],
        target: Option<TargetInfo>,
    ) {
        if !self.repeating
            || self.repeat_ms == 0
            || self.state != ButtonState::Down
            || !self.mode.activated_on_press()
        {
            return;
        }
        self.repeat_accum_ms += delta * 1000.0;
        let interval = self.repeat_ms as f32;
        while self.repeat_accum_ms >= interval {
            self.repeat_accum_ms -= interval;
            self.trigger(ButtonState::Repeat, delta, receivers, target, false);
        }
    }

    fn trigger(
        &mut self,
        state: ButtonState,
        delta: f32,
        receivers: &mut [&mut dyn InputReceiver],
        target: Option<TargetInfo>,
        raw_consumed: bool,
    ) {
        if raw_consumed {
            return;
        }
        let mut consumed = false;
        for (_, subscriber) in &mut self.subscribers {
            consumed = match state {
                ButtonState::Down => subscriber.on_press(delta, target.as_ref()),
                ButtonState::Up => subscriber.on_release(delta, target.as_ref()),
                ButtonState::Repeat => subscriber.on_repeat(delta, target.as_ref()),
            };
            if consumed {
                break;
            }
        }
        if consumed {
            return;
        }
        let mut event = InputEvent::new(
            InputEventKind::BindButton {
                id: self.id.clone(),
                state,
            },
            delta,
        )
        .with_target(target);
        deliver(&mut event, receivers);
    }
}
