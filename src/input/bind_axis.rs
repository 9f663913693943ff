use crate::input::bind_button::SubscriberHandle;
use crate::input::events::{InputEvent, InputEventKind, InputReceiver, TargetInfo, deliver};

/// Policy deciding whether an axis emits an event this update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendEventMode {
    Always,
    #[default]
    WhenNonZero,
    WhenChanged,
}

impl SendEventMode {
    pub fn should_send(self, old_value: f32, new_value: f32) -> bool {
        match self {
            SendEventMode::Always => true,
            SendEventMode::WhenNonZero => new_value != 0.0,
            SendEventMode::WhenChanged => old_value != new_value,
        }
    }
}

/// Subscriber notified on every axis emission.
pub trait BindAxisSubscriber {
    fn on_axis(&mut self, value: f32, delta: f32, target: Option<&TargetInfo>);
}

/// A simulated analog axis in [-1, 1], derived each update from a
/// positive and a negative bind button. The value is never set directly.
pub struct BindAxis {
    id: String,
    positive: usize,
    negative: usize,
    value: f32,
    send_mode: SendEventMode,
    subscribers: Vec<(SubscriberHandle, Box<dyn BindAxisSubscriber>)>,
    next_subscriber: u64,
}

impl BindAxis {
    /// `positive` and `negative` are the registration indices of the
    /// linked buttons in the owning dispatcher.
    pub fn new(id: impl Into<String>, positive: usize, negative: usize) -> Self {
        Self {
            id: id.into(),
            positive,
            negative,
            value: 0.0,
            send_mode: SendEventMode::default(),
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn send_mode(&self) -> SendEventMode {
        self.send_mode
    }

    pub fn set_send_mode(&mut self, mode: SendEventMode) {
        self.send_mode = mode;
    }

    pub(crate) fn positive_index(&self) -> usize {
        self.positive
    }

    pub(crate) fn negative_index(&self) -> usize {
        self.negative
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn BindAxisSubscriber>) -> SubscriberHandle {
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

    /// Recompute the value from the two buttons' digital state and emit
    /// according to the send mode. The value updates unconditionally.
    pub fn update(
        &mut self,
        positive_down: bool,
        negative_down: bool,
        delta: f32,
        receivers: &mut [&mut dyn InputReceiver],
        target: Option<TargetInfo>,
    ) {
        let mut new_value = 0.0;
        if positive_down {
            new_value += 1.0;
        }
        if negative_down {
            new_value -= 1.0;
        }

        if self.send_mode.should_send(self.value, new_value) {
            let mut event = InputEvent::new(
                InputEventKind::BindAxis {
                    id: self.id.clone(),
                    value: new_value,
                },
                delta,
            )
            .with_target(target);
            deliver(&mut event, receivers);
            for (_, subscriber) in &mut self.subscribers {
                subscriber.on_axis(new_value, delta, target.as_ref());
            }
        }
        self.value = new_value;
    }
}
