//! Rebindable input handling.
//!
//! This module provides:
//! - [`InputDispatcher`]: Per-frame orchestration of device queues, bind
//!   buttons and bind axes
//! - [`BindButton`] / [`BindAxis`]: Digital and simulated-analog controls
//! - [`BindRegistry`]: Declaration discovery supplied by the module layer
//! - [`MouseDevice`] / [`KeyboardDevice`]: Raw device queue contracts

mod bind_axis;
mod bind_button;
mod device;
mod dispatcher;
mod events;
mod registry;
mod types;

pub use bind_axis::{BindAxis, BindAxisSubscriber, SendEventMode};
pub use bind_button::{BindButton, BindButtonSubscriber, SubscriberHandle};
pub use device::{
    InputAction, KeyboardDevice, MouseDevice, NullKeyboardDevice, NullMouseDevice,
    QueuedKeyboardDevice, QueuedMouseDevice,
};
pub use dispatcher::InputDispatcher;
pub use events::{InputEvent, InputEventKind, InputReceiver, MouseAxis, TargetInfo, deliver};
pub use registry::{AxisDeclaration, BindRegistry, ButtonDeclaration, StaticBindRegistry};
pub use types::{ActivateMode, BindId, ButtonState, Input, InputKind, keys, mouse};
