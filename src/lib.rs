//! Input binding and game timing for a modular game engine.
//!
//! Raw device actions are translated into semantic bind events through
//! user-editable [`config::BindsConfig`] mappings, driven each frame by
//! [`input::InputDispatcher`]. The frame loop itself is paced by
//! [`time::GameClock`], which caps runaway deltas, subdivides long
//! frames into bounded update cycles, and resynchronizes game time with
//! a server gradually instead of jumping.

pub mod config;
pub mod input;
pub mod time;
pub mod util;
