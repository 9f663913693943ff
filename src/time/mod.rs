//! Game clock: capped frame deltas, cycle subdivision, pause, and
//! gradual server resync.

pub mod clock;
pub mod source;

pub use clock::{ClockStats, GameClock, TimeStepper};
pub use source::{MockTimeSource, SystemTimeSource, TimeSource};
