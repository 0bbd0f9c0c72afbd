//! # Countdown Core Library
//!
//! This library provides the core logic for the Countdown timer. The CLI
//! binary is a thin terminal shell over the same library: it renders engine
//! state and forwards key presses as commands.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: A four-command state machine driven by a one-second
//!   tick. The owner forwards tick firings to `tick()`.
//! - **Tick Sources**: Injectable periodic sources (tokio interval, or a manual
//!   source for tests)
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Core timer state machine
//! - [`DurationSelection`]: Validated hours/minutes/seconds picker values
//! - [`Config`]: Application configuration management
//! - [`Event`]: Everything the engine reports to its observers

pub mod timer;
pub mod storage;
pub mod events;
pub mod format;
pub mod error;

pub use timer::{CountdownEngine, DurationSelection, TimerCommand, TimerState};
pub use storage::Config;
pub use events::Event;
pub use format::{as_time_string, completion_time_string};
pub use error::{CoreError, ConfigError, ValidationError};
