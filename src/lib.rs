//! # Tello teleoperation
//!
//! A small control layer for Tello-class drones. [`TeleopController`] wraps
//! any [`FlightBackend`] with a validated step and speed, and
//! [`InputDispatcher`] drives the controller from key presses on a
//! background task.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tello_teleop::{DryRunBackend, InputDispatcher, TeleopController, TeleopOptions, TerminalKeys};
//!
//! # async fn fly() -> tello_teleop::Result<()> {
//! let controller = Arc::new(TeleopController::new(Arc::new(DryRunBackend::new())));
//! let (_keys, listener) = TerminalKeys::spawn()?;
//!
//! let mut dispatcher = InputDispatcher::new(controller, listener, TeleopOptions::default());
//! dispatcher.run().await?;
//! # Ok(())
//! # }
//! ```

mod action;
mod backend;
mod command;
mod controller;
mod dispatcher;
mod dry_run;
mod errors;
mod keys;
mod options;

pub use action::{Action, ActionCompleter, ActionState};
pub use backend::FlightBackend;
pub use command::{Direction, FlightCommand, FlipDirection};
pub use controller::{
    TeleopController, DEFAULT_SPEED, DEFAULT_STEP, MAX_SPEED, MAX_STEP, MIN_SPEED, MIN_STEP,
};
pub use dispatcher::{handle_key, InputDispatcher, KeyOutcome};
pub use dry_run::DryRunBackend;
pub use errors::{Result, TeleopError};
pub use keys::{make_key_channel, Key, KeyReceiver, KeySender, TerminalKeys};
pub use options::TeleopOptions;
