use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::time::Duration;

use crate::action::{Action, ActionState};
use crate::backend::FlightBackend;
use crate::command::{Direction, FlightCommand, FlipDirection};

pub const MIN_STEP: u32 = 20;
pub const MAX_STEP: u32 = 500;
pub const DEFAULT_STEP: u32 = 100;

pub const MIN_SPEED: u32 = 10;
pub const MAX_SPEED: u32 = 100;
pub const DEFAULT_SPEED: u32 = 10;

/// Movement controller sitting in front of a [`FlightBackend`].
///
/// Keeps the current step (default distance of a `fly`, in cm) and speed
/// (cm/s). Both are always inside their valid range: out-of-range updates are
/// ignored rather than reported.
///
/// Every movement takes an optional `timeout`. With `None` (or zero) the
/// command is fire-and-forget; otherwise the call waits for the drone to
/// finish, at most that long. Running out of time is not an error, the
/// drone may still be busy afterwards. All methods return the action state
/// seen when the call returns.
///
/// The controller can be shared (e.g. keyboard session plus a script), but
/// it does no locking: read-then-update sequences such as "step + 20" from
/// two callers race, and the last write wins.
#[derive(Debug)]
pub struct TeleopController<B> {
    backend: Arc<B>,
    step: AtomicU32,
    speed: AtomicU32,
}

/// How long to wait for an action; `None` when the call is fire-and-forget.
fn wait_limit(timeout: Option<Duration>) -> Option<Duration> {
    timeout.filter(|limit| !limit.is_zero())
}

impl<B: FlightBackend> TeleopController<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_speed(backend, DEFAULT_SPEED)
    }

    pub fn with_speed(backend: Arc<B>, speed: u32) -> Self {
        Self {
            backend,
            step: AtomicU32::new(DEFAULT_STEP),
            speed: AtomicU32::new(speed.clamp(MIN_SPEED, MAX_SPEED)),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn step(&self) -> u32 {
        self.step.load(Ordering::Relaxed)
    }

    /// Last speed sent to the drone, not necessarily one it accepted.
    pub fn speed(&self) -> u32 {
        self.speed.load(Ordering::Relaxed)
    }

    async fn settle(
        &self,
        command: FlightCommand,
        mut action: Action,
        timeout: Option<Duration>,
    ) -> ActionState {
        let limit = wait_limit(timeout);
        let state = match limit {
            Some(limit) => action.wait_for_completed(limit).await,
            None => action.state(),
        };
        match state {
            ActionState::Failed => log::warn!("[Teleop] {command} failed"),
            ActionState::Started if limit.is_some() => {
                log::debug!("[Teleop] {command} still running after wait")
            }
            _ => {}
        }
        state
    }

    /// Takes off to about 40cm.
    pub async fn takeoff(&self, retry: bool, timeout: Option<Duration>) -> ActionState {
        let action = self.backend.takeoff(retry);
        self.settle(FlightCommand::TakeOff, action, timeout).await
    }

    pub async fn land(&self, retry: bool, timeout: Option<Duration>) -> ActionState {
        let action = self.backend.land(retry);
        self.settle(FlightCommand::Land, action, timeout).await
    }

    /// Spins the motors up. The drone refuses unless it is level.
    pub async fn motor_on(&self, timeout: Option<Duration>) -> ActionState {
        let action = self.backend.motor_on();
        self.settle(FlightCommand::MotorOn, action, timeout).await
    }

    pub async fn motor_off(&self, timeout: Option<Duration>) -> ActionState {
        let action = self.backend.motor_off();
        self.settle(FlightCommand::MotorOff, action, timeout).await
    }

    /// Flies `distance` cm in `direction`; a missing or zero distance means
    /// the current step, read once at call time.
    ///
    /// The distance is passed through unchecked, keeping it within [20, 500]
    /// is up to the caller. Without a direction nothing is sent and `None`
    /// is returned.
    pub async fn fly(
        &self,
        direction: Option<Direction>,
        distance: Option<u32>,
        retry: bool,
        timeout: Option<Duration>,
    ) -> Option<ActionState> {
        let distance = match distance {
            Some(d) if d != 0 => d,
            _ => self.step(),
        };
        let direction = direction?;

        let action = self.backend.fly(direction, distance, retry);
        Some(
            self.settle(FlightCommand::Fly { direction, distance }, action, timeout)
                .await,
        )
    }

    /// Rotates by `angle` degrees in [-360, 360], clockwise seen from above
    /// is positive.
    pub async fn rotate(&self, angle: i32, retry: bool, timeout: Option<Duration>) -> ActionState {
        let action = self.backend.rotate(angle, retry);
        self.settle(FlightCommand::Rotate { angle }, action, timeout).await
    }

    /// Flips the drone. Needs more than 50% battery, which only the drone
    /// checks; a refused flip comes back as [`ActionState::Failed`].
    pub async fn flip(
        &self,
        direction: Option<FlipDirection>,
        retry: bool,
        timeout: Option<Duration>,
    ) -> Option<ActionState> {
        let direction = direction?;
        let action = self.backend.flip(direction, retry);
        Some(self.settle(FlightCommand::Flip { direction }, action, timeout).await)
    }

    /// Stops and hovers, returning the drone's answer as is.
    pub fn stop(&self, retry: bool) -> bool {
        self.backend.stop(retry)
    }

    /// Sets the flight speed, or just reads it.
    ///
    /// `None` or a value outside [10, 100] changes nothing and sends nothing.
    /// A valid value is stored and sent; if the drone rejects it that is
    /// logged and the stored value is kept anyway. Returns the stored speed.
    pub fn set_speed(&self, speed: Option<u32>) -> u32 {
        let Some(speed) = speed.filter(|s| (MIN_SPEED..=MAX_SPEED).contains(s)) else {
            return self.speed();
        };

        self.speed.store(speed, Ordering::Relaxed);
        if !self.backend.set_speed(speed) {
            log::warn!("[Teleop] failed to set speed {speed}");
        }
        self.speed()
    }

    /// Raw stick input, each axis in [-100, 100]. Sent as is.
    pub fn set_sticks(&self, roll: i8, pitch: i8, throttle: i8, yaw: i8) {
        self.backend.set_sticks(roll, pitch, throttle, yaw);
    }

    /// Sets the default flight distance; values outside [20, 500] are ignored.
    pub fn set_step(&self, step: u32) {
        if (MIN_STEP..=MAX_STEP).contains(&step) {
            self.step.store(step, Ordering::Relaxed);
        }
    }
}
