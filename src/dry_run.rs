use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::time::{sleep, Duration};

use crate::action::Action;
use crate::backend::FlightBackend;
use crate::command::{Direction, FlipDirection, FlightCommand};

const MIN_FLIP_BATTERY: u8 = 50;

/// A backend with no drone behind it.
///
/// Every command is logged in text-SDK form and kept in a history. Actions
/// complete after `action_delay`, so blocking waits behave roughly as they
/// would in the air.
#[derive(Debug)]
pub struct DryRunBackend {
    history: Mutex<Vec<FlightCommand>>,
    battery: AtomicU8,
    speed_accepted: AtomicBool,
    action_delay: Duration,
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            battery: AtomicU8::new(100),
            speed_accepted: AtomicBool::new(true),
            action_delay: Duration::ZERO,
        }
    }

    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    pub fn with_battery(self, percent: u8) -> Self {
        self.set_battery(percent);
        self
    }

    pub fn set_battery(&self, percent: u8) {
        self.battery.store(percent.min(100), Ordering::Relaxed);
    }

    pub fn battery(&self) -> u8 {
        self.battery.load(Ordering::Relaxed)
    }

    /// Makes `set_speed` report failure, like a drone that did not answer.
    pub fn set_speed_accepted(&self, accepted: bool) {
        self.speed_accepted.store(accepted, Ordering::Relaxed);
    }

    /// Commands received so far, oldest first.
    pub fn history(&self) -> Vec<FlightCommand> {
        self.lock_history().clone()
    }

    pub fn take_history(&self) -> Vec<FlightCommand> {
        std::mem::take(&mut *self.lock_history())
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<FlightCommand>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, command: FlightCommand) {
        log::info!("[DryRun] SEND {command}");
        self.lock_history().push(command);
    }

    fn run(&self, command: FlightCommand) -> Action {
        self.record(command);

        let handle = match Handle::try_current() {
            Ok(handle) if !self.action_delay.is_zero() => handle,
            _ => return Action::succeeded(),
        };

        let (action, completer) = Action::pending();
        let delay = self.action_delay;
        handle.spawn(async move {
            sleep(delay).await;
            completer.succeed();
        });
        action
    }
}

impl FlightBackend for DryRunBackend {
    fn takeoff(&self, _retry: bool) -> Action {
        self.run(FlightCommand::TakeOff)
    }

    fn land(&self, _retry: bool) -> Action {
        self.run(FlightCommand::Land)
    }

    fn motor_on(&self) -> Action {
        self.run(FlightCommand::MotorOn)
    }

    fn motor_off(&self) -> Action {
        self.run(FlightCommand::MotorOff)
    }

    fn fly(&self, direction: Direction, distance: u32, _retry: bool) -> Action {
        self.run(FlightCommand::Fly { direction, distance })
    }

    fn rotate(&self, angle: i32, _retry: bool) -> Action {
        self.run(FlightCommand::Rotate { angle })
    }

    fn flip(&self, direction: FlipDirection, _retry: bool) -> Action {
        let battery = self.battery();
        if battery <= MIN_FLIP_BATTERY {
            self.record(FlightCommand::Flip { direction });
            log::warn!("[DryRun] flip refused, battery at {battery}%");
            return Action::failed();
        }
        self.run(FlightCommand::Flip { direction })
    }

    fn set_speed(&self, speed: u32) -> bool {
        self.record(FlightCommand::Speed(speed));
        self.speed_accepted.load(Ordering::Relaxed)
    }

    fn set_sticks(&self, roll: i8, pitch: i8, throttle: i8, yaw: i8) {
        self.record(FlightCommand::Sticks { roll, pitch, throttle, yaw });
    }

    fn stop(&self, _retry: bool) -> bool {
        self.record(FlightCommand::Stop);
        true
    }
}
