use crate::action::Action;
use crate::command::{Direction, FlipDirection};

/// The drone's command interface.
///
/// Movement commands hand back an [`Action`] straight away; the drone carries
/// them out in its own time. `retry` asks the backend to resend the command if
/// the drone does not acknowledge it.
pub trait FlightBackend: Send + Sync + 'static {
    fn takeoff(&self, retry: bool) -> Action;

    fn land(&self, retry: bool) -> Action;

    /// Only works while the drone is level.
    fn motor_on(&self) -> Action;

    fn motor_off(&self) -> Action;

    /// `distance` in cm, the drone accepts [20, 500].
    fn fly(&self, direction: Direction, distance: u32, retry: bool) -> Action;

    /// `angle` in degrees, [-360, 360], clockwise seen from above is positive.
    fn rotate(&self, angle: i32, retry: bool) -> Action;

    /// Rejected by the drone when the battery is at 50% or lower.
    fn flip(&self, direction: FlipDirection, retry: bool) -> Action;

    /// `speed` in cm/s. Returns whether the drone accepted it.
    fn set_speed(&self, speed: u32) -> bool;

    /// Raw stick positions, each in [-100, 100].
    fn set_sticks(&self, roll: i8, pitch: i8, throttle: i8, yaw: i8);

    /// Stop and hover.
    fn stop(&self, retry: bool) -> bool;
}
