use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TeleopError};

/// Direction of a straight-line flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TeleopError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "forward" => Ok(Direction::Forward),
            "back" => Ok(Direction::Back),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(TeleopError::ParseError { msg: format!("unknown direction \"{s}\"") }),
        }
    }
}

/// Direction of a flip, written `l`, `r`, `f` or `b` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    Left,
    Right,
    Forward,
    Back,
}

impl FlipDirection {
    pub fn as_char(&self) -> char {
        match self {
            FlipDirection::Left => 'l',
            FlipDirection::Right => 'r',
            FlipDirection::Forward => 'f',
            FlipDirection::Back => 'b',
        }
    }
}

impl FromStr for FlipDirection {
    type Err = TeleopError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "l" => Ok(FlipDirection::Left),
            "r" => Ok(FlipDirection::Right),
            "f" => Ok(FlipDirection::Forward),
            "b" => Ok(FlipDirection::Back),
            _ => Err(TeleopError::ParseError { msg: format!("unknown flip direction \"{s}\"") }),
        }
    }
}

/// A single call made on a flight backend, in value form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightCommand {
    TakeOff,
    Land,
    MotorOn,
    MotorOff,
    Fly { direction: Direction, distance: u32 },
    Rotate { angle: i32 },
    Flip { direction: FlipDirection },
    Speed(u32),
    Sticks { roll: i8, pitch: i8, throttle: i8, yaw: i8 },
    Stop,
}

/// Renders the command the way the drone's text SDK spells it.
impl fmt::Display for FlightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightCommand::TakeOff => write!(f, "takeoff"),
            FlightCommand::Land => write!(f, "land"),
            FlightCommand::MotorOn => write!(f, "motoron"),
            FlightCommand::MotorOff => write!(f, "motoroff"),
            FlightCommand::Fly { direction, distance } => write!(f, "{direction} {distance}"),
            FlightCommand::Rotate { angle } if *angle < 0 => write!(f, "ccw {}", -angle),
            FlightCommand::Rotate { angle } => write!(f, "cw {angle}"),
            FlightCommand::Flip { direction } => write!(f, "flip {}", direction.as_char()),
            FlightCommand::Speed(speed) => write!(f, "speed {speed}"),
            FlightCommand::Sticks { roll, pitch, throttle, yaw } => {
                write!(f, "rc {roll} {pitch} {throttle} {yaw}")
            }
            FlightCommand::Stop => write!(f, "stop"),
        }
    }
}
