use crate::request::RequestError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Hold,
    Release,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl FromStr for Action {
    type Err = RequestError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hold" => Ok(Action::Hold),
            "release" => Ok(Action::Release),
            _ => Err(RequestError::InvalidAction(s.to_string())),
        }
    }
}

impl FromStr for Direction {
    type Err = RequestError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(RequestError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hold => write!(f, "hold"),
            Action::Release => write!(f, "release"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Outcome of a switch event, reported back to the caller as text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwitchStatus {
    Reset,
    HoldRegistered,
    NothingWasActive,
    DimmingStarted,
    CommandSent,
}

impl fmt::Display for SwitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchStatus::Reset => write!(f, "reset"),
            SwitchStatus::HoldRegistered => write!(f, "hold registered"),
            SwitchStatus::NothingWasActive => write!(f, "nothing was active"),
            SwitchStatus::DimmingStarted => write!(f, "dimming has already started"),
            SwitchStatus::CommandSent => write!(f, "switch command sent"),
        }
    }
}
