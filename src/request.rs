use crate::base::address::{AddressError, BusAddress};
use crate::base::cmd_defs::MAX_CONTROL_COMMAND;
use crate::drivers::sunricher::{CommandTransport, TransportError};
use log::info;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub enum RequestError {
    MissingArgument,
    NotSingleByte,
    InvalidHex,
    ConfigurationCommand,
    InvalidAction(String),
    InvalidDirection(String),
    AddressError(AddressError),
    TransportError(TransportError),
}

impl RequestError {
    /// The gateway could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::TransportError(TransportError::NoPort))
    }

    /// The request itself was bad, nothing was sent
    pub fn is_validation(&self) -> bool {
        !matches!(self, RequestError::TransportError(_))
    }
}

impl Error for RequestError {}

impl From<AddressError> for RequestError {
    fn from(err: AddressError) -> RequestError {
        RequestError::AddressError(err)
    }
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> RequestError {
        RequestError::TransportError(err)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingArgument => write!(f, "command or value must be present"),
            RequestError::NotSingleByte => {
                write!(f, "value or command must be a single hex byte")
            }
            RequestError::InvalidHex => write!(f, "invalid value or command"),
            RequestError::ConfigurationCommand => {
                write!(f, "configuration commands are not allowed")
            }
            RequestError::InvalidAction(a) => write!(f, "invalid action '{}'", a),
            RequestError::InvalidDirection(d) => write!(f, "invalid direction '{}'", d),
            RequestError::AddressError(err) => write!(f, "{}", err),
            RequestError::TransportError(err) => write!(f, "{}", err),
        }
    }
}

fn parse_hex_byte(s: &str) -> Result<u8, RequestError> {
    if s.len() != 2 {
        return Err(RequestError::NotSingleByte);
    }
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RequestError::InvalidHex);
    }
    u8::from_str_radix(s, 16).map_err(|_| RequestError::InvalidHex)
}

/// A single frame sent directly, without involving any switch state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectCommand {
    pub address: u8,
    pub value: u8,
}

impl DirectCommand {
    /// `command` is sent on the command channel and is limited to control
    /// commands, `value` is a direct arc power level. If both are given
    /// `command` is used. Empty strings count as absent.
    pub fn parse(
        address: &str,
        command: Option<&str>,
        value: Option<&str>,
    ) -> Result<DirectCommand, RequestError> {
        let command = command.filter(|c| !c.is_empty());
        let value = value.filter(|v| !v.is_empty());
        let (arg, is_command) = match (command, value) {
            (Some(c), _) => (c, true),
            (None, Some(v)) => (v, false),
            (None, None) => return Err(RequestError::MissingArgument),
        };
        let byte = parse_hex_byte(arg)?;
        let address = BusAddress::from_str(address)?;
        if is_command {
            if byte > MAX_CONTROL_COMMAND {
                return Err(RequestError::ConfigurationCommand);
            }
            Ok(DirectCommand {
                address: address.command_channel(),
                value: byte,
            })
        } else {
            Ok(DirectCommand {
                address: address.level_channel(),
                value: byte,
            })
        }
    }

    pub async fn send(&self, transport: &CommandTransport) -> Result<(), RequestError> {
        transport.send(self.address, self.value).await?;
        info!(
            "DALI command {:02x} written to {:02x}",
            self.value, self.address
        );
        Ok(())
    }
}
