use core::ops::RangeInclusive;
use core::str::FromStr;
use log::warn;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AddressError {
    InvalidShort,
    InvalidGroup,
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        match self {
            AddressError::InvalidShort => write!(fmt, "Invalid address"),
            AddressError::InvalidGroup => write!(fmt, "Invalid group address"),
        }
    }
}

impl std::error::Error for AddressError {}

/// Address byte as sent to the gateway.
///
/// Short addresses are `n << 1`, groups `(g << 1) | 0x80` and broadcast
/// `0xfe`. The odd successor of each base address selects command
/// interpretation instead of direct arc power level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusAddress(u8);

impl BusAddress {
    const SHORT_RANGE: RangeInclusive<u8> = 0..=63;
    const GROUP_RANGE: RangeInclusive<u8> = 0..=15;
    pub const BROADCAST: BusAddress = BusAddress(0xfe);

    pub fn short(a: u8) -> Result<BusAddress, AddressError> {
        if Self::SHORT_RANGE.contains(&a) {
            Ok(BusAddress(a << 1))
        } else {
            Err(AddressError::InvalidShort)
        }
    }

    pub fn group(g: u8) -> Result<BusAddress, AddressError> {
        if Self::GROUP_RANGE.contains(&g) {
            Ok(BusAddress((g << 1) | 0x80))
        } else {
            Err(AddressError::InvalidGroup)
        }
    }

    /// Address used for direct arc power levels
    pub fn level_channel(&self) -> u8 {
        self.0
    }

    /// Address used for commands
    pub fn command_channel(&self) -> u8 {
        self.0.wrapping_add(1)
    }
}

impl From<BusAddress> for u8 {
    fn from(a: BusAddress) -> u8 {
        a.0
    }
}

impl std::fmt::Display for BusAddress {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        match self.0 {
            0xfe => write!(fmt, "all"),
            a if a & 0x80 != 0 => write!(fmt, "g{}", (a & 0x7f) >> 1),
            a => write!(fmt, "a{}", a >> 1),
        }
    }
}

/// Parses "all", "a<0-63>" or "g<0-15>".
///
/// Anything without a known prefix is treated as broadcast.
impl FromStr for BusAddress {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "all" {
            Ok(BusAddress::BROADCAST)
        } else if let Some(a) = s.strip_prefix('a') {
            u8::from_str(a).map_or(Err(AddressError::InvalidShort), BusAddress::short)
        } else if let Some(g) = s.strip_prefix('g') {
            u8::from_str(g).map_or(Err(AddressError::InvalidGroup), BusAddress::group)
        } else {
            // TODO: reject unknown prefixes instead of falling back to broadcast
            warn!("Unrecognized address '{}', using broadcast", s);
            Ok(BusAddress::BROADCAST)
        }
    }
}
