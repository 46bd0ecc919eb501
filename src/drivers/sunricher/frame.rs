const PREAMBLE: [u8; 2] = [0xa7, 0x7a];
const HEADER: [u8; 4] = [0x01, 0x02, 0x00, 0x03];
const WILDCARD: u8 = 0xff;
const TRAILER: [u8; 2] = [0x0d, 0x13];

pub const FRAME_LEN: usize = 13;

/// One command frame for the Sunricher DALI gateway.
///
/// Only the address and the command (or level) vary, everything else is
/// fixed by the gateway protocol.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CommandFrame([u8; FRAME_LEN]);

impl CommandFrame {
    pub fn new(address: u8, value: u8) -> CommandFrame {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0..2].copy_from_slice(&PREAMBLE);
        bytes[2..6].copy_from_slice(&HEADER);
        bytes[6] = WILDCARD;
        bytes[7] = address;
        bytes[8] = value;
        // bytes 9 and 10 reserved
        bytes[11..13].copy_from_slice(&TRAILER);
        CommandFrame(bytes)
    }

    pub fn address(&self) -> u8 {
        self.0[7]
    }

    pub fn value(&self) -> u8 {
        self.0[8]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl std::fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
