// Commands sent on the command channel (base address + 1)
pub const OFF: u8 = 0x00;
pub const UP: u8 = 0x01;
pub const DOWN: u8 = 0x02;
pub const GO_TO_LAST_ACTIVE_LEVEL: u8 = 0x0a;

/// Commands above this are configuration commands
pub const MAX_CONTROL_COMMAND: u8 = 0x1f;

// Direct arc power level
pub const LEVEL_OFF: u8 = 0x00;
