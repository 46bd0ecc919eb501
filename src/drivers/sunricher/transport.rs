use super::frame::CommandFrame;
use super::serial::SerialAccess;
use log::debug;
use std::error::Error;
use std::fmt;
use tokio::sync::Mutex;
use tokio::time::Duration;

/// Minimum time between two frames written to the gateway
pub const DEFAULT_SPACING: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub enum TransportError {
    NoPort,
    SerialError(tokio_serial::Error),
    IoError(std::io::Error),
}

impl Error for TransportError {}

impl From<tokio_serial::Error> for TransportError {
    fn from(err: tokio_serial::Error) -> TransportError {
        TransportError::SerialError(err)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> TransportError {
        TransportError::IoError(err)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NoPort => write!(f, "No serial ports found."),
            TransportError::SerialError(err) => write!(f, "{}", err),
            TransportError::IoError(err) => write!(f, "{}", err),
        }
    }
}

/// Writes frames to the gateway, one at a time.
///
/// The port is looked up again for every frame so that the gateway may be
/// replugged while running. The lock is held through the spacing delay so
/// that consecutive frames are always at least `spacing` apart.
pub struct CommandTransport {
    access: Box<dyn SerialAccess>,
    lock: Mutex<()>,
    spacing: Duration,
}

impl CommandTransport {
    pub fn new(access: Box<dyn SerialAccess>) -> CommandTransport {
        CommandTransport::with_spacing(access, DEFAULT_SPACING)
    }

    pub fn with_spacing(access: Box<dyn SerialAccess>, spacing: Duration) -> CommandTransport {
        CommandTransport {
            access,
            lock: Mutex::new(()),
            spacing,
        }
    }

    /// Selects the last port in sorted order
    fn select_port(&self) -> Result<String, TransportError> {
        let mut names = self.access.port_names()?;
        names.sort();
        names.pop().ok_or(TransportError::NoPort)
    }

    pub async fn send(&self, address: u8, value: u8) -> Result<(), TransportError> {
        let _guard = self.lock.lock().await;
        let port = self.select_port()?;
        let frame = CommandFrame::new(address, value);
        self.access.write_frame(&port, frame).await?;
        debug!("Wrote {} to {}", frame, port);
        tokio::time::sleep(self.spacing).await;
        Ok(())
    }
}
