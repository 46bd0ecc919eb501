use super::frame::CommandFrame;
use super::transport::TransportError;
use crate::error::DynFuture;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio_serial::SerialStream;

pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Access to the serial ports the gateway may be connected to.
pub trait SerialAccess: Send + Sync {
    /// Names of the ports currently present, in no particular order
    fn port_names(&self) -> Result<Vec<String>, TransportError>;

    /// Open `port`, write the frame and close the port again
    fn write_frame<'a>(
        &'a self,
        port: &'a str,
        frame: CommandFrame,
    ) -> DynFuture<'a, Result<(), TransportError>>;
}

pub struct SerialPorts {
    baud_rate: u32,
}

impl SerialPorts {
    pub fn new(baud_rate: u32) -> SerialPorts {
        SerialPorts { baud_rate }
    }
}

impl Default for SerialPorts {
    fn default() -> Self {
        SerialPorts::new(DEFAULT_BAUD_RATE)
    }
}

impl SerialAccess for SerialPorts {
    fn port_names(&self) -> Result<Vec<String>, TransportError> {
        let ports = tokio_serial::available_ports()?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    fn write_frame<'a>(
        &'a self,
        port: &'a str,
        frame: CommandFrame,
    ) -> DynFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            debug!("Connecting to port {}", port);
            let mut serial = SerialStream::open(&tokio_serial::new(port, self.baud_rate))?;
            serial.write_all(frame.as_bytes()).await?;
            serial.flush().await?;
            Ok(())
        })
    }
}
