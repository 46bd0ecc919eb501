pub mod sunricher {
    pub mod frame;
    pub mod serial;
    pub mod transport;
    pub use frame::CommandFrame;
    pub use serial::{SerialAccess, SerialPorts};
    pub use transport::{CommandTransport, TransportError};
}
