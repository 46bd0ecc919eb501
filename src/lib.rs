pub mod base {
    pub mod address;
    pub mod cmd_defs;
}

pub mod drivers;
pub mod error;
pub mod request;

pub mod switch {
    pub mod event;
    pub mod machine;
    mod ramp;
    pub mod registry;
    pub mod timing;
    #[cfg(test)]
    mod test;

    pub use event::{Action, Direction, SwitchStatus};
    pub use machine::SwitchController;
    pub use registry::ChannelState;
    pub use timing::Timing;
}

#[cfg(feature = "httpd")]
pub mod httpd {
    pub mod api;
    pub mod web_server;
    pub use api::DaliApi;
    pub use web_server::{setup_server, ServerConfig};
}
