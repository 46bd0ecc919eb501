use clap::{Parser, Subcommand};
use dali::drivers::sunricher::serial::DEFAULT_BAUD_RATE;
use dali::drivers::sunricher::{CommandTransport, SerialPorts};
use dali::httpd::{self, DaliApi, ServerConfig};
use dali::request::DirectCommand;
use dali::switch::{SwitchController, Timing};
use dali_switch as dali;
use log::{error, info};
use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(about = "Control DALI lights from momentary switches through a serial gateway")]
struct CmdArgs {
    /// Baud rate of the gateway
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
        /// Delay before the first ramp step (ms)
        #[arg(long, default_value_t = 150)]
        settle: u64,
        /// Time between ramp steps (ms)
        #[arg(long, default_value_t = 200)]
        step_interval: u64,
        /// Number of steps in a full ramp
        #[arg(long, default_value_t = 15)]
        steps: u32,
        /// Delay after a full ramp down before switching off (ms)
        #[arg(long, default_value_t = 400)]
        off_settle: u64,
    },
    /// Send a single command or level
    Send {
        /// "all", "a<0-63>" or "g<0-15>"
        address: String,
        /// Command as two hex digits, sent on the command channel
        #[arg(short, long)]
        command: Option<String>,
        /// Arc power level as two hex digits
        #[arg(short = 'l', long)]
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = CmdArgs::parse();
    let transport = Arc::new(CommandTransport::new(Box::new(SerialPorts::new(
        args.baud_rate,
    ))));
    match args.cmd {
        Cmd::Serve {
            bind,
            port,
            settle,
            step_interval,
            steps,
            off_settle,
        } => {
            let timing = Timing {
                settle: Duration::from_millis(settle),
                step_interval: Duration::from_millis(step_interval),
                steps,
                off_settle: Duration::from_millis(off_settle),
            };
            let switch = SwitchController::new(transport.clone(), timing);
            let api = DaliApi::new(switch, transport);
            let conf = ServerConfig::new().bind_addr(bind).port(port);
            let (server, addr, port) = httpd::setup_server(conf, api);
            info!("DALI switch API on http://{}:{}/DaliCommand", addr, port);
            if let Err(e) = server.await {
                error!("Server failed: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Cmd::Send {
            address,
            command,
            value,
        } => {
            let cmd = match DirectCommand::parse(&address, command.as_deref(), value.as_deref())
            {
                Ok(cmd) => cmd,
                Err(e) => {
                    eprintln!("Invalid command: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match cmd.send(&transport).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Failed to send command: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
