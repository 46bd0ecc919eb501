use super::event::{Action, Direction, SwitchStatus};
use super::ramp;
use super::registry::{ChannelRegistry, ChannelState};
use super::timing::Timing;
use crate::base::address::BusAddress;
use crate::base::cmd_defs as cmd;
use crate::drivers::sunricher::CommandTransport;
use log::{debug, info, warn};
use std::sync::Arc;

pub(crate) struct SwitchContext {
    pub registry: ChannelRegistry,
    pub transport: Arc<CommandTransport>,
    pub timing: Timing,
}

/// Turns hold/release events from momentary switches into DALI commands.
///
/// A short press of "up" switches the channel on at its last active level,
/// a short press of "down" switches it off. Holding either direction ramps
/// the level in steps until released. Holding "down" through the whole
/// ramp ends with the channel switched off.
#[derive(Clone)]
pub struct SwitchController {
    ctxt: Arc<SwitchContext>,
}

impl SwitchController {
    pub fn new(transport: Arc<CommandTransport>, timing: Timing) -> SwitchController {
        SwitchController {
            ctxt: Arc::new(SwitchContext {
                registry: ChannelRegistry::new(),
                transport,
                timing,
            }),
        }
    }

    pub async fn channel_state(&self, address: BusAddress) -> Option<ChannelState> {
        self.ctxt.registry.snapshot(address).await
    }

    pub async fn handle_event(
        &self,
        address: BusAddress,
        action: Action,
        dir: Direction,
    ) -> SwitchStatus {
        info!(
            "Switch address: {}, action: {}, direction: {}",
            address, action, dir
        );
        let (status, off) = {
            let mut channels = self.ctxt.registry.lock().await;
            let state = channels.channel(address);
            if state.is_active(dir.opposite()) {
                state.reset();
                (SwitchStatus::Reset, false)
            } else {
                match action {
                    Action::Hold => (self.hold(state, address, dir).await, false),
                    Action::Release => release(state, dir),
                }
            }
        };
        if off {
            if let Err(e) = self
                .ctxt
                .transport
                .send(address.level_channel(), cmd::LEVEL_OFF)
                .await
            {
                warn!("Failed to switch off {}: {}", address, e);
            }
        }
        debug!("{}: {}", address, status);
        status
    }

    // Called with the registry locked
    async fn hold(
        &self,
        state: &mut ChannelState,
        address: BusAddress,
        dir: Direction,
    ) -> SwitchStatus {
        if state.is_active(dir) || state.is_dimming(dir) {
            // Repeated hold, start the ramp over
            state.reset();
        }
        state.set_active(dir, true);
        if dir == Direction::Up && !state.is_on {
            // Sent with the lock held so that is_on matches what the bus got
            if let Err(e) = self
                .ctxt
                .transport
                .send(address.command_channel(), cmd::GO_TO_LAST_ACTIVE_LEVEL)
                .await
            {
                warn!("Failed to switch on {}: {}", address, e);
            }
            state.is_on = true;
        }
        if state.is_on {
            state.generation += 1;
            // Any ramp in the other direction is superseded and will never clear its flag
            state.set_dimming(dir.opposite(), false);
            tokio::spawn(ramp::run(
                self.ctxt.clone(),
                address,
                dir,
                state.generation,
            ));
        }
        SwitchStatus::HoldRegistered
    }
}

// Returns true if the channel should be switched off once the lock is released
fn release(state: &mut ChannelState, dir: Direction) -> (SwitchStatus, bool) {
    if !state.any_active() {
        return (SwitchStatus::NothingWasActive, false);
    }
    state.set_active(dir, false);
    if state.any_dimming() {
        return (SwitchStatus::DimmingStarted, false);
    }
    match dir {
        Direction::Up => (SwitchStatus::CommandSent, false),
        Direction::Down => {
            state.is_on = false;
            (SwitchStatus::CommandSent, true)
        }
    }
}
