use super::event::Direction;
use super::machine::SwitchContext;
use crate::base::address::BusAddress;
use crate::base::cmd_defs as cmd;
use log::debug;
use std::sync::Arc;
use tokio::time::sleep;

enum Checkpoint {
    /// A newer gesture started another ramp
    Superseded,
    /// Released or reversed since the last step
    Ended,
    Step,
}

fn step_command(dir: Direction) -> u8 {
    match dir {
        Direction::Up => cmd::UP,
        Direction::Down => cmd::DOWN,
    }
}

async fn send(ctxt: &SwitchContext, address: u8, value: u8) {
    // Nobody to report to, the gesture simply has no effect
    if let Err(e) = ctxt.transport.send(address, value).await {
        debug!("Ramp frame {:02x} to {:02x} dropped: {}", value, address, e);
    }
}

/// Step the level of a channel while the switch is held.
///
/// Stops as soon as the channel generation no longer matches `generation`.
pub(crate) async fn run(
    ctxt: Arc<SwitchContext>,
    address: BusAddress,
    dir: Direction,
    generation: u64,
) {
    let timing = ctxt.timing;
    sleep(timing.settle).await;
    for step in 0..timing.steps {
        sleep(timing.step_interval).await;
        let checkpoint = ctxt
            .registry
            .modify(address, |state| {
                if state.generation != generation {
                    Checkpoint::Superseded
                } else if !state.is_active(dir) || state.is_active(dir.opposite()) {
                    state.set_dimming(dir, false);
                    Checkpoint::Ended
                } else {
                    state.set_dimming(dir, true);
                    Checkpoint::Step
                }
            })
            .await;
        match checkpoint {
            Checkpoint::Superseded => {
                debug!("Ramp {} of {} superseded at step {}", generation, address, step);
                return;
            }
            Checkpoint::Ended => {
                debug!("Ramp {} of {} ended after {} steps", generation, address, step);
                return;
            }
            Checkpoint::Step => send(&ctxt, address.command_channel(), step_command(dir)).await,
        }
    }

    match dir {
        Direction::Up => {
            ctxt.registry
                .modify(address, |state| {
                    if state.generation == generation {
                        state.dimming_up = false;
                    }
                })
                .await;
        }
        Direction::Down => {
            sleep(timing.off_settle).await;
            let off = ctxt
                .registry
                .modify(address, |state| {
                    if state.generation != generation {
                        return false;
                    }
                    state.dimming_down = false;
                    if state.down_active {
                        state.is_on = false;
                        true
                    } else {
                        false
                    }
                })
                .await;
            if off {
                debug!("Ramp {} of {} reached the bottom, switching off", generation, address);
                send(&ctxt, address.level_channel(), cmd::LEVEL_OFF).await;
            }
        }
    }
}
