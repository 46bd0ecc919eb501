use super::event::Direction;
use crate::base::address::BusAddress;
use serde_derive::Serialize;
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

/// What we believe about one channel.
///
/// `is_on` is never confirmed by the bus, it only reflects the commands
/// that were issued.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct ChannelState {
    pub up_active: bool,
    pub down_active: bool,
    pub dimming_up: bool,
    pub dimming_down: bool,
    pub is_on: bool,
    /// Bumped for every ramp started. A ramp only acts while this still
    /// matches the value it was started with.
    pub generation: u64,
}

impl ChannelState {
    pub fn is_active(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up_active,
            Direction::Down => self.down_active,
        }
    }

    pub fn set_active(&mut self, dir: Direction, active: bool) {
        match dir {
            Direction::Up => self.up_active = active,
            Direction::Down => self.down_active = active,
        }
    }

    pub fn is_dimming(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.dimming_up,
            Direction::Down => self.dimming_down,
        }
    }

    pub fn set_dimming(&mut self, dir: Direction, dimming: bool) {
        match dir {
            Direction::Up => self.dimming_up = dimming,
            Direction::Down => self.dimming_down = dimming,
        }
    }

    pub fn any_active(&self) -> bool {
        self.up_active || self.down_active
    }

    pub fn any_dimming(&self) -> bool {
        self.dimming_up || self.dimming_down
    }

    /// Clear activity and dimming, `is_on` and `generation` are kept
    pub fn reset(&mut self) {
        self.up_active = false;
        self.down_active = false;
        self.dimming_up = false;
        self.dimming_down = false;
    }
}

/// State of every channel seen so far.
///
/// Channels are created on first use and never removed.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: Mutex<HashMap<BusAddress, ChannelState>>,
}

/// Exclusive access to the registry. Channel state can only be reached
/// through this guard, so it is never touched without holding the lock.
pub struct RegistryGuard<'a> {
    channels: MutexGuard<'a, HashMap<BusAddress, ChannelState>>,
}

impl RegistryGuard<'_> {
    pub fn channel(&mut self, address: BusAddress) -> &mut ChannelState {
        self.channels.entry(address).or_default()
    }
}

impl ChannelRegistry {
    pub fn new() -> ChannelRegistry {
        ChannelRegistry::default()
    }

    pub async fn lock(&self) -> RegistryGuard<'_> {
        RegistryGuard {
            channels: self.channels.lock().await,
        }
    }

    /// Run `f` on the channel state with the lock held
    pub async fn modify<R, F>(&self, address: BusAddress, f: F) -> R
    where
        F: FnOnce(&mut ChannelState) -> R,
    {
        let mut guard = self.lock().await;
        f(guard.channel(address))
    }

    pub async fn snapshot(&self, address: BusAddress) -> Option<ChannelState> {
        self.channels.lock().await.get(&address).copied()
    }

    pub async fn len(&self) -> usize {
        self.channels.lock().await.len()
    }
}
