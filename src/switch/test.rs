use crate::base::address::BusAddress;
use crate::base::cmd_defs as cmd;
use crate::drivers::sunricher::serial::recorder::RecordingPorts;
use crate::drivers::sunricher::CommandTransport;
use crate::switch::event::{Action, Direction, SwitchStatus};
use crate::switch::machine::SwitchController;
use crate::switch::timing::Timing;
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

// a2 -> 0x04 for levels, 0x05 for commands
const LEVEL_ADDR: u8 = 0x04;
const CMD_ADDR: u8 = 0x05;

fn addr() -> BusAddress {
    BusAddress::short(2).unwrap()
}

fn setup() -> (SwitchController, RecordingPorts) {
    let ports = RecordingPorts::new(&["/dev/ttyUSB0"]);
    let transport = Arc::new(CommandTransport::new(Box::new(ports.clone())));
    (SwitchController::new(transport, Timing::default()), ports)
}

async fn event(ctrl: &SwitchController, action: Action, dir: Direction) -> SwitchStatus {
    let status = ctrl.handle_event(addr(), action, dir).await;
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(
        !(state.up_active && state.down_active),
        "Both directions active: {:?}",
        state
    );
    status
}

// Short press up and let the resulting ramp die out
async fn switch_on(ctrl: &SwitchController) {
    assert_eq!(
        event(ctrl, Action::Hold, Direction::Up).await,
        SwitchStatus::HoldRegistered
    );
    assert_eq!(
        event(ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::CommandSent
    );
    sleep(Duration::from_millis(1000)).await;
}

#[tokio::test(start_paused = true)]
async fn hold_up_when_off() {
    let (ctrl, ports) = setup();
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Up).await,
        SwitchStatus::HoldRegistered
    );
    assert_eq!(ports.sent(), vec![(CMD_ADDR, cmd::GO_TO_LAST_ACTIVE_LEVEL)]);
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(state.is_on);
    assert!(state.up_active);
    assert_eq!(state.generation, 1);

    assert_eq!(
        event(&ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::CommandSent
    );
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(ports.sent().len(), 1);
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(state.is_on);
    assert!(!state.any_active());
    assert!(!state.any_dimming());
}

#[tokio::test(start_paused = true)]
async fn short_down_press_when_off() {
    let (ctrl, ports) = setup();
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Down).await,
        SwitchStatus::HoldRegistered
    );
    assert!(ports.sent().is_empty());
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Down).await,
        SwitchStatus::CommandSent
    );
    assert_eq!(ports.sent(), vec![(LEVEL_ADDR, cmd::LEVEL_OFF)]);
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(!state.is_on);
    // No ramp is started for a channel that is off
    assert_eq!(state.generation, 0);
}

#[tokio::test(start_paused = true)]
async fn short_down_press_when_on() {
    let (ctrl, ports) = setup();
    switch_on(&ctrl).await;
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Down).await,
        SwitchStatus::HoldRegistered
    );
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Down).await,
        SwitchStatus::CommandSent
    );
    assert!(!ctrl.channel_state(addr()).await.unwrap().is_on);
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(
        ports.sent(),
        vec![
            (CMD_ADDR, cmd::GO_TO_LAST_ACTIVE_LEVEL),
            (LEVEL_ADDR, cmd::LEVEL_OFF)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn opposite_direction_resets() {
    let (ctrl, ports) = setup();
    event(&ctrl, Action::Hold, Direction::Up).await;
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Down).await,
        SwitchStatus::Reset
    );
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(!state.any_active());
    assert!(!state.any_dimming());
    assert!(state.is_on);
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(ports.sent(), vec![(CMD_ADDR, cmd::GO_TO_LAST_ACTIVE_LEVEL)]);
}

#[tokio::test(start_paused = true)]
async fn opposite_release_resets() {
    let (ctrl, ports) = setup();
    switch_on(&ctrl).await;
    event(&ctrl, Action::Hold, Direction::Down).await;
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::Reset
    );
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(ports.sent().len(), 1);
    assert!(ctrl.channel_state(addr()).await.unwrap().is_on);
}

#[tokio::test(start_paused = true)]
async fn stray_release() {
    let (ctrl, ports) = setup();
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Down).await,
        SwitchStatus::NothingWasActive
    );
    assert!(ports.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn full_down_ramp() {
    let (ctrl, ports) = setup();
    switch_on(&ctrl).await;
    let start = Instant::now();
    event(&ctrl, Action::Hold, Direction::Down).await;
    sleep(Duration::from_millis(5000)).await;

    let written = ports.written();
    // Instant on, 15 steps down, off
    assert_eq!(written.len(), 17);
    let steps = &written[1..16];
    for w in steps {
        assert_eq!((w.frame.address(), w.frame.value()), (CMD_ADDR, cmd::DOWN));
    }
    assert!(steps[0].when - start >= Duration::from_millis(350));
    for pair in steps.windows(2) {
        let gap = pair[1].when - pair[0].when;
        assert!(gap >= Duration::from_millis(200) && gap < Duration::from_millis(250));
    }
    let off = &written[16];
    assert_eq!((off.frame.address(), off.frame.value()), (LEVEL_ADDR, cmd::LEVEL_OFF));
    assert!(off.when - steps[14].when >= Duration::from_millis(400));

    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(!state.is_on);
    assert!(!state.dimming_down);
}

#[tokio::test(start_paused = true)]
async fn full_up_ramp() {
    let (ctrl, ports) = setup();
    event(&ctrl, Action::Hold, Direction::Up).await;
    sleep(Duration::from_millis(5000)).await;
    let sent = ports.sent();
    assert_eq!(sent.len(), 16);
    assert!(sent[1..].iter().all(|s| *s == (CMD_ADDR, cmd::UP)));
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(state.is_on);
    assert!(state.up_active);
    assert!(!state.dimming_up);
    // Release after a completed ramp is a plain release
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::CommandSent
    );
    assert_eq!(ports.sent().len(), 16);
}

#[tokio::test(start_paused = true)]
async fn release_during_ramp() {
    let (ctrl, ports) = setup();
    switch_on(&ctrl).await;
    event(&ctrl, Action::Hold, Direction::Down).await;
    sleep(Duration::from_millis(500)).await;
    assert_eq!(ports.sent().len(), 2);
    assert!(ctrl.channel_state(addr()).await.unwrap().dimming_down);

    assert_eq!(
        event(&ctrl, Action::Release, Direction::Down).await,
        SwitchStatus::DimmingStarted
    );
    assert_eq!(ports.sent().len(), 2);
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(
        ports.sent(),
        vec![
            (CMD_ADDR, cmd::GO_TO_LAST_ACTIVE_LEVEL),
            (CMD_ADDR, cmd::DOWN)
        ]
    );
    let state = ctrl.channel_state(addr()).await.unwrap();
    assert!(state.is_on);
    assert!(!state.dimming_down);
}

#[tokio::test(start_paused = true)]
async fn repeated_hold_supersedes_ramp() {
    let (ctrl, ports) = setup();
    event(&ctrl, Action::Hold, Direction::Up).await;
    sleep(Duration::from_millis(400)).await;
    // Instant on and the first step of the first ramp
    assert_eq!(ports.sent().len(), 2);

    let second = Instant::now();
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Up).await,
        SwitchStatus::HoldRegistered
    );
    assert_eq!(ctrl.channel_state(addr()).await.unwrap().generation, 2);
    sleep(Duration::from_millis(500)).await;
    // The first ramp would have stepped again 200 ms after its first step
    let written = ports.written();
    assert_eq!(written.len(), 3);
    assert!(written[2].when - second >= Duration::from_millis(350));

    assert_eq!(
        event(&ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::DimmingStarted
    );
    sleep(Duration::from_millis(2000)).await;
    assert_eq!(ports.sent().len(), 3);
    assert!(!ctrl.channel_state(addr()).await.unwrap().any_dimming());
}

#[tokio::test(start_paused = true)]
async fn reversal_during_ramp_clears_stale_dimming() {
    let (ctrl, ports) = setup();
    switch_on(&ctrl).await;
    event(&ctrl, Action::Hold, Direction::Down).await;
    sleep(Duration::from_millis(500)).await;
    event(&ctrl, Action::Release, Direction::Down).await;
    // Hold up before the down ramp notices the release
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Up).await,
        SwitchStatus::HoldRegistered
    );
    assert!(!ctrl.channel_state(addr()).await.unwrap().dimming_down);
    assert_eq!(
        event(&ctrl, Action::Release, Direction::Up).await,
        SwitchStatus::CommandSent
    );
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(ports.sent().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn no_gateway() {
    let (ctrl, ports) = setup();
    ports.set_ports(&[]);
    assert_eq!(
        event(&ctrl, Action::Hold, Direction::Up).await,
        SwitchStatus::HoldRegistered
    );
    // The channel is believed on even though nothing reached the bus
    assert!(ctrl.channel_state(addr()).await.unwrap().is_on);
    sleep(Duration::from_millis(5000)).await;
    assert!(ports.written().is_empty());
    assert!(!ctrl.channel_state(addr()).await.unwrap().dimming_up);
}

#[tokio::test(start_paused = true)]
async fn channels_are_independent() {
    let (ctrl, ports) = setup();
    let other = BusAddress::group(3).unwrap();
    event(&ctrl, Action::Hold, Direction::Up).await;
    assert_eq!(
        ctrl.handle_event(other, Action::Hold, Direction::Down).await,
        SwitchStatus::HoldRegistered
    );
    assert!(ctrl.channel_state(addr()).await.unwrap().up_active);
    assert!(ctrl.channel_state(other).await.unwrap().down_active);
    assert_eq!(
        ctrl.handle_event(other, Action::Release, Direction::Down).await,
        SwitchStatus::CommandSent
    );
    assert_eq!(
        ports.sent(),
        vec![
            (CMD_ADDR, cmd::GO_TO_LAST_ACTIVE_LEVEL),
            (0x86, cmd::LEVEL_OFF)
        ]
    );
}
