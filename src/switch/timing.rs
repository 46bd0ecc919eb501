use tokio::time::Duration;

/// Delays used when ramping a channel
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Timing {
    /// Wait before the first step, absorbs tap jitter
    pub settle: Duration,
    pub step_interval: Duration,
    pub steps: u32,
    /// Wait after the last down step before switching off
    pub off_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            settle: Duration::from_millis(150),
            step_interval: Duration::from_millis(200),
            steps: 15,
            off_settle: Duration::from_millis(400),
        }
    }
}
