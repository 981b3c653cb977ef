// Timeouts, topics, teleop tuning
use std::time::Duration;

// Tick period for draining the action queue (the browser page polled every 60ms)
pub const TICK: Duration = Duration::from_millis(60);

// Robot state watchdog: behaviours are refused if the bridge goes quiet
pub const ROBOT_STATE_TIMEOUT: Duration = Duration::from_millis(2000);

// Zenoh topics
pub const TOPIC_CMD_KEY: &str = "vector/cmd/key"; // key transitions
pub const TOPIC_CMD_CONFIG: &str = "vector/cmd/config"; // freeplay, slot bindings, say text
pub const TOPIC_STATE_ROBOT: &str = "vector/state/robot"; // reported by the robot bridge
pub const TOPIC_RT_ROBOT: &str = "vector/rt/robot"; // commands to the robot bridge
pub const TOPIC_STATE_TELEOP: &str = "vector/state/teleop"; // runtime status

// Pending one-shot actions kept before the oldest is dropped
pub const ACTION_QUEUE_CAPACITY: usize = 10;

// Retries handed to the robot for cube manipulation
pub const MANIPULATION_RETRIES: u32 = 3;

pub const DEFAULT_SAY_TEXT: &str = "Hi I'm Vector";

/// Runtime settings, defaulting to the constants above
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tick: Duration,
    pub robot_state_timeout: Duration,
    pub say_text: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick: TICK,
            robot_state_timeout: ROBOT_STATE_TIMEOUT,
            say_text: DEFAULT_SAY_TEXT.to_string(),
        }
    }
}
