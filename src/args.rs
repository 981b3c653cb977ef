// Commandline arguments for the teleop runtime

use std::time::Duration;

use clap::Parser;

use crate::config::{DEFAULT_SAY_TEXT, ROBOT_STATE_TIMEOUT, RuntimeConfig, TICK};

#[derive(Debug, Parser, Clone)]
#[command(version, about = "Keyboard teleop runtime for the Vector robot")]
pub struct RuntimeArgs {
    /// Period of the action queue tick, in milliseconds
    #[arg(long = "tick-ms", default_value_t = TICK.as_millis() as u64)]
    pub tick_ms: u64,

    /// Refuse robot behaviours after this long without a robot state report, in milliseconds
    #[arg(long = "robot-timeout-ms", default_value_t = ROBOT_STATE_TIMEOUT.as_millis() as u64)]
    pub robot_timeout_ms: u64,

    /// Text spoken when space is released
    #[arg(long = "say", default_value = DEFAULT_SAY_TEXT)]
    pub say_text: String,
}

impl From<RuntimeArgs> for RuntimeConfig {
    fn from(args: RuntimeArgs) -> Self {
        Self {
            // A zero period would make tokio's interval panic
            tick: Duration::from_millis(args.tick_ms.max(1)),
            robot_state_timeout: Duration::from_millis(args.robot_timeout_ms),
            say_text: args.say_text,
        }
    }
}
