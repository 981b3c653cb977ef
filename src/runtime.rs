// Teleop tick loop
// Each tick drains key events, config requests and robot state from zenoh,
// runs at most one queued action, then publishes the resulting robot commands.

use serde::de::DeserializeOwned;
use tokio::time::interval;
use tracing::{info, warn};

use crate::config::{
    RuntimeConfig, TOPIC_CMD_CONFIG, TOPIC_CMD_KEY, TOPIC_RT_ROBOT, TOPIC_STATE_ROBOT,
    TOPIC_STATE_TELEOP,
};
use crate::messages::{
    ConfigRequest, KeyMessage, RobotCommand, RobotState, RuntimeHealth, TeleopStatus,
    WheelSetpoint,
};
use crate::robot::{Robot, RobotLink};
use crate::teleop::RemoteControl;

pub struct Runtime {
    remote: RemoteControl<RobotLink>,
    health: RuntimeHealth,
    drove_off_charger: bool,
}

impl Runtime {
    pub fn new(config: &RuntimeConfig) -> Self {
        let link = RobotLink::new(config.robot_state_timeout);
        Self {
            remote: RemoteControl::with_say_text(link, config.say_text.clone()),
            health: RuntimeHealth::RobotStale, // Stale until the bridge reports
            drove_off_charger: false,
        }
    }

    #[cfg(test)]
    fn remote(&self) -> &RemoteControl<RobotLink> {
        &self.remote
    }

    /// Process a key transition
    fn on_key(&mut self, msg: KeyMessage) {
        self.remote.handle_key_message(&msg);
    }

    /// Process a session configuration request
    fn on_config(&mut self, req: ConfigRequest) {
        info!("Config request: {:?}", req);
        match req {
            ConfigRequest::SetFreeplay { enabled } => self.remote.set_freeplay(enabled),
            ConfigRequest::SelectRoutine { key, routine } => {
                self.remote.select_routine_named(key, &routine)
            }
            ConfigRequest::SetSayText { text } => self.remote.set_say_text(text),
        }
    }

    /// Process a robot state report
    fn on_robot_state(&mut self, state: RobotState) {
        let came_online = self.remote.robot_mut().observe_state(state);
        // The session starts with the robot leaving its charger, once
        if came_online && !self.drove_off_charger {
            self.drove_off_charger = true;
            if let Err(e) = self.remote.robot_mut().drive_off_charger() {
                warn!("Failed to drive off charger: {}", e);
            }
        }
    }

    /// Run one tick: watchdog, one queued action, then collect outgoing commands
    fn tick(&mut self) -> (Vec<RobotCommand>, TeleopStatus) {
        let online = self.remote.robot_mut().check_watchdog();
        self.health = if online {
            RuntimeHealth::Ok
        } else {
            RuntimeHealth::RobotStale
        };

        self.remote.update();

        let status = TeleopStatus {
            health: self.health,
            queued_actions: self.remote.queued_actions(),
            routine_runs: self.remote.routine_runs(),
        };
        (self.remote.robot_mut().take_commands(), status)
    }

    /// Zero every motor on the way out
    fn shutdown(&mut self) -> Vec<RobotCommand> {
        info!("Stopping all motors");
        let link = self.remote.robot_mut();
        let stops = [
            link.set_wheel_motors(WheelSetpoint::zero()),
            link.set_lift_motor(0.0),
            link.set_head_motor(0.0),
        ];
        for result in stops {
            if let Err(e) = result {
                warn!("Failed to stop motor: {}", e);
            }
        }
        link.take_commands()
    }
}

fn decode<T: DeserializeOwned>(sample: &zenoh::sample::Sample, what: &str) -> Option<T> {
    decode_bytes(&sample.payload().to_bytes(), what)
}

// Parse a JSON payload, logging and skipping malformed ones
fn decode_bytes<T: DeserializeOwned>(payload: &[u8], what: &str) -> Option<T> {
    match serde_json::from_slice::<T>(payload) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!("Failed to parse {}: {}", what, e);
            None
        }
    }
}

pub async fn run(config: RuntimeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_key = session.declare_subscriber(TOPIC_CMD_KEY).await?;
    let sub_config = session.declare_subscriber(TOPIC_CMD_CONFIG).await?;
    let sub_state = session.declare_subscriber(TOPIC_STATE_ROBOT).await?;
    let pub_robot = session.declare_publisher(TOPIC_RT_ROBOT).await?;
    let pub_status = session.declare_publisher(TOPIC_STATE_TELEOP).await?;

    let mut runtime = Runtime::new(&config);
    let mut tick = interval(config.tick);

    info!(
        "Runtime started: {}ms tick, {}ms robot state timeout",
        config.tick.as_millis(),
        config.robot_state_timeout.as_millis()
    );
    info!(
        "Subscribed to: {}, {}, {}",
        TOPIC_CMD_KEY, TOPIC_CMD_CONFIG, TOPIC_STATE_ROBOT
    );
    info!("Publishing to: {}, {}", TOPIC_RT_ROBOT, TOPIC_STATE_TELEOP);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut ctrl_c => {
                info!("Shutting down");
                for cmd in runtime.shutdown() {
                    pub_robot.put(serde_json::to_string(&cmd)?).await?;
                }
                return Ok(());
            }
        }

        // 1. Key events in arrival order (non-blocking)
        while let Ok(Some(sample)) = sub_key.try_recv() {
            if let Some(msg) = decode::<KeyMessage>(&sample, "key event") {
                runtime.on_key(msg);
            }
        }

        // 2. Config requests
        while let Ok(Some(sample)) = sub_config.try_recv() {
            if let Some(req) = decode::<ConfigRequest>(&sample, "config request") {
                runtime.on_config(req);
            }
        }

        // 3. Robot state, keep every report (the latest wins)
        while let Ok(Some(sample)) = sub_state.try_recv() {
            if let Some(state) = decode::<RobotState>(&sample, "robot state") {
                runtime.on_robot_state(state);
            }
        }

        // 4. Watchdog + one queued action
        let (commands, status) = runtime.tick();

        // 5. Publish robot commands and status
        for cmd in commands {
            pub_robot.put(serde_json::to_string(&cmd)?).await?;
        }
        pub_status.put(serde_json::to_string(&status)?).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{CubeId, Pose};
    use crate::teleop::Routine;

    fn runtime() -> Runtime {
        Runtime::new(&RuntimeConfig::default())
    }

    fn key(code: u8, is_down: bool) -> KeyMessage {
        KeyMessage {
            key_code: code as u32,
            has_shift: false,
            has_ctrl: false,
            has_alt: false,
            is_down,
        }
    }

    fn online_state() -> RobotState {
        RobotState {
            pose: Pose::default(),
            connected_cube: Some(CubeId(1)),
        }
    }

    #[test]
    fn stale_until_robot_reports() {
        let mut rt = runtime();
        let (commands, status) = rt.tick();
        assert!(commands.is_empty());
        assert_eq!(status.health, RuntimeHealth::RobotStale);
        assert_eq!(status.queued_actions, 0);
    }

    #[test]
    fn drives_off_charger_once() {
        let mut rt = runtime();
        rt.on_robot_state(online_state());
        rt.on_robot_state(online_state());
        let (commands, status) = rt.tick();
        assert_eq!(commands, vec![RobotCommand::DriveOffCharger]);
        assert_eq!(status.health, RuntimeHealth::Ok);
    }

    #[test]
    fn key_release_runs_routine_on_next_tick() {
        let mut rt = runtime();
        rt.on_robot_state(online_state());
        rt.tick();

        rt.on_key(key(b'3', true));
        rt.on_key(key(b'3', false));
        let (commands, status) = rt.tick();
        assert_eq!(
            commands,
            vec![RobotCommand::PickupObject {
                cube: CubeId(1),
                num_retries: 3
            }]
        );
        assert_eq!(status.queued_actions, 0);
        assert_eq!(status.routine_runs, 1);
    }

    #[test]
    fn drive_keys_publish_setpoints_while_offline() {
        let mut rt = runtime();
        rt.on_key(key(b'W', true));
        let (commands, _) = rt.tick();
        assert_eq!(
            commands,
            vec![RobotCommand::SetWheelMotors(WheelSetpoint::new(75.0, 75.0))]
        );
    }

    #[test]
    fn offline_routine_is_dropped_after_one_attempt() {
        let mut rt = runtime();
        rt.on_key(key(b' ', false));
        let (commands, status) = rt.tick();
        assert!(commands.is_empty());
        assert_eq!(status.queued_actions, 0);
        assert_eq!(status.routine_runs, 1);
    }

    #[test]
    fn config_requests_apply() {
        let mut rt = runtime();
        rt.on_robot_state(online_state());
        rt.tick();

        rt.on_config(ConfigRequest::SelectRoutine {
            key: 1,
            routine: "save_pose".to_string(),
        });
        rt.on_config(ConfigRequest::SetSayText {
            text: "Hello".to_string(),
        });
        rt.on_config(ConfigRequest::SetFreeplay { enabled: true });
        assert_eq!(rt.remote().slots()[0], Routine::SavePose);
        assert_eq!(rt.remote().say_text(), "Hello");

        let (commands, _) = rt.tick();
        assert_eq!(commands, vec![RobotCommand::ReleaseControl]);
    }

    #[test]
    fn malformed_payloads_are_skipped() {
        assert_eq!(decode_bytes::<KeyMessage>(b"not json", "key event"), None);
        assert_eq!(
            decode_bytes::<ConfigRequest>(
                br#"{"type":"select_routine","key":"three"}"#,
                "config request"
            ),
            None
        );
        assert_eq!(
            decode_bytes::<ConfigRequest>(br#"{"type":"dance"}"#, "config request"),
            None
        );
        assert_eq!(
            decode_bytes::<ConfigRequest>(
                br#"{"type":"set_freeplay","enabled":true}"#,
                "config request"
            ),
            Some(ConfigRequest::SetFreeplay { enabled: true })
        );
    }

    #[test]
    fn shutdown_zeroes_motors() {
        let mut rt = runtime();
        assert_eq!(
            rt.shutdown(),
            vec![
                RobotCommand::SetWheelMotors(WheelSetpoint::zero()),
                RobotCommand::SetLiftMotor { speed: 0.0 },
                RobotCommand::SetHeadMotor { speed: 0.0 },
            ]
        );
    }
}
