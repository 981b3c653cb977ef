// Command outbox for the robot bridge
//
// The runtime drains the outbox every tick and publishes each command. Robot
// state reported by the bridge is cached here, with a watchdog: if the bridge
// stops reporting, behaviour commands are refused until it comes back.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{Result, Robot, RobotError};
use crate::messages::{CubeId, Pose, RobotCommand, RobotState, WheelSetpoint};

pub struct RobotLink {
    outbox: Vec<RobotCommand>,
    state: Option<RobotState>,
    state_received_at: Option<Instant>,
    state_timeout: Duration,
    online: bool,
}

impl RobotLink {
    pub fn new(state_timeout: Duration) -> Self {
        Self {
            outbox: Vec::new(),
            state: None,
            state_received_at: None,
            state_timeout,
            online: false, // Offline until the bridge reports
        }
    }

    /// Record a state report from the bridge
    ///
    /// Returns true when this report brings the link online.
    pub fn observe_state(&mut self, state: RobotState) -> bool {
        self.observe_state_at(state, Instant::now())
    }

    fn observe_state_at(&mut self, state: RobotState, now: Instant) -> bool {
        debug!("Robot state: {:?}", state);
        self.state = Some(state);
        self.state_received_at = Some(now);
        let came_online = !self.online;
        if came_online {
            info!("Robot bridge online");
        }
        self.online = true;
        came_online
    }

    /// Re-evaluate the watchdog; returns whether the link is online
    pub fn check_watchdog(&mut self) -> bool {
        self.check_watchdog_at(Instant::now())
    }

    fn check_watchdog_at(&mut self, now: Instant) -> bool {
        let fresh = self
            .state_received_at
            .is_some_and(|at| now.saturating_duration_since(at) <= self.state_timeout);
        if self.online && !fresh {
            warn!(
                "No robot state for over {}ms, refusing behaviours",
                self.state_timeout.as_millis()
            );
        }
        self.online = fresh;
        fresh
    }

    #[cfg(test)]
    fn is_online(&self) -> bool {
        self.online
    }

    /// Take every command queued since the last call
    pub fn take_commands(&mut self) -> Vec<RobotCommand> {
        std::mem::take(&mut self.outbox)
    }

    #[cfg(test)]
    fn pending_commands(&self) -> &[RobotCommand] {
        &self.outbox
    }

    // Motor setpoints are always forwarded; the bridge stops motors on its own side
    fn push_setpoint(&mut self, cmd: RobotCommand) -> Result<()> {
        self.outbox.push(cmd);
        Ok(())
    }

    fn push_behaviour(&mut self, cmd: RobotCommand) -> Result<()> {
        if !self.online {
            return Err(RobotError::Offline);
        }
        self.outbox.push(cmd);
        Ok(())
    }

    fn known_state(&self) -> Option<&RobotState> {
        if self.online { self.state.as_ref() } else { None }
    }
}

impl Robot for RobotLink {
    fn set_lift_motor(&mut self, speed: f32) -> Result<()> {
        self.push_setpoint(RobotCommand::SetLiftMotor { speed })
    }

    fn set_head_motor(&mut self, speed: f32) -> Result<()> {
        self.push_setpoint(RobotCommand::SetHeadMotor { speed })
    }

    fn set_wheel_motors(&mut self, wheels: WheelSetpoint) -> Result<()> {
        self.push_setpoint(RobotCommand::SetWheelMotors(wheels))
    }

    fn connect_cube(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::ConnectCube)
    }

    fn flash_cube_lights(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::FlashCubeLights)
    }

    fn connected_cube(&self) -> Option<CubeId> {
        self.known_state().and_then(|s| s.connected_cube)
    }

    fn pickup_object(&mut self, cube: CubeId, num_retries: u32) -> Result<()> {
        self.push_behaviour(RobotCommand::PickupObject { cube, num_retries })
    }

    fn roll_cube(&mut self, cube: CubeId, num_retries: u32) -> Result<()> {
        self.push_behaviour(RobotCommand::RollCube { cube, num_retries })
    }

    fn place_object_on_ground_here(&mut self, num_retries: u32) -> Result<()> {
        self.push_behaviour(RobotCommand::PlaceObjectOnGroundHere { num_retries })
    }

    fn drive_on_charger(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::DriveOnCharger)
    }

    fn drive_off_charger(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::DriveOffCharger)
    }

    fn pose(&self) -> Result<Pose> {
        self.known_state()
            .map(|s| s.pose)
            .ok_or(RobotError::Offline)
    }

    fn go_to_pose(&mut self, pose: Pose) -> Result<()> {
        self.push_behaviour(RobotCommand::GoToPose { pose })
    }

    fn say_text(&mut self, text: &str) -> Result<()> {
        self.push_behaviour(RobotCommand::SayText {
            text: text.to_string(),
        })
    }

    fn release_control(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::ReleaseControl)
    }

    fn request_control(&mut self) -> Result<()> {
        self.push_behaviour(RobotCommand::RequestControl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_cube() -> RobotState {
        RobotState {
            pose: Pose {
                x: 10.0,
                y: -4.0,
                z: 0.0,
                angle_z_deg: 90.0,
            },
            connected_cube: Some(CubeId(1)),
        }
    }

    #[test]
    fn starts_offline_and_refuses_behaviours() {
        let mut link = RobotLink::new(Duration::from_secs(2));
        assert!(!link.is_online());
        assert_eq!(link.say_text("hi"), Err(RobotError::Offline));
        assert_eq!(link.pose(), Err(RobotError::Offline));
        assert_eq!(link.connected_cube(), None);
        assert!(link.pending_commands().is_empty());
    }

    #[test]
    fn setpoints_are_forwarded_while_offline() {
        let mut link = RobotLink::new(Duration::from_secs(2));
        link.set_lift_motor(4.0).unwrap();
        assert_eq!(
            link.take_commands(),
            vec![RobotCommand::SetLiftMotor { speed: 4.0 }]
        );
        assert!(link.pending_commands().is_empty());
    }

    #[test]
    fn first_state_report_brings_link_online() {
        let mut link = RobotLink::new(Duration::from_secs(2));
        assert!(link.observe_state(state_with_cube()));
        assert!(!link.observe_state(state_with_cube()));
        assert_eq!(link.connected_cube(), Some(CubeId(1)));
        assert_eq!(link.pose().unwrap().angle_z_deg, 90.0);

        link.flash_cube_lights().unwrap();
        assert_eq!(link.take_commands(), vec![RobotCommand::FlashCubeLights]);
    }

    #[test]
    fn watchdog_takes_link_offline() {
        let mut link = RobotLink::new(Duration::from_secs(2));
        let t0 = Instant::now();
        link.observe_state_at(state_with_cube(), t0);

        assert!(link.check_watchdog_at(t0 + Duration::from_secs(1)));
        assert!(!link.check_watchdog_at(t0 + Duration::from_secs(3)));
        assert_eq!(link.connected_cube(), None);
        assert_eq!(link.drive_on_charger(), Err(RobotError::Offline));

        // Coming back reports the transition again
        assert!(link.observe_state_at(state_with_cube(), t0 + Duration::from_secs(4)));
    }
}
