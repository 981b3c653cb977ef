// Test double that records every call made on the robot

use super::{Result, Robot, RobotError};
use crate::messages::{CubeId, Pose, RobotCommand, WheelSetpoint};

#[derive(Debug, Default)]
pub(crate) struct RecordingRobot {
    pub calls: Vec<RobotCommand>,
    pub cube: Option<CubeId>,
    pub pose: Pose,
    /// When set, every one-shot behaviour fails as if the bridge were offline
    pub fail_behaviours: bool,
}

impl RecordingRobot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cube(cube: CubeId) -> Self {
        Self {
            cube: Some(cube),
            ..Self::default()
        }
    }

    pub fn wheel_calls(&self) -> Vec<WheelSetpoint> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RobotCommand::SetWheelMotors(w) => Some(*w),
                _ => None,
            })
            .collect()
    }

    pub fn lift_calls(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RobotCommand::SetLiftMotor { speed } => Some(*speed),
                _ => None,
            })
            .collect()
    }

    pub fn head_calls(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RobotCommand::SetHeadMotor { speed } => Some(*speed),
                _ => None,
            })
            .collect()
    }

    fn behaviour(&mut self, cmd: RobotCommand) -> Result<()> {
        if self.fail_behaviours {
            return Err(RobotError::Offline);
        }
        self.calls.push(cmd);
        Ok(())
    }
}

impl Robot for RecordingRobot {
    fn set_lift_motor(&mut self, speed: f32) -> Result<()> {
        self.calls.push(RobotCommand::SetLiftMotor { speed });
        Ok(())
    }

    fn set_head_motor(&mut self, speed: f32) -> Result<()> {
        self.calls.push(RobotCommand::SetHeadMotor { speed });
        Ok(())
    }

    fn set_wheel_motors(&mut self, wheels: WheelSetpoint) -> Result<()> {
        self.calls.push(RobotCommand::SetWheelMotors(wheels));
        Ok(())
    }

    fn connect_cube(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::ConnectCube)
    }

    fn flash_cube_lights(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::FlashCubeLights)
    }

    fn connected_cube(&self) -> Option<CubeId> {
        self.cube
    }

    fn pickup_object(&mut self, cube: CubeId, num_retries: u32) -> Result<()> {
        self.behaviour(RobotCommand::PickupObject { cube, num_retries })
    }

    fn roll_cube(&mut self, cube: CubeId, num_retries: u32) -> Result<()> {
        self.behaviour(RobotCommand::RollCube { cube, num_retries })
    }

    fn place_object_on_ground_here(&mut self, num_retries: u32) -> Result<()> {
        self.behaviour(RobotCommand::PlaceObjectOnGroundHere { num_retries })
    }

    fn drive_on_charger(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::DriveOnCharger)
    }

    fn drive_off_charger(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::DriveOffCharger)
    }

    fn pose(&self) -> Result<Pose> {
        Ok(self.pose)
    }

    fn go_to_pose(&mut self, pose: Pose) -> Result<()> {
        self.behaviour(RobotCommand::GoToPose { pose })
    }

    fn say_text(&mut self, text: &str) -> Result<()> {
        self.behaviour(RobotCommand::SayText {
            text: text.to_string(),
        })
    }

    fn release_control(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::ReleaseControl)
    }

    fn request_control(&mut self) -> Result<()> {
        self.behaviour(RobotCommand::RequestControl)
    }
}
