// Robot seam for the teleop controller
//
// Provides:
// - The `Robot` trait: everything the controller asks of the robot
// - `RobotLink`: a command outbox fed to the robot bridge over zenoh

mod link;
#[cfg(test)]
pub(crate) mod recorder;

pub use link::RobotLink;

use crate::messages::{CubeId, Pose, WheelSetpoint};

/// Error types for robot commands
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RobotError {
    #[error("Robot bridge offline (no state report received recently)")]
    Offline,
}

pub type Result<T> = std::result::Result<T, RobotError>;

/// Capabilities of the robot used by the teleop controller
///
/// Motor setters are continuous setpoints; the rest are one-shot behaviours.
pub trait Robot {
    fn set_lift_motor(&mut self, speed: f32) -> Result<()>;
    fn set_head_motor(&mut self, speed: f32) -> Result<()>;
    fn set_wheel_motors(&mut self, wheels: WheelSetpoint) -> Result<()>;

    fn connect_cube(&mut self) -> Result<()>;
    fn flash_cube_lights(&mut self) -> Result<()>;
    /// The light cube currently connected, if any
    fn connected_cube(&self) -> Option<CubeId>;
    fn pickup_object(&mut self, cube: CubeId, num_retries: u32) -> Result<()>;
    fn roll_cube(&mut self, cube: CubeId, num_retries: u32) -> Result<()>;
    fn place_object_on_ground_here(&mut self, num_retries: u32) -> Result<()>;

    fn drive_on_charger(&mut self) -> Result<()>;
    fn drive_off_charger(&mut self) -> Result<()>;
    /// Last known robot pose
    fn pose(&self) -> Result<Pose>;
    fn go_to_pose(&mut self, pose: Pose) -> Result<()>;

    fn say_text(&mut self, text: &str) -> Result<()>;

    /// Let the robot run its own behaviours (free play)
    fn release_control(&mut self) -> Result<()>;
    /// Take control back from free play
    fn request_control(&mut self) -> Result<()>;
}
