// Define message types for the runtime

use serde::{Deserialize, Deserializer, Serialize};

// Key transition from the browser page / keyboard client -> runtime
// Field names follow the page's JavaScript (keyCode, hasShift, ...); the page
// sends modifiers as 1/0, the keyboard client as true/false
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMessage {
    pub key_code: u32,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub has_shift: bool,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub has_ctrl: bool,
    #[serde(default, deserialize_with = "bool_or_flag")]
    pub has_alt: bool,
    #[serde(deserialize_with = "bool_or_flag")]
    pub is_down: bool,
}

// Accept a JSON bool or an integer flag (nonzero is true)
fn bool_or_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

/// Session configuration requests -> runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigRequest {
    /// Hand the robot back to its own behaviours (true) or take control (false)
    SetFreeplay { enabled: bool },
    /// Rebind numeric key `key` (1..=8) to a routine, by name
    SelectRoutine { key: u8, routine: String },
    /// Text spoken when space is released
    SetSayText { text: String },
}

/// Robot pose in the robot's world frame (mm, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub angle_z_deg: f32,
}

/// Object id of a connected light cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubeId(pub u32);

// Robot state reported by the robot bridge -> runtime
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RobotState {
    pub pose: Pose,
    #[serde(default)]
    pub connected_cube: Option<CubeId>,
}

/// Wheel speeds (mm/s) and accelerations (mm/s^2) for the tread motors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelSetpoint {
    pub left: f32,
    pub right: f32,
    pub left_accel: f32,
    pub right_accel: f32,
}

impl WheelSetpoint {
    // Accelerations scale with the commanded speed
    const ACCEL_FACTOR: f32 = 4.0;

    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left,
            right,
            left_accel: left * Self::ACCEL_FACTOR,
            right_accel: right * Self::ACCEL_FACTOR,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

// Command from runtime -> robot bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RobotCommand {
    SetLiftMotor { speed: f32 },
    SetHeadMotor { speed: f32 },
    SetWheelMotors(WheelSetpoint),
    ConnectCube,
    FlashCubeLights,
    PickupObject { cube: CubeId, num_retries: u32 },
    RollCube { cube: CubeId, num_retries: u32 },
    PlaceObjectOnGroundHere { num_retries: u32 },
    DriveOnCharger,
    DriveOffCharger,
    GoToPose { pose: Pose },
    SayText { text: String },
    ReleaseControl,
    RequestControl,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    RobotStale,
}

/// Status published by runtime every tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeleopStatus {
    pub health: RuntimeHealth,
    pub queued_actions: usize,
    pub routine_runs: u64,
}
