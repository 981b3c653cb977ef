// One-shot routines triggered from the numeric keys and the space bar

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::MANIPULATION_RETRIES;
use crate::messages::Pose;
use crate::robot::{Robot, RobotError};

/// Named robot behaviours a numeric key can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    ConnectToCube,
    PickUpCube,
    DriveToCharger,
    RollCube,
    FlashCubeLights,
    SavePose,
    GoToSavedPose,
    PutCubeDown,
}

impl Routine {
    /// Every routine, in the order the key selector lists them
    pub const ALL: [Routine; 8] = [
        Routine::ConnectToCube,
        Routine::PickUpCube,
        Routine::DriveToCharger,
        Routine::RollCube,
        Routine::FlashCubeLights,
        Routine::SavePose,
        Routine::GoToSavedPose,
        Routine::PutCubeDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Routine::ConnectToCube => "connect_to_cube",
            Routine::PickUpCube => "pick_up_cube",
            Routine::DriveToCharger => "drive_to_charger",
            Routine::RollCube => "roll_cube",
            Routine::FlashCubeLights => "flash_cube_lights",
            Routine::SavePose => "save_pose",
            Routine::GoToSavedPose => "go_to_saved_pose",
            Routine::PutCubeDown => "put_cube_down",
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown routine: {0}")]
pub struct UnknownRoutine(pub String);

impl FromStr for Routine {
    type Err = UnknownRoutine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Routine::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| UnknownRoutine(s.to_string()))
    }
}

/// A pending one-shot action together with its argument
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Routine(Routine),
    SayText(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Routine(r) => write!(f, "{}", r),
            Action::SayText(text) => write!(f, "say_text({:?})", text),
        }
    }
}

/// Runs one-shot actions against the robot
///
/// Failures are logged and swallowed, and every run reports completion, so a
/// failed action is never retried.
#[derive(Debug, Default)]
pub struct RoutineRunner {
    saved_pose: Option<Pose>,
    runs: u64,
}

impl RoutineRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions attempted so far, successful or not
    pub fn runs(&self) -> u64 {
        self.runs
    }

    #[cfg(test)]
    pub(crate) fn saved_pose(&self) -> Option<Pose> {
        self.saved_pose
    }

    /// Run an action; always returns true (completed)
    pub fn run(&mut self, robot: &mut dyn Robot, action: &Action) -> bool {
        info!("Running {}", action);
        let result = match action {
            Action::Routine(routine) => self.run_routine(robot, *routine),
            Action::SayText(text) => robot.say_text(text),
        };
        if let Err(e) = result {
            warn!("{} failed: {}", action, e);
        }
        self.runs += 1;
        true
    }

    fn run_routine(&mut self, robot: &mut dyn Robot, routine: Routine) -> Result<(), RobotError> {
        match routine {
            Routine::ConnectToCube => robot.connect_cube(),
            Routine::FlashCubeLights => robot.flash_cube_lights(),
            Routine::PickUpCube => match robot.connected_cube() {
                Some(cube) => robot.pickup_object(cube, MANIPULATION_RETRIES),
                None => {
                    debug!("No cube connected, skipping pick up");
                    Ok(())
                }
            },
            Routine::RollCube => match robot.connected_cube() {
                Some(cube) => robot.roll_cube(cube, MANIPULATION_RETRIES),
                None => {
                    debug!("No cube connected, skipping roll");
                    Ok(())
                }
            },
            Routine::PutCubeDown => {
                if robot.connected_cube().is_some() {
                    robot.place_object_on_ground_here(MANIPULATION_RETRIES)
                } else {
                    debug!("No cube connected, skipping put down");
                    Ok(())
                }
            }
            Routine::DriveToCharger => robot.drive_on_charger(),
            Routine::SavePose => {
                let pose = robot.pose()?;
                debug!("Saved pose {:?}", pose);
                self.saved_pose = Some(pose);
                Ok(())
            }
            Routine::GoToSavedPose => match self.saved_pose {
                Some(pose) => robot.go_to_pose(pose),
                None => {
                    warn!("No pose saved yet, nothing to go to");
                    Ok(())
                }
            },
        }
    }
}
