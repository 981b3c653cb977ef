// Keyboard teleoperation for the robot
//
// Provides:
// - Key-intent reducer (key transitions -> motor setpoints)
// - Bounded queue of one-shot actions, drained one per tick
// - Routine dispatch against the robot

pub mod keys;
mod queue;
mod reducer;
mod routines;

pub use queue::ActionQueue;
pub use reducer::{DEFAULT_SLOTS, KeyIntentState, RemoteControl, SpeedTier};
pub use routines::{Action, Routine, RoutineRunner, UnknownRoutine};
