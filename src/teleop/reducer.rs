// Key-intent reducer
//
// Turns key-down/key-up transitions into continuous motor setpoints (drive,
// lift, head) and one-shot actions queued for the periodic tick.

use tracing::{debug, info, warn};

use super::keys::{
    KEY_DRIVE_BACK, KEY_DRIVE_FORWARD, KEY_HEAD_DOWN, KEY_HEAD_UP, KEY_LIFT_DOWN, KEY_LIFT_UP,
    KEY_SAY_TEXT, KEY_TURN_LEFT, KEY_TURN_RIGHT, SLOT_COUNT, slot_for_key,
};
use super::queue::ActionQueue;
use super::routines::{Action, Routine, RoutineRunner};
use crate::config::{ACTION_QUEUE_CAPACITY, DEFAULT_SAY_TEXT};
use crate::messages::{KeyMessage, WheelSetpoint};
use crate::robot::Robot;

/// Routine bound to each numeric key, '1' first
pub const DEFAULT_SLOTS: [Routine; SLOT_COUNT] = [
    Routine::ConnectToCube,   // 1
    Routine::FlashCubeLights, // 2
    Routine::PickUpCube,      // 3
    Routine::PutCubeDown,     // 4
    Routine::RollCube,        // 5
    Routine::DriveToCharger,  // 6
    Routine::SavePose,        // 7
    Routine::GoToSavedPose,   // 8
];

/// Speed selected from the shift (fast) and alt (slow) modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    Fast,
    Mid,
    Slow,
}

impl SpeedTier {
    /// Holding both modifiers cancels out to mid
    pub fn from_modifiers(go_fast: bool, go_slow: bool) -> Self {
        match (go_fast, go_slow) {
            (true, false) => SpeedTier::Fast,
            (false, true) => SpeedTier::Slow,
            _ => SpeedTier::Mid,
        }
    }

    pub fn pick(self, fast: f32, mid: f32, slow: f32) -> f32 {
        match self {
            SpeedTier::Fast => fast,
            SpeedTier::Mid => mid,
            SpeedTier::Slow => slow,
        }
    }
}

/// Held keys, modifiers, and the last setpoint sent on each axis
#[derive(Debug, Clone, Default)]
pub struct KeyIntentState {
    pub drive_forward: bool,
    pub drive_back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub lift_up: bool,
    pub lift_down: bool,
    pub head_up: bool,
    pub head_down: bool,
    pub go_fast: bool,
    pub go_slow: bool,

    // None until the first command on that axis, so a zero can still be sent
    last_lift: Option<f32>,
    last_head: Option<f32>,
    last_wheels: Option<WheelSetpoint>,
}

// +1 / 0 / -1 from a pair of opposing keys
fn key_axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

impl KeyIntentState {
    pub fn speed_tier(&self) -> SpeedTier {
        SpeedTier::from_modifiers(self.go_fast, self.go_slow)
    }

    /// Apply a drive key; returns true if the key belongs to the drive axis
    fn apply_drive_key(&mut self, key_code: u32, is_down: bool) -> bool {
        let flag = match key_code {
            KEY_DRIVE_FORWARD => &mut self.drive_forward,
            KEY_DRIVE_BACK => &mut self.drive_back,
            KEY_TURN_LEFT => &mut self.turn_left,
            KEY_TURN_RIGHT => &mut self.turn_right,
            _ => return false,
        };
        *flag = is_down;
        true
    }

    fn apply_lift_key(&mut self, key_code: u32, is_down: bool) -> bool {
        let flag = match key_code {
            KEY_LIFT_UP => &mut self.lift_up,
            KEY_LIFT_DOWN => &mut self.lift_down,
            _ => return false,
        };
        *flag = is_down;
        true
    }

    fn apply_head_key(&mut self, key_code: u32, is_down: bool) -> bool {
        let flag = match key_code {
            KEY_HEAD_UP => &mut self.head_up,
            KEY_HEAD_DOWN => &mut self.head_down,
            _ => return false,
        };
        *flag = is_down;
        true
    }

    /// Wheel setpoint for the current drive keys and speed tier
    pub fn wheel_setpoint(&self) -> WheelSetpoint {
        let tier = self.speed_tier();
        let drive_dir = key_axis(self.drive_forward, self.drive_back);
        let mut turn_dir = key_axis(self.turn_right, self.turn_left);
        if drive_dir < 0.0 {
            // Turning feels reversed when backing up
            turn_dir = -turn_dir;
        }

        let forward_speed = tier.pick(150.0, 75.0, 50.0);
        let turn_speed = tier.pick(100.0, 50.0, 30.0);

        let left = drive_dir * forward_speed + turn_speed * turn_dir;
        let right = drive_dir * forward_speed - turn_speed * turn_dir;
        WheelSetpoint::new(left, right)
    }

    pub fn lift_speed(&self) -> f32 {
        key_axis(self.lift_up, self.lift_down) * self.speed_tier().pick(8.0, 4.0, 2.0)
    }

    pub fn head_speed(&self) -> f32 {
        key_axis(self.head_up, self.head_down) * self.speed_tier().pick(2.0, 1.0, 0.5)
    }
}

/// One teleop session: key state, routine bindings, and pending actions
pub struct RemoteControl<R> {
    robot: R,
    state: KeyIntentState,
    slots: [Routine; SLOT_COUNT],
    queue: ActionQueue<Action>,
    runner: RoutineRunner,
    say_text: String,
}

impl<R: Robot> RemoteControl<R> {
    pub fn new(robot: R) -> Self {
        Self::with_say_text(robot, DEFAULT_SAY_TEXT)
    }

    pub fn with_say_text(robot: R, say_text: impl Into<String>) -> Self {
        Self {
            robot,
            state: KeyIntentState::default(),
            slots: DEFAULT_SLOTS,
            queue: ActionQueue::new(ACTION_QUEUE_CAPACITY),
            runner: RoutineRunner::new(),
            say_text: say_text.into(),
        }
    }

    pub fn handle_key_message(&mut self, msg: &KeyMessage) {
        self.handle_key(msg.key_code, msg.has_shift, msg.has_alt, msg.is_down);
    }

    /// Called on any key press or release
    ///
    /// Holding a key may produce repeated calls with `is_down == true`.
    pub fn handle_key(&mut self, key_code: u32, shift_held: bool, alt_held: bool, is_down: bool) {
        let speed_changed = self.state.go_fast != shift_held || self.state.go_slow != alt_held;
        self.state.go_fast = shift_held;
        self.state.go_slow = alt_held;

        // Speed affects every axis even when no axis key changed
        let update_driving = self.state.apply_drive_key(key_code, is_down) || speed_changed;
        let update_lift = self.state.apply_lift_key(key_code, is_down) || speed_changed;
        let update_head = self.state.apply_head_key(key_code, is_down) || speed_changed;

        if update_driving {
            self.update_driving();
        }
        if update_head {
            self.update_head();
        }
        if update_lift {
            self.update_lift();
        }

        // End of a key click
        if !is_down {
            if let Some(slot) = slot_for_key(key_code) {
                self.queue_action(Action::Routine(self.slots[slot]));
            } else if key_code == KEY_SAY_TEXT {
                self.queue_action(Action::SayText(self.say_text.clone()));
            }
        }
    }

    /// Try to run the next queued action; at most one per call
    ///
    /// Returns true if an action was attempted.
    pub fn update(&mut self) -> bool {
        let Some(action) = self.queue.front().cloned() else {
            return false;
        };
        if self.runner.run(&mut self.robot, &action) {
            self.queue.pop();
        }
        true
    }

    fn queue_action(&mut self, action: Action) {
        debug!("Queueing {}", action);
        if let Some(dropped) = self.queue.push(action) {
            warn!("Action queue full, dropped {}", dropped);
        }
    }

    fn update_driving(&mut self) {
        let wheels = self.state.wheel_setpoint();
        if self.state.last_wheels == Some(wheels) {
            return;
        }
        self.state.last_wheels = Some(wheels);
        if let Err(e) = self.robot.set_wheel_motors(wheels) {
            warn!("Failed to set wheel motors: {}", e);
        }
    }

    fn update_lift(&mut self) {
        let speed = self.state.lift_speed();
        if self.state.last_lift == Some(speed) {
            return;
        }
        self.state.last_lift = Some(speed);
        if let Err(e) = self.robot.set_lift_motor(speed) {
            warn!("Failed to set lift motor: {}", e);
        }
    }

    fn update_head(&mut self) {
        let speed = self.state.head_speed();
        if self.state.last_head == Some(speed) {
            return;
        }
        self.state.last_head = Some(speed);
        if let Err(e) = self.robot.set_head_motor(speed) {
            warn!("Failed to set head motor: {}", e);
        }
    }

    /// Bind numeric key `key` (1..=8) to a routine
    pub fn select_routine(&mut self, key: u8, routine: Routine) {
        match (key as usize).checked_sub(1).filter(|&slot| slot < SLOT_COUNT) {
            Some(slot) => {
                info!("Key {} now runs {}", key, routine);
                self.slots[slot] = routine;
            }
            None => warn!("No routine slot for key {}, ignoring", key),
        }
    }

    /// Bind a key by routine name; unknown names are logged and ignored
    pub fn select_routine_named(&mut self, key: u8, name: &str) {
        match name.parse::<Routine>() {
            Ok(routine) => self.select_routine(key, routine),
            Err(e) => warn!("{}, key {} unchanged", e, key),
        }
    }

    pub fn set_say_text(&mut self, text: impl Into<String>) {
        self.say_text = text.into();
        debug!("Say text set to {:?}", self.say_text);
    }

    /// Free play hands the robot back to its own behaviours
    pub fn set_freeplay(&mut self, enabled: bool) {
        info!("Free play {}", if enabled { "enabled" } else { "disabled" });
        let result = if enabled {
            self.robot.release_control()
        } else {
            self.robot.request_control()
        };
        if let Err(e) = result {
            warn!("Failed to change free play: {}", e);
        }
    }

    pub fn queued_actions(&self) -> usize {
        self.queue.len()
    }

    pub fn routine_runs(&self) -> u64 {
        self.runner.runs()
    }

    #[cfg(test)]
    pub(crate) fn say_text(&self) -> &str {
        &self.say_text
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[Routine; SLOT_COUNT] {
        &self.slots
    }

    #[cfg(test)]
    pub(crate) fn pending_actions(&self) -> impl Iterator<Item = &Action> {
        self.queue.iter()
    }

    #[cfg(test)]
    pub(crate) fn robot(&self) -> &R {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut R {
        &mut self.robot
    }
}
