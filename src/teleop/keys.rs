// Browser keyCode values understood by the controller
//
// Letters and digits use their uppercase ASCII codes, as the page reports them.

pub const KEY_DRIVE_FORWARD: u32 = b'W' as u32;
pub const KEY_DRIVE_BACK: u32 = b'S' as u32;
pub const KEY_TURN_LEFT: u32 = b'A' as u32;
pub const KEY_TURN_RIGHT: u32 = b'D' as u32;

pub const KEY_LIFT_UP: u32 = b'R' as u32;
pub const KEY_LIFT_DOWN: u32 = b'F' as u32;

pub const KEY_HEAD_UP: u32 = b'T' as u32;
pub const KEY_HEAD_DOWN: u32 = b'G' as u32;

pub const KEY_SAY_TEXT: u32 = b' ' as u32;

/// Handled by the client: toggles free play on release
pub const KEY_FREEPLAY: u32 = b'P' as u32;

/// Numeric keys '1'..='8' bound to routine slots
pub const KEY_SLOT_FIRST: u32 = b'1' as u32;
pub const SLOT_COUNT: usize = 8;

/// Slot index (0-based) for a numeric key code, if it is one of the slot keys
pub fn slot_for_key(key_code: u32) -> Option<usize> {
    let slot = key_code.checked_sub(KEY_SLOT_FIRST)? as usize;
    (slot < SLOT_COUNT).then_some(slot)
}
