use serde::{Deserialize, Serialize};

use crate::pad::{PadStatus, Vec2, button};
use crate::player::PlayerState;

/// One poll seen relative to the buttons the player held on the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessedInput {
    pub buttons: u32,
    pub pressed: u32,
    pub released: u32,
    pub stick: Vec2,
    pub cstick: Vec2,
}

impl ProcessedInput {
    pub fn new(player: &PlayerState, status: &PadStatus, lr_deadzone: f32) -> Self {
        let mut buttons = status.buttons;

        if buttons & button::Z != 0 {
            buttons |= button::ANALOG_LR | button::A;
        }

        if status.trigger() >= lr_deadzone {
            buttons |= button::ANALOG_LR;
        }

        let changed = buttons ^ player.input.held_buttons;

        Self {
            buttons,
            pressed: changed & buttons,
            released: changed & !buttons,
            stick: status.stick,
            cstick: status.cstick,
        }
    }

    pub fn is_pressed(&self, mask: u32) -> bool {
        self.pressed & mask != 0
    }

    pub fn all_pressed(&self, mask: u32) -> bool {
        self.pressed & mask == mask
    }

    pub fn is_held(&self, mask: u32) -> bool {
        self.buttons & mask != 0
    }
}
