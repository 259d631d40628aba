//! Read-only view of the host simulation's player, refreshed once per frame.
//!
//! Identifiers and timing constants here are owned by the host game. The detection
//! engine only queries them.

use serde::{Deserialize, Serialize};

use crate::pad::Vec2;

pub type ActionState = i32;
pub type CharacterId = u32;

pub mod state {
    use super::ActionState;

    pub const WAIT: ActionState = 14;
    pub const TURN: ActionState = 18;
    pub const DASH: ActionState = 20;
    pub const RUN: ActionState = 21;
    pub const RUN_BRAKE: ActionState = 23;
    pub const KNEE_BEND: ActionState = 24;
    pub const JUMP_AERIAL_F: ActionState = 27;
    pub const JUMP_AERIAL_B: ActionState = 28;
    pub const FALL: ActionState = 29;
    pub const SQUAT: ActionState = 39;
    pub const SQUAT_WAIT: ActionState = 40;
    pub const SQUAT_RV: ActionState = 41;
    pub const LANDING_FALL_SPECIAL: ActionState = 43;
    pub const ATTACK_S3_HI: ActionState = 51;
    pub const ATTACK_S3_LW: ActionState = 55;
    pub const ATTACK_HI3: ActionState = 56;
    pub const ATTACK_LW3: ActionState = 57;
    pub const ATTACK_S4_HI: ActionState = 58;
    pub const ATTACK_S4_LW: ActionState = 62;
    pub const ATTACK_HI4: ActionState = 63;
    pub const ATTACK_LW4: ActionState = 64;
    pub const ATTACK_AIR_N: ActionState = 65;
    pub const ATTACK_AIR_F: ActionState = 66;
    pub const ATTACK_AIR_B: ActionState = 67;
    pub const ATTACK_AIR_HI: ActionState = 68;
    pub const ATTACK_AIR_LW: ActionState = 69;
    pub const DOWN_BOUND_U: ActionState = 183;
    pub const DOWN_DAMAGE_U: ActionState = 185;
    pub const DOWN_BOUND_D: ActionState = 191;
    pub const DOWN_DAMAGE_D: ActionState = 193;
    pub const CATCH: ActionState = 212;
    pub const CATCH_DASH: ActionState = 214;
    pub const CATCH_CUT: ActionState = 218;
    pub const ESCAPE_AIR: ActionState = 236;
    pub const CLIFF_CATCH: ActionState = 252;
    pub const CLIFF_WAIT: ActionState = 253;
    pub const CLIFF_CLIMB_SLOW: ActionState = 254;
    pub const CLIFF_CLIMB_QUICK: ActionState = 255;
    pub const CLIFF_ATTACK_SLOW: ActionState = 256;
    pub const CLIFF_ATTACK_QUICK: ActionState = 257;
    pub const CLIFF_ESCAPE_SLOW: ActionState = 258;
    pub const CLIFF_ESCAPE_QUICK: ActionState = 259;
    pub const CLIFF_JUMP_SLOW1: ActionState = 260;
    pub const CLIFF_JUMP_QUICK2: ActionState = 263;

    pub const FOX_SPECIAL_LW_START: ActionState = 360;
    pub const FOX_SPECIAL_LW_END: ActionState = 363;
    pub const FOX_SPECIAL_AIR_LW_START: ActionState = 364;
    pub const FOX_SPECIAL_AIR_LW_END: ActionState = 367;
    pub const FOX_SPECIAL_LW_TURN: ActionState = 368;
    pub const FOX_SPECIAL_AIR_LW_TURN: ActionState = 369;
}

pub mod character {
    use super::CharacterId;

    pub const MARIO: CharacterId = 0;
    pub const FOX: CharacterId = 1;
    pub const CAPTAIN_FALCON: CharacterId = 2;
    pub const KIRBY: CharacterId = 4;
    pub const PEACH: CharacterId = 9;
    pub const JIGGLYPUFF: CharacterId = 15;
    pub const MARTH: CharacterId = 18;
    pub const FALCO: CharacterId = 22;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialKind {
    #[default]
    None,
    Neutral,
    Side,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialState {
    pub state: ActionState,
    pub kind: SpecialKind,
}

/// Consecutive action states a multi-jump character cycles through for aerial jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultijumpStats {
    pub start_state: Option<ActionState>,
    pub start_state_helmet: Option<ActionState>,
    pub state_count: i32,
    /// Frames before another aerial jump can be buffered.
    pub cooldown: u32,
}

impl MultijumpStats {
    pub fn contains(&self, state: ActionState) -> bool {
        let in_run = |start: Option<ActionState>| {
            start.is_some_and(|start| state >= start && state < start + self.state_count)
        };
        in_run(self.start_state) || in_run(self.start_state_helmet)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub jumpsquat: u32,
    pub tilt_turn_frames: u32,
    pub jumps: u32,
    /// Frames of initial dash before a run can start.
    pub initial_dash: u32,
    /// Length of the crouch-entry animation.
    pub squat_frames: f32,
    #[serde(default)]
    pub multijump: Option<MultijumpStats>,
    #[serde(default)]
    pub specials: Vec<SpecialState>,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            jumpsquat: 3,
            tilt_turn_frames: 5,
            jumps: 2,
            initial_dash: 11,
            squat_frames: 7.0,
            multijump: None,
            specials: Vec::new(),
        }
    }
}

/// The player's input as the simulation consumed it on the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub stick: Vec2,
    pub cstick: Vec2,
    pub held_buttons: u32,
    pub stick_x_hold_time: u32,
    pub stick_y_hold_time: u32,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            stick: Vec2::ZERO,
            cstick: Vec2::ZERO,
            held_buttons: 0,
            stick_x_hold_time: 0xFE,
            stick_y_hold_time: 0xFE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub port: u8,
    pub character: CharacterId,
    pub action_state: ActionState,
    pub airborne: bool,
    /// 1.0 facing right, -1.0 facing left.
    pub direction: f32,
    pub input: PlayerInput,
    #[serde(default)]
    pub jumps_used: u32,
    #[serde(default)]
    pub iasa: bool,
    #[serde(default)]
    pub tilt_turn_timer: f32,
    #[serde(default)]
    pub is_cpu: bool,
    #[serde(default = "default_update_inputs")]
    pub update_inputs: bool,
    #[serde(default)]
    pub stats: CharacterStats,
}

fn default_update_inputs() -> bool {
    true
}

impl PlayerState {
    pub fn new(port: u8, character: CharacterId, action_state: ActionState) -> Self {
        Self {
            port,
            character,
            action_state,
            airborne: false,
            direction: 1.0,
            input: PlayerInput::default(),
            jumps_used: 0,
            iasa: false,
            tilt_turn_timer: 0.0,
            is_cpu: false,
            update_inputs: true,
            stats: CharacterStats::default(),
        }
    }

    pub fn is_human_controlled(&self) -> bool {
        !self.is_cpu && self.update_inputs
    }

    pub fn in_state(&self, states: &[ActionState]) -> bool {
        states.contains(&self.action_state)
    }

    pub fn in_state_range(&self, start: ActionState, end: ActionState) -> bool {
        (start..=end).contains(&self.action_state)
    }

    pub fn is_character(&self, characters: &[CharacterId]) -> bool {
        characters.contains(&self.character)
    }

    pub fn has_multijump(&self) -> bool {
        self.stats.multijump.is_some()
    }

    pub fn is_multijump_state(&self, state: ActionState) -> bool {
        self.stats
            .multijump
            .is_some_and(|stats| stats.contains(state))
    }

    pub fn in_multijump_state(&self) -> bool {
        self.is_multijump_state(self.action_state)
    }

    pub fn multijump_cooldown(&self) -> u32 {
        self.stats.multijump.map_or(0, |stats| stats.cooldown)
    }

    pub fn has_jump_left(&self) -> bool {
        self.jumps_used < self.stats.jumps
    }

    /// Which special move family an action state belongs to for this character.
    pub fn special_kind(&self, state: ActionState) -> SpecialKind {
        self.stats
            .specials
            .iter()
            .find(|special| special.state == state)
            .map_or(SpecialKind::None, |special| special.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multijump_ranges_include_helmet_variant() {
        let stats = MultijumpStats {
            start_state: Some(341),
            start_state_helmet: Some(346),
            state_count: 5,
            cooldown: 8,
        };
        assert!(stats.contains(341));
        assert!(stats.contains(345));
        assert!(stats.contains(350));
        assert!(!stats.contains(351));
        assert!(!stats.contains(340));
    }

    #[test]
    fn cpu_or_frozen_players_are_not_tracked() {
        let mut player = PlayerState::new(0, character::FOX, state::TURN);
        assert!(player.is_human_controlled());

        player.is_cpu = true;
        assert!(!player.is_human_controlled());

        player.is_cpu = false;
        player.update_inputs = false;
        assert!(!player.is_human_controlled());
    }

    #[test]
    fn special_kind_lookup_defaults_to_none() {
        let mut player = PlayerState::new(1, character::MARTH, 14);
        player.stats.specials.push(SpecialState {
            state: 350,
            kind: SpecialKind::Up,
        });
        assert_eq!(player.special_kind(350), SpecialKind::Up);
        assert_eq!(player.special_kind(351), SpecialKind::None);
    }
}
