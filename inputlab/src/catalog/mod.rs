//! Static table of detectable actions.
//!
//! Every action type is a bundle of pure predicates plus metadata. The table order is the
//! order detection evaluates types in, and `ActionKind` discriminants index into it.

mod air;
mod ground;
pub mod helpers;
mod ledge;
mod special;

use serde::{Deserialize, Serialize};

use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::player::{ActionState, PlayerState};
use crate::settings::{TimingSettings, Tuning};

/// Everything a predicate may look at besides the input and base action.
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub player: &'a PlayerState,
    pub tuning: &'a Tuning,
    pub polls_per_frame: u32,
}

impl<'a> Ctx<'a> {
    pub fn new(player: &'a PlayerState, tuning: &'a Tuning, polls_per_frame: u32) -> Self {
        Self {
            player,
            tuning,
            polls_per_frame: polls_per_frame.max(1),
        }
    }

    pub fn frames_to_polls(&self, frames: f32) -> usize {
        (frames * self.polls_per_frame as f32).max(0.0) as usize
    }

    pub fn frame_min(&self, poll_delta: usize, min: f32) -> bool {
        poll_delta >= self.frames_to_polls(min)
    }

    pub fn frame_max(&self, poll_delta: usize, max: f32) -> bool {
        poll_delta <= self.frames_to_polls(max)
    }

    pub fn frame_range(&self, poll_delta: usize, min: f32, max: f32) -> bool {
        self.frame_min(poll_delta, min) && self.frame_max(poll_delta, max)
    }
}

pub type BasePredicate = fn(&ActionEntry) -> bool;
pub type StatePredicate = fn(&Ctx<'_>, Option<&ActionEntry>, usize) -> bool;
pub type InputPredicate = fn(&Ctx<'_>, &ProcessedInput) -> u32;
pub type BaseInputPredicate = fn(&Ctx<'_>, &ProcessedInput, Option<&ActionEntry>) -> u32;
pub type SuccessPredicate = fn(&Ctx<'_>, Option<ActionState>) -> bool;
pub type EndPredicate = fn(&Ctx<'_>) -> bool;
pub type Formatter = fn(&ActionEntry, Option<&ActionEntry>) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDelay {
    Immediate,
    /// Stays usable for the configured act-out window after ending.
    ActOut,
}

impl EndDelay {
    pub fn frames(self, timing: &TimingSettings) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::ActOut => timing.act_out_window,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionType {
    pub kind: ActionKind,
    pub name: &'static str,
    /// Only detected when a base action is found.
    pub needs_base: bool,
    /// A repeat within the plink window skips the state check and base requirement.
    pub plinkable: bool,
    /// Usable as a base and displayed only once confirmed successful.
    pub must_succeed: bool,
    /// Tracked but never displayed.
    pub hidden: bool,
    /// Frames to keep checking for success.
    pub success_window: u32,
    pub end_delay: EndDelay,
    /// Appended automatically when the player enters this state.
    pub on_action_state: Option<ActionState>,
    pub is_base_action: Option<BasePredicate>,
    pub state_predicate: Option<StatePredicate>,
    /// Returns a mask with one bit per input method that fired.
    pub input_predicate: Option<InputPredicate>,
    pub base_input_predicate: Option<BaseInputPredicate>,
    /// `new_state` is `None` when the frame caused no state change.
    pub success_predicate: Option<SuccessPredicate>,
    pub end_predicate: Option<EndPredicate>,
    pub format_description: Option<Formatter>,
    /// Display names for the bits of the input mask.
    pub input_names: &'static [Option<&'static str>],
}

impl ActionType {
    pub const fn new(kind: ActionKind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            needs_base: false,
            plinkable: false,
            must_succeed: false,
            hidden: false,
            success_window: 1,
            end_delay: EndDelay::Immediate,
            on_action_state: None,
            is_base_action: None,
            state_predicate: None,
            input_predicate: None,
            base_input_predicate: None,
            success_predicate: None,
            end_predicate: None,
            format_description: None,
            input_names: &[None],
        }
    }

    pub fn input_name(&self, input_type: u8) -> Option<&'static str> {
        self.input_names
            .get(usize::from(input_type))
            .copied()
            .flatten()
    }
}

/// Action kinds in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    DoocStart,
    Turn,
    Pivot,
    EmptyPivot,
    Dash,
    Dashback,
    SlowDashback,
    Run,
    RunBrake,
    Squat,
    SquatWait,
    SquatRv,
    DoubleJump,
    Multijump,
    Jump,
    Nair,
    Fair,
    Bair,
    Uair,
    Dair,
    FSmash,
    USmash,
    DSmash,
    FTilt,
    UTilt,
    DTilt,
    Grab,
    AirDodge,
    Shine,
    ShineTurn,
    NeutralB,
    SideB,
    UpB,
    DownB,
    CliffCatch,
    CliffWait,
    LedgeAttack,
    LedgeRoll,
    LedgeJump,
    LedgeStand,
    LedgeFall,
}

impl ActionKind {
    pub const COUNT: usize = 41;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn action_type(self) -> &'static ActionType {
        &CATALOG[self.index()]
    }
}

pub static CATALOG: [ActionType; ActionKind::COUNT] = [
    ground::DOOC_START,
    ground::TURN,
    ground::PIVOT,
    ground::EMPTY_PIVOT,
    ground::DASH,
    ground::DASHBACK,
    ground::SLOW_DASHBACK,
    ground::RUN,
    ground::RUN_BRAKE,
    ground::SQUAT,
    ground::SQUAT_WAIT,
    ground::SQUAT_RV,
    air::DOUBLE_JUMP,
    air::MULTIJUMP,
    ground::JUMP,
    air::NAIR,
    air::FAIR,
    air::BAIR,
    air::UAIR,
    air::DAIR,
    ground::FSMASH,
    ground::USMASH,
    ground::DSMASH,
    ground::FTILT,
    ground::UTILT,
    ground::DTILT,
    ground::GRAB,
    air::AIR_DODGE,
    special::SHINE,
    special::SHINE_TURN,
    special::NEUTRAL_B,
    special::SIDE_B,
    special::UP_B,
    special::DOWN_B,
    ledge::CLIFF_CATCH,
    ledge::CLIFF_WAIT,
    ledge::LEDGE_ATTACK,
    ledge::LEDGE_ROLL,
    ledge::LEDGE_JUMP,
    ledge::LEDGE_STAND,
    ledge::LEDGE_FALL,
];

/// Packs booleans into a mask, first argument in bit 0.
pub fn mask(bits: &[bool]) -> u32 {
    bits.iter()
        .enumerate()
        .fold(0, |acc, (bit, &set)| if set { acc | (1 << bit) } else { acc })
}
