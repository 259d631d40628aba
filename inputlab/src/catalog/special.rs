//! Shine and the four special move families.

use super::helpers::{btilt_input, is_air_base, is_airborne, is_ground_base, is_grounded, special_input};
use super::{ActionKind, ActionType, Ctx, EndDelay, mask};
use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::player::{ActionState, SpecialKind, character, state};

use ActionKind::*;

fn is_spacie(ctx: &Ctx<'_>) -> bool {
    ctx.player.is_character(&[character::FOX, character::FALCO])
}

fn ground_or_air_base(entry: &ActionEntry) -> bool {
    is_ground_base(entry) || is_air_base(entry)
}

fn in_shine(ctx: &Ctx<'_>) -> bool {
    ctx.player
        .in_state_range(state::FOX_SPECIAL_LW_START, state::FOX_SPECIAL_AIR_LW_TURN)
}

fn shine_end(ctx: &Ctx<'_>) -> bool {
    !in_shine(ctx)
}

// Shine

fn shine_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_spacie(ctx) && (is_grounded(ctx.player, None) || is_airborne(ctx.player, base))
}

fn shine_input(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> u32 {
    mask(&[special_input(ctx, input, base) == SpecialKind::Down])
}

fn shine_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state == Some(state::FOX_SPECIAL_LW_START) || new_state == Some(state::FOX_SPECIAL_AIR_LW_START)
}

pub const SHINE: ActionType = ActionType {
    is_base_action: Some(ground_or_air_base),
    state_predicate: Some(shine_state),
    base_input_predicate: Some(shine_input),
    success_predicate: Some(shine_success),
    end_predicate: Some(shine_end),
    ..ActionType::new(Shine, "Shine")
};

// Shine turn

fn shine_turn_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[Shine, ShineTurn])
}

fn shine_turn_state(ctx: &Ctx<'_>, _base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    is_spacie(ctx)
        && !ctx
            .player
            .in_state(&[state::FOX_SPECIAL_LW_END, state::FOX_SPECIAL_AIR_LW_END])
        && ctx.frame_min(poll_delta, 3.0)
}

fn shine_turn_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[btilt_input(ctx, input)])
}

fn shine_turn_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state == Some(state::FOX_SPECIAL_LW_TURN) || new_state == Some(state::FOX_SPECIAL_AIR_LW_TURN)
}

pub const SHINE_TURN: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(shine_turn_base),
    state_predicate: Some(shine_turn_state),
    input_predicate: Some(shine_turn_input),
    success_predicate: Some(shine_turn_success),
    end_predicate: Some(shine_end),
    ..ActionType::new(ShineTurn, "Shine Turn")
};

// Specials, one type per family. Const generics only take integers, so families are
// passed as codes.

const NEUTRAL: u8 = 0;
const SIDE: u8 = 1;
const UP: u8 = 2;
const DOWN: u8 = 3;

const fn family(code: u8) -> SpecialKind {
    match code {
        NEUTRAL => SpecialKind::Neutral,
        SIDE => SpecialKind::Side,
        UP => SpecialKind::Up,
        DOWN => SpecialKind::Down,
        _ => SpecialKind::None,
    }
}

fn special_state<const FAMILY: u8>(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    // Spacie down B is tracked as Shine.
    if FAMILY == DOWN && is_spacie(ctx) {
        return false;
    }
    is_grounded(ctx.player, base) || is_airborne(ctx.player, base)
}

fn special_press<const FAMILY: u8>(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> u32 {
    mask(&[special_input(ctx, input, base) == family(FAMILY)])
}

fn special_success<const FAMILY: u8>(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state.is_some_and(|s| ctx.player.special_kind(s) == family(FAMILY))
}

fn special_end<const FAMILY: u8>(ctx: &Ctx<'_>) -> bool {
    ctx.player.special_kind(ctx.player.action_state) != family(FAMILY)
}

const fn special<const FAMILY: u8>(kind: ActionKind, name: &'static str) -> ActionType {
    ActionType {
        end_delay: EndDelay::ActOut,
        is_base_action: Some(ground_or_air_base),
        state_predicate: Some(special_state::<FAMILY>),
        base_input_predicate: Some(special_press::<FAMILY>),
        success_predicate: Some(special_success::<FAMILY>),
        end_predicate: Some(special_end::<FAMILY>),
        ..ActionType::new(kind, name)
    }
}

pub const NEUTRAL_B: ActionType = special::<NEUTRAL>(NeutralB, "Neutral B");
pub const SIDE_B: ActionType = special::<SIDE>(SideB, "Side B");
pub const UP_B: ActionType = special::<UP>(UpB, "Up B");
pub const DOWN_B: ActionType = special::<DOWN>(DownB, "Down B");
