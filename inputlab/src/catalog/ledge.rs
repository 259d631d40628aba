//! Ledge grabs and the ways off the ledge.

use super::helpers::{
    is_airborne, is_ledge_base, is_on_ledge, ledge_fall_input, ledge_neutral_last_frame,
    ledge_stand_input, usmash_instant,
};
use super::{ActionKind, ActionType, Ctx, mask};
use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::pad::button;
use crate::player::{ActionState, state};

use ActionKind::*;

fn ledge_base(entry: &ActionEntry) -> bool {
    is_ledge_base(entry)
}

fn on_ledge(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_on_ledge(ctx.player, base)
}

fn on_ledge_from_neutral(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_on_ledge(ctx.player, base) && ledge_neutral_last_frame(ctx)
}

// Cliff catch is only ever added when the state is entered.

fn cliff_catch_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::CLIFF_CATCH])
}

pub const CLIFF_CATCH: ActionType = ActionType {
    on_action_state: Some(state::CLIFF_CATCH),
    end_predicate: Some(cliff_catch_end),
    ..ActionType::new(CliffCatch, "Cliff Catch")
};

fn cliff_wait_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[CliffCatch, CliffWait])
}

fn cliff_wait_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    !base.is_some_and(|base| base.is_type(&[CliffWait])) && ctx.player.in_state(&[state::CLIFF_WAIT])
}

fn always(_ctx: &Ctx<'_>, _input: &ProcessedInput) -> u32 {
    mask(&[true])
}

fn always_succeeds(_ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    true
}

fn cliff_wait_end(ctx: &Ctx<'_>) -> bool {
    !is_on_ledge(ctx.player, None)
}

pub const CLIFF_WAIT: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(cliff_wait_base),
    state_predicate: Some(cliff_wait_state),
    input_predicate: Some(always),
    success_predicate: Some(always_succeeds),
    end_predicate: Some(cliff_wait_end),
    ..ActionType::new(CliffWait, "Cliff Wait")
};

fn ledge_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let threshold = ctx.tuning.ledge_attack_cstick_threshold;
    mask(&[
        input.is_pressed(button::A),
        input.is_pressed(button::B),
        input.cstick.y >= threshold && ctx.player.input.cstick.y < threshold,
    ])
}

fn ledge_attack_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    ctx.player
        .in_state(&[state::CLIFF_ATTACK_SLOW, state::CLIFF_ATTACK_QUICK])
}

pub const LEDGE_ATTACK: ActionType = ActionType {
    is_base_action: Some(ledge_base),
    state_predicate: Some(on_ledge),
    input_predicate: Some(ledge_attack_input),
    success_predicate: Some(ledge_attack_success),
    input_names: &[None, None, None],
    ..ActionType::new(LedgeAttack, "Ledge Attack")
};

fn ledge_roll_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let threshold = ctx.tuning.ledge_roll_cstick_threshold;
    let direction = ctx.player.direction;
    let cstick_x = input.cstick.x * direction;
    let last_cstick_x = ctx.player.input.cstick.x * direction;
    mask(&[
        input.is_pressed(button::ANALOG_LR),
        cstick_x >= threshold && last_cstick_x < threshold,
    ])
}

fn ledge_roll_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    ctx.player
        .in_state(&[state::CLIFF_ESCAPE_SLOW, state::CLIFF_ESCAPE_QUICK])
}

pub const LEDGE_ROLL: ActionType = ActionType {
    is_base_action: Some(ledge_base),
    state_predicate: Some(on_ledge),
    input_predicate: Some(ledge_roll_input),
    success_predicate: Some(ledge_roll_success),
    input_names: &[None, None],
    ..ActionType::new(LedgeRoll, "Ledge Roll")
};

fn ledge_jump_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[
        input.is_pressed(button::X),
        input.is_pressed(button::Y),
        usmash_instant(ctx, input),
    ])
}

fn in_ledge_jump(ctx: &Ctx<'_>) -> bool {
    ctx.player
        .in_state_range(state::CLIFF_JUMP_SLOW1, state::CLIFF_JUMP_QUICK2)
}

fn ledge_jump_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    in_ledge_jump(ctx)
}

pub const LEDGE_JUMP: ActionType = ActionType {
    is_base_action: Some(ledge_base),
    state_predicate: Some(on_ledge),
    input_predicate: Some(ledge_jump_input),
    success_predicate: Some(ledge_jump_success),
    input_names: &[None, None, None],
    ..ActionType::new(LedgeJump, "Ledge Jump")
};

fn ledge_stand_stick(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[
        ledge_stand_input(ctx, input.stick),
        ledge_stand_input(ctx, input.cstick),
    ])
}

fn ledge_stand_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    ctx.player
        .in_state(&[state::CLIFF_CLIMB_SLOW, state::CLIFF_CLIMB_QUICK])
}

pub const LEDGE_STAND: ActionType = ActionType {
    is_base_action: Some(ledge_base),
    state_predicate: Some(on_ledge_from_neutral),
    input_predicate: Some(ledge_stand_stick),
    success_predicate: Some(ledge_stand_success),
    input_names: &[None, None],
    ..ActionType::new(LedgeStand, "Ledge Stand")
};

fn ledge_fall_stick(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[
        ledge_fall_input(ctx, input.stick),
        ledge_fall_input(ctx, input.cstick),
    ])
}

fn ledge_fall_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    ctx.player.in_state(&[state::FALL])
}

/// Stays usable through a ledge jump so ledgedashes show the fall as their base.
fn ledge_fall_end(ctx: &Ctx<'_>) -> bool {
    !is_airborne(ctx.player, None) && !in_ledge_jump(ctx)
}

pub const LEDGE_FALL: ActionType = ActionType {
    is_base_action: Some(ledge_base),
    state_predicate: Some(on_ledge_from_neutral),
    input_predicate: Some(ledge_fall_stick),
    success_predicate: Some(ledge_fall_success),
    end_predicate: Some(ledge_fall_end),
    input_names: &[None, None],
    ..ActionType::new(LedgeFall, "Ledge Fall")
};
