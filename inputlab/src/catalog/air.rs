//! Aerial jumps, aerial attacks and air dodges.

use super::helpers::{aerial_input, format_coord, is_air_base, is_airborne, usmash_instant, usmash_region};
use super::{ActionKind, ActionType, Ctx, EndDelay, mask};
use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::pad::{Vec2, button, rad_to_deg, stick_angle};
use crate::player::{ActionState, state};

use ActionKind::*;

const JUMP_INPUTS: [&str; 3] = ["X", "Y", "Up"];

fn airborne_end(ctx: &Ctx<'_>) -> bool {
    !is_airborne(ctx.player, None)
}

fn jump_buttons(input: &ProcessedInput, up: bool) -> u32 {
    mask(&[input.is_pressed(button::X), input.is_pressed(button::Y), up])
}

// Double jump

fn double_jump_base(entry: &ActionEntry) -> bool {
    is_air_base(entry) || entry.is_type(&[Shine, ShineTurn])
}

fn double_jump_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    let player = ctx.player;
    is_airborne(player, base) && !player.in_multijump_state() && player.has_jump_left()
}

fn double_jump_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    jump_buttons(input, usmash_instant(ctx, input))
}

fn double_jump_success(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    let Some(new_state) = new_state else {
        return false;
    };
    if ctx.player.has_multijump() {
        ctx.player.is_multijump_state(new_state)
    } else {
        new_state == state::JUMP_AERIAL_F || new_state == state::JUMP_AERIAL_B
    }
}

/// Shows the jump's final stick x relative to facing when it follows a ledge fall.
fn double_jump_description(entry: &ActionEntry, base: Option<&ActionEntry>) -> String {
    let input = JUMP_INPUTS
        .get(usize::from(entry.input_type))
        .copied()
        .unwrap_or("?");

    match (base, entry.final_input) {
        (Some(base), Some(last)) if base.is_type(&[LedgeFall]) => {
            format!("{} {input}", format_coord(last.input.stick.x * last.direction))
        }
        _ => input.to_string(),
    }
}

pub const DOUBLE_JUMP: ActionType = ActionType {
    success_window: 4,
    is_base_action: Some(double_jump_base),
    state_predicate: Some(double_jump_state),
    input_predicate: Some(double_jump_input),
    success_predicate: Some(double_jump_success),
    end_predicate: Some(airborne_end),
    format_description: Some(double_jump_description),
    input_names: &[Some("X"), Some("Y"), Some("Up")],
    ..ActionType::new(DoubleJump, "DJ")
};

// Buffered repeat jumps for multi-jump characters. Held buttons count.

fn any_base(_entry: &ActionEntry) -> bool {
    true
}

fn multijump_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    let player = ctx.player;
    player.in_multijump_state()
        && player.has_jump_left()
        && base.is_some_and(|base| base.is_type(&[DoubleJump, Multijump]))
        && ctx.frame_min(poll_delta, player.multijump_cooldown() as f32)
}

fn multijump_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[
        input.is_held(button::X),
        input.is_held(button::Y),
        usmash_region(ctx, input),
    ])
}

fn multijump_success(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state.is_some_and(|s| ctx.player.is_multijump_state(s))
}

pub const MULTIJUMP: ActionType = ActionType {
    needs_base: true,
    success_window: 4,
    is_base_action: Some(any_base),
    state_predicate: Some(multijump_state),
    input_predicate: Some(multijump_input),
    success_predicate: Some(multijump_success),
    end_predicate: Some(airborne_end),
    input_names: &[Some("X"), Some("Y"), Some("Up")],
    ..ActionType::new(Multijump, "DJ")
};

// Aerial attacks, one type per attack state.

fn aerial_base<const STATE: ActionState>(entry: &ActionEntry) -> bool {
    (STATE == state::ATTACK_AIR_HI && entry.is_type(&[USmash])) || is_air_base(entry)
}

fn aerial_state<const STATE: ActionState>(
    ctx: &Ctx<'_>,
    base: Option<&ActionEntry>,
    poll_delta: usize,
) -> bool {
    if STATE == state::ATTACK_AIR_HI {
        if let Some(base) = base {
            if base.is_type(&[USmash]) {
                return false;
            }

            // A jump-cancelled up smash comes out during jumpsquat.
            let jumpsquat = ctx.player.stats.jumpsquat as f32;
            if base.is_type(&[Jump]) && ctx.frame_max(poll_delta, jumpsquat - 1.0) {
                return false;
            }
        }
    }
    is_airborne(ctx.player, base)
}

fn aerial_attack_input<const STATE: ActionState>(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[aerial_input(ctx, input) == Some(STATE)])
}

fn aerial_success<const STATE: ActionState>(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state == Some(STATE)
}

fn aerial_end<const STATE: ActionState>(ctx: &Ctx<'_>) -> bool {
    ctx.player.action_state != STATE
}

const fn aerial<const STATE: ActionState>(kind: ActionKind, name: &'static str) -> ActionType {
    ActionType {
        end_delay: EndDelay::ActOut,
        is_base_action: Some(aerial_base::<STATE>),
        state_predicate: Some(aerial_state::<STATE>),
        input_predicate: Some(aerial_attack_input::<STATE>),
        success_predicate: Some(aerial_success::<STATE>),
        end_predicate: Some(aerial_end::<STATE>),
        ..ActionType::new(kind, name)
    }
}

pub const NAIR: ActionType = aerial::<{ state::ATTACK_AIR_N }>(Nair, "Nair");
pub const FAIR: ActionType = aerial::<{ state::ATTACK_AIR_F }>(Fair, "Fair");
pub const BAIR: ActionType = aerial::<{ state::ATTACK_AIR_B }>(Bair, "Bair");
pub const UAIR: ActionType = aerial::<{ state::ATTACK_AIR_HI }>(Uair, "Uair");
pub const DAIR: ActionType = aerial::<{ state::ATTACK_AIR_LW }>(Dair, "Dair");

// Air dodge. Plinkable so that L then R within the window counts once.

fn air_dodge_base(entry: &ActionEntry) -> bool {
    is_air_base(entry)
}

fn air_dodge_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_airborne(ctx.player, base)
}

fn air_dodge_input(_ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.is_pressed(button::L), input.is_pressed(button::R)])
}

fn air_dodge_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state == Some(state::ESCAPE_AIR)
}

fn air_dodge_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::ESCAPE_AIR, state::LANDING_FALL_SPECIAL])
}

/// Air dodge angle in degrees from the final stick position, then the trigger used.
fn air_dodge_description(entry: &ActionEntry, _base: Option<&ActionEntry>) -> String {
    let trigger = if entry.input_type == 0 { "L" } else { "R" };
    match entry.final_input {
        Some(last) if last.input.stick != Vec2::ZERO => {
            format!("{:4.1} {trigger}", rad_to_deg(stick_angle(last.input.stick)))
        }
        _ => trigger.to_string(),
    }
}

pub const AIR_DODGE: ActionType = ActionType {
    plinkable: true,
    end_delay: EndDelay::ActOut,
    is_base_action: Some(air_dodge_base),
    state_predicate: Some(air_dodge_state),
    input_predicate: Some(air_dodge_input),
    success_predicate: Some(air_dodge_success),
    end_predicate: Some(air_dodge_end),
    format_description: Some(air_dodge_description),
    input_names: &[Some("L"), Some("R")],
    ..ActionType::new(AirDodge, "Air Dodge")
};
