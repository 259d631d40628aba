//! Grounded movement, crouching, jumps, smashes, tilts and grabs.

use super::helpers::{
    bsmash_instant, btilt_instant, dbooc_instant, dfooc_instant, dsmash_input, dtilt_input,
    fsmash_instant, ftilt_input, in_squat, is_airborne, is_ground_base, is_grounded,
    stick_x_hold_time, usmash_input, usmash_instant, utilt_input, xsmash_input,
};
use super::{ActionKind, ActionType, Ctx, EndDelay, mask};
use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::pad::{button, stick_angle};
use crate::player::{ActionState, state};

use ActionKind::*;

const JUMP_INPUTS: &[Option<&str>] = &[Some("X"), Some("Y"), Some("Up")];

/// Hold frames after which a crouch dash input is no longer possible.
const DOOC_HOLD_LIMIT: u32 = 3;

fn grounded(ctx: &Ctx<'_>, _base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None)
}

fn entered(new_state: Option<ActionState>, expected: ActionState) -> bool {
    new_state == Some(expected)
}

fn in_dash(ctx: &Ctx<'_>) -> bool {
    ctx.player.in_state(&[state::DASH])
}

fn dash_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::DASH)
}

fn dash_end(ctx: &Ctx<'_>) -> bool {
    !in_dash(ctx)
}

fn squat_end(ctx: &Ctx<'_>) -> bool {
    !in_squat(ctx.player)
}

fn sign_of_base_x(base: &ActionEntry) -> f32 {
    1f32.copysign(base.input.stick.x)
}

fn ground_base(entry: &ActionEntry) -> bool {
    is_ground_base(entry)
}

fn ground_base_or_jump(entry: &ActionEntry) -> bool {
    is_ground_base(entry) || entry.is_type(&[Jump])
}

fn attack_ended(ctx: &Ctx<'_>, first: ActionState, last: ActionState) -> bool {
    ctx.player.iasa || !ctx.player.in_state_range(first, last)
}

// Turn

fn turn_base(entry: &ActionEntry) -> bool {
    is_ground_base(entry) && !entry.is_type(&[Turn, Pivot])
}

fn turn_state(ctx: &Ctx<'_>, _base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None)
        && !ctx.player.in_state(&[state::DASH, state::TURN])
        && !in_squat(ctx.player)
}

fn turn_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[btilt_instant(ctx, input)])
}

fn turn_success(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::TURN) && ctx.player.tilt_turn_timer > 0.0
}

fn turn_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::TURN])
}

pub const TURN: ActionType = ActionType {
    must_succeed: true,
    success_window: 2,
    is_base_action: Some(turn_base),
    state_predicate: Some(turn_state),
    input_predicate: Some(turn_input),
    success_predicate: Some(turn_success),
    end_predicate: Some(turn_end),
    ..ActionType::new(Turn, "Turn")
};

// Pivot

fn pivot_base(entry: &ActionEntry) -> bool {
    turn_base(entry) || entry.is_type(&[SquatRv, DoocStart])
}

fn pivot_state(ctx: &Ctx<'_>, _base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None) && !ctx.player.in_state(&[state::TURN])
}

fn pivot_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    if in_squat(ctx.player) {
        mask(&[dbooc_instant(ctx, input)])
    } else {
        mask(&[bsmash_instant(ctx, input)])
    }
}

fn pivot_success(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::TURN) && ctx.player.tilt_turn_timer <= 0.0
}

fn pivot_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::TURN, state::DASH])
}

pub const PIVOT: ActionType = ActionType {
    success_window: 3,
    is_base_action: Some(pivot_base),
    state_predicate: Some(pivot_state),
    input_predicate: Some(pivot_input),
    success_predicate: Some(pivot_success),
    end_predicate: Some(pivot_end),
    ..ActionType::new(Pivot, "Pivot")
};

// Empty pivot: the stick leaves the smash region within 2 frames of a pivot.

fn empty_pivot_base(entry: &ActionEntry) -> bool {
    !entry.is_type(&[Dashback, SlowDashback])
}

fn empty_pivot_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    base.is_some_and(|base| base.is_type(&[Pivot])) && ctx.frame_max(poll_delta, 2.0)
}

fn empty_pivot_input(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> u32 {
    let Some(base) = base else {
        return 0;
    };
    mask(&[input.stick.x * sign_of_base_x(base) < ctx.tuning.x_smash_threshold])
}

fn empty_pivot_success(ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    ctx.player.in_state(&[state::TURN]) && new_state.is_none()
}

pub const EMPTY_PIVOT: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(empty_pivot_base),
    state_predicate: Some(empty_pivot_state),
    base_input_predicate: Some(empty_pivot_input),
    success_predicate: Some(empty_pivot_success),
    ..ActionType::new(EmptyPivot, "Empty Pivot")
};

// Dash

fn dash_base(entry: &ActionEntry) -> bool {
    is_ground_base(entry) || entry.is_type(&[SquatRv, DoocStart])
}

fn dash_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None) && !base.is_some_and(|base| base.is_type(&[Run, Turn, Pivot]))
}

fn dash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    if in_squat(ctx.player) {
        mask(&[dfooc_instant(ctx, input)])
    } else {
        mask(&[fsmash_instant(ctx, input)])
    }
}

pub const DASH: ActionType = ActionType {
    success_window: 3,
    is_base_action: Some(dash_base),
    state_predicate: Some(dash_state),
    input_predicate: Some(dash_input),
    success_predicate: Some(dash_success),
    end_predicate: Some(dash_end),
    ..ActionType::new(Dash, "Dash")
};

// Dashback after a turn, 1 to 2 frames after the base.

fn dashback_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[Dashback, Turn, Pivot])
}

fn dashback_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    is_grounded(ctx.player, None)
        && !base.is_some_and(|base| base.is_type(&[Dashback]))
        && ctx.frame_range(poll_delta, 1.0, 2.0)
}

fn toward_base_smash(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> u32 {
    let Some(base) = base else {
        return 0;
    };
    mask(&[input.stick.x * sign_of_base_x(base) >= ctx.tuning.x_smash_threshold])
}

pub const DASHBACK: ActionType = ActionType {
    needs_base: true,
    must_succeed: true,
    success_window: 2,
    is_base_action: Some(dashback_base),
    state_predicate: Some(dashback_state),
    base_input_predicate: Some(toward_base_smash),
    success_predicate: Some(dash_success),
    end_predicate: Some(dash_end),
    ..ActionType::new(Dashback, "Dashback")
};

// Dashback once the tilt turn has finished.

fn slow_dashback_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[SlowDashback, Turn, Pivot])
}

fn slow_dashback_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    let delay = (ctx.player.stats.tilt_turn_frames + 1) as f32;
    is_grounded(ctx.player, None)
        && !base.is_some_and(|base| base.is_type(&[SlowDashback]))
        && ctx.frame_range(poll_delta, delay, delay + 1.0)
}

pub const SLOW_DASHBACK: ActionType = ActionType {
    needs_base: true,
    must_succeed: true,
    success_window: 2,
    is_base_action: Some(slow_dashback_base),
    state_predicate: Some(slow_dashback_state),
    base_input_predicate: Some(toward_base_smash),
    success_predicate: Some(dash_success),
    end_predicate: Some(dash_end),
    ..ActionType::new(SlowDashback, "Slow Dashback")
};

// Run

fn any_base(_entry: &ActionEntry) -> bool {
    true
}

fn run_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    base.is_some_and(|base| base.is_type(&[Dash, Dashback, SlowDashback]))
        && ctx.frame_min(poll_delta, ctx.player.stats.initial_dash as f32)
        && in_dash(ctx)
}

fn run_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.stick.x * ctx.player.direction >= ctx.tuning.run_threshold])
}

fn run_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::RUN)
}

fn run_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::RUN])
}

pub const RUN: ActionType = ActionType {
    needs_base: true,
    success_window: 2,
    is_base_action: Some(any_base),
    state_predicate: Some(run_state),
    input_predicate: Some(run_input),
    success_predicate: Some(run_success),
    end_predicate: Some(run_end),
    ..ActionType::new(Run, "Run")
};

// Run brake

fn run_brake_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[Run])
}

fn run_brake_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let direction = ctx.player.direction;
    let threshold = ctx.tuning.run_threshold;
    mask(&[input.stick.x * direction < threshold
        && ctx.player.input.stick.x * direction >= threshold])
}

fn run_brake_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::RUN_BRAKE)
}

fn run_brake_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state(&[state::RUN_BRAKE])
}

pub const RUN_BRAKE: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(run_brake_base),
    state_predicate: Some(grounded),
    input_predicate: Some(run_brake_input),
    success_predicate: Some(run_brake_success),
    end_predicate: Some(run_brake_end),
    ..ActionType::new(RunBrake, "Run Brake")
};

// Crouch

fn squat_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[RunBrake, Squat])
}

fn squat_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    !base.is_some_and(|base| base.is_type(&[Squat])) && ctx.frame_min(poll_delta, 1.0)
}

fn squat_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.stick.y < -ctx.tuning.squat_threshold])
}

fn squat_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::SQUAT)
}

pub const SQUAT: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(squat_base),
    state_predicate: Some(squat_state),
    input_predicate: Some(squat_input),
    success_predicate: Some(squat_success),
    end_predicate: Some(squat_end),
    ..ActionType::new(Squat, "Crouch")
};

// Full crouch

fn squat_wait_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[Squat, SquatWait, DoocStart])
}

fn squat_wait_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, poll_delta: usize) -> bool {
    match base {
        None => ctx.player.in_state(&[state::SQUAT_WAIT]),
        Some(base) if base.is_type(&[SquatWait, DoocStart]) => false,
        Some(_) => ctx.frame_min(poll_delta, ctx.player.stats.squat_frames - 1.0),
    }
}

fn squat_wait_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.stick.y <= -ctx.tuning.max_squatwait_threshold])
}

fn squat_wait_success(ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    ctx.player.in_state(&[state::SQUAT_WAIT])
}

pub const SQUAT_WAIT: ActionType = ActionType {
    is_base_action: Some(squat_wait_base),
    state_predicate: Some(squat_wait_state),
    input_predicate: Some(squat_wait_input),
    success_predicate: Some(squat_wait_success),
    end_predicate: Some(squat_end),
    ..ActionType::new(SquatWait, "Full Crouch")
};

// Uncrouch

fn squat_rv_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[SquatWait, DoocStart, SquatRv, Dash, Dashback, Pivot])
}

fn squat_rv_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    in_squat(ctx.player)
        && !base.is_some_and(|base| base.is_type(&[SquatRv, Dash, Dashback, Pivot]))
}

fn squat_rv_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.stick.y > -ctx.tuning.max_squatwait_threshold])
}

fn squat_rv_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::SQUAT_RV)
}

pub const SQUAT_RV: ActionType = ActionType {
    needs_base: true,
    is_base_action: Some(squat_rv_base),
    state_predicate: Some(squat_rv_state),
    input_predicate: Some(squat_rv_input),
    success_predicate: Some(squat_rv_success),
    end_predicate: Some(squat_end),
    ..ActionType::new(SquatRv, "Uncrouch")
};

// First sideways stick input while crouched. Lets Dash/Pivot/Uncrouch time relative to it.

fn dooc_start_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[DoocStart, SquatRv, Dash, Pivot])
}

fn dooc_start_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    ctx.player.in_state(&[state::SQUAT, state::SQUAT_WAIT])
        && !base.is_some_and(|base| base.is_type(&[SquatRv, Dash, Pivot]))
}

fn dooc_start_input(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> u32 {
    if stick_x_hold_time(ctx, input) >= DOOC_HOLD_LIMIT {
        return 0;
    }
    match base {
        Some(base) => mask(&[input.stick.x * base.input.stick.x < 0.0]),
        None => mask(&[input.stick.x != 0.0]),
    }
}

fn never(_ctx: &Ctx<'_>, _new_state: Option<ActionState>) -> bool {
    false
}

fn dooc_start_end(ctx: &Ctx<'_>) -> bool {
    !in_squat(ctx.player) || ctx.player.input.stick_x_hold_time >= DOOC_HOLD_LIMIT
}

pub const DOOC_START: ActionType = ActionType {
    hidden: true,
    is_base_action: Some(dooc_start_base),
    state_predicate: Some(dooc_start_state),
    base_input_predicate: Some(dooc_start_input),
    success_predicate: Some(never),
    end_predicate: Some(dooc_start_end),
    ..ActionType::new(DoocStart, "DOOC Start")
};

// Jump

fn jump_base(entry: &ActionEntry) -> bool {
    is_ground_base(entry) || entry.is_type(&[Shine, ShineTurn])
}

fn jump_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[
        input.is_pressed(button::X),
        input.is_pressed(button::Y),
        usmash_instant(ctx, input),
    ])
}

fn jump_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::KNEE_BEND)
}

fn jump_end(ctx: &Ctx<'_>) -> bool {
    !is_airborne(ctx.player, None)
}

pub const JUMP: ActionType = ActionType {
    success_window: 4,
    is_base_action: Some(jump_base),
    state_predicate: Some(grounded),
    input_predicate: Some(jump_input),
    success_predicate: Some(jump_success),
    end_predicate: Some(jump_end),
    input_names: JUMP_INPUTS,
    ..ActionType::new(Jump, "Jump")
};

// Smash attacks: bit 0 is stick + A, bit 1 is the c-stick.

fn fsmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let threshold = ctx.tuning.x_smash_threshold;
    let stick = xsmash_input(ctx, input) && input.is_pressed(button::A);
    let cstick = input.cstick.x.abs() >= threshold && ctx.player.input.cstick.x.abs() < threshold;
    mask(&[stick, cstick])
}

fn fsmash_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state.is_some_and(|s| (state::ATTACK_S4_HI..=state::ATTACK_S4_LW).contains(&s))
}

fn fsmash_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_S4_HI, state::ATTACK_S4_LW)
}

pub const FSMASH: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base),
    state_predicate: Some(grounded),
    input_predicate: Some(fsmash_input),
    success_predicate: Some(fsmash_success),
    end_predicate: Some(fsmash_end),
    input_names: &[None, None],
    ..ActionType::new(FSmash, "FSmash")
};

fn usmash_state(ctx: &Ctx<'_>, base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None) || base.is_some_and(|base| base.is_type(&[Jump]))
}

fn usmash_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let threshold = ctx.tuning.usmash_threshold;
    let stick = usmash_input(ctx, input) && input.is_pressed(button::A);
    let cstick = input.cstick.y >= threshold && ctx.player.input.cstick.y < threshold;
    mask(&[stick, cstick])
}

fn usmash_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::ATTACK_HI4)
}

fn usmash_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_HI4, state::ATTACK_HI4)
}

pub const USMASH: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base_or_jump),
    state_predicate: Some(usmash_state),
    input_predicate: Some(usmash_attack_input),
    success_predicate: Some(usmash_success),
    end_predicate: Some(usmash_end),
    input_names: &[None, None],
    ..ActionType::new(USmash, "USmash")
};

fn dsmash_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let threshold = ctx.tuning.dsmash_threshold;
    let stick = dsmash_input(ctx, input) && input.is_pressed(button::A);
    let cstick = input.cstick.y <= threshold && ctx.player.input.cstick.y > threshold;
    mask(&[stick, cstick])
}

fn dsmash_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::ATTACK_LW4)
}

fn dsmash_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_LW4, state::ATTACK_LW4)
}

pub const DSMASH: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base),
    state_predicate: Some(grounded),
    input_predicate: Some(dsmash_attack_input),
    success_predicate: Some(dsmash_success),
    end_predicate: Some(dsmash_end),
    input_names: &[None, None],
    ..ActionType::new(DSmash, "DSmash")
};

// Tilts

fn ftilt_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.is_pressed(button::A)
        && ftilt_input(ctx, input)
        && !xsmash_input(ctx, input)
        && stick_angle(input.stick) < ctx.tuning.angle_50d])
}

fn ftilt_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state.is_some_and(|s| (state::ATTACK_S3_HI..=state::ATTACK_S3_LW).contains(&s))
}

fn ftilt_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_S3_HI, state::ATTACK_S3_LW)
}

pub const FTILT: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base),
    state_predicate: Some(grounded),
    input_predicate: Some(ftilt_attack_input),
    success_predicate: Some(ftilt_success),
    end_predicate: Some(ftilt_end),
    ..ActionType::new(FTilt, "FTilt")
};

fn utilt_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.is_pressed(button::A)
        && utilt_input(ctx, input)
        && !usmash_input(ctx, input)
        && stick_angle(input.stick) >= ctx.tuning.angle_50d])
}

fn utilt_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::ATTACK_HI3)
}

fn utilt_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_HI3, state::ATTACK_HI3)
}

pub const UTILT: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base),
    state_predicate: Some(grounded),
    input_predicate: Some(utilt_attack_input),
    success_predicate: Some(utilt_success),
    end_predicate: Some(utilt_end),
    ..ActionType::new(UTilt, "UTilt")
};

fn dtilt_attack_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.is_pressed(button::A)
        && dtilt_input(ctx, input)
        && !dsmash_input(ctx, input)
        && stick_angle(input.stick) >= ctx.tuning.angle_50d])
}

fn dtilt_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    entered(new_state, state::ATTACK_LW3)
}

fn dtilt_end(ctx: &Ctx<'_>) -> bool {
    attack_ended(ctx, state::ATTACK_LW3, state::ATTACK_LW3)
}

pub const DTILT: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base),
    state_predicate: Some(grounded),
    input_predicate: Some(dtilt_attack_input),
    success_predicate: Some(dtilt_success),
    end_predicate: Some(dtilt_end),
    ..ActionType::new(DTilt, "DTilt")
};

// Grab, including jump-cancelled grabs from jumpsquat.

fn grab_state(ctx: &Ctx<'_>, _base: Option<&ActionEntry>, _poll_delta: usize) -> bool {
    is_grounded(ctx.player, None) || ctx.player.in_state(&[state::KNEE_BEND])
}

fn grab_input(_ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    mask(&[input.all_pressed(button::ANALOG_LR | button::A)])
}

fn grab_success(_ctx: &Ctx<'_>, new_state: Option<ActionState>) -> bool {
    new_state.is_some_and(|s| s == state::CATCH || s == state::CATCH_DASH)
}

fn grab_end(ctx: &Ctx<'_>) -> bool {
    !ctx.player.in_state_range(state::CATCH, state::CATCH_CUT)
}

pub const GRAB: ActionType = ActionType {
    end_delay: EndDelay::ActOut,
    is_base_action: Some(ground_base_or_jump),
    state_predicate: Some(grab_state),
    input_predicate: Some(grab_input),
    success_predicate: Some(grab_success),
    end_predicate: Some(grab_end),
    ..ActionType::new(Grab, "Grab")
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::Vec2;
    use crate::player::{PlayerState, character};
    use crate::settings::Tuning;

    fn entry(kind: ActionKind, stick_x: f32) -> ActionEntry {
        let input = ProcessedInput {
            stick: Vec2::new(stick_x, 0.0),
            ..ProcessedInput::default()
        };
        ActionEntry::detected(kind, None, 0, input, 0, 0)
    }

    #[test]
    fn turn_needs_an_instant_back_tilt() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, 14);
        let ctx = Ctx::new(&player, &tuning, 8);
        let back = ProcessedInput {
            stick: Vec2::new(-0.5, 0.0),
            ..ProcessedInput::default()
        };
        assert!(turn_state(&ctx, None, 0));
        assert_eq!(turn_input(&ctx, &back), 1);

        player.input.stick = Vec2::new(-0.5, 0.0);
        let ctx = Ctx::new(&player, &tuning, 8);
        assert_eq!(turn_input(&ctx, &back), 0);
    }

    #[test]
    fn tilt_turn_timer_separates_turn_from_pivot() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::TURN);
        player.tilt_turn_timer = 4.0;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(turn_success(&ctx, Some(state::TURN)));
        assert!(!pivot_success(&ctx, Some(state::TURN)));
        assert!(!turn_success(&ctx, None));

        player.tilt_turn_timer = 0.0;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(pivot_success(&ctx, Some(state::TURN)));
    }

    #[test]
    fn dashback_window_is_one_to_two_frames() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::TURN);
        let ctx = Ctx::new(&player, &tuning, 8);
        let turn = entry(Turn, -0.5);
        assert!(!dashback_state(&ctx, Some(&turn), 7));
        assert!(dashback_state(&ctx, Some(&turn), 8));
        assert!(dashback_state(&ctx, Some(&turn), 16));
        assert!(!dashback_state(&ctx, Some(&turn), 17));
        assert!(!dashback_state(&ctx, Some(&entry(Dashback, -1.0)), 8));
    }

    #[test]
    fn dashback_follows_the_base_direction() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::TURN);
        let ctx = Ctx::new(&player, &tuning, 8);
        let turn = entry(Turn, -0.5);
        let back = ProcessedInput {
            stick: Vec2::new(-1.0, 0.0),
            ..ProcessedInput::default()
        };
        let forward = ProcessedInput {
            stick: Vec2::new(1.0, 0.0),
            ..ProcessedInput::default()
        };
        assert_eq!(toward_base_smash(&ctx, &back, Some(&turn)), 1);
        assert_eq!(toward_base_smash(&ctx, &forward, Some(&turn)), 0);
        assert_eq!(toward_base_smash(&ctx, &back, None), 0);
    }

    #[test]
    fn run_waits_for_initial_dash() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::DASH);
        let ctx = Ctx::new(&player, &tuning, 8);
        let dash = entry(Dash, 1.0);
        assert!(!run_state(&ctx, Some(&dash), 8 * 10));
        assert!(run_state(&ctx, Some(&dash), 8 * 11));
        assert!(!run_state(&ctx, Some(&entry(Jump, 0.0)), 8 * 11));
    }

    #[test]
    fn full_crouch_without_base_needs_squat_wait() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::SQUAT);
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(!squat_wait_state(&ctx, None, 0));
        assert!(squat_wait_state(&ctx, Some(&entry(Squat, 0.0)), 8 * 6));
        assert!(!squat_wait_state(&ctx, Some(&entry(Squat, 0.0)), 8 * 5));

        player.action_state = state::SQUAT_WAIT;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(squat_wait_state(&ctx, None, 0));
        assert!(!squat_wait_state(&ctx, Some(&entry(DoocStart, 0.0)), 100));
    }

    #[test]
    fn smash_masks_report_stick_and_cstick_separately() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, 14);
        let ctx = Ctx::new(&player, &tuning, 8);
        let stick = ProcessedInput {
            pressed: button::A,
            buttons: button::A,
            stick: Vec2::new(1.0, 0.0),
            ..ProcessedInput::default()
        };
        let cstick = ProcessedInput {
            cstick: Vec2::new(-1.0, 0.0),
            ..ProcessedInput::default()
        };
        assert_eq!(fsmash_input(&ctx, &stick), 0b01);
        assert_eq!(fsmash_input(&ctx, &cstick), 0b10);

        let down = ProcessedInput {
            cstick: Vec2::new(0.0, -1.0),
            ..ProcessedInput::default()
        };
        assert_eq!(dsmash_attack_input(&ctx, &down), 0b10);
    }

    #[test]
    fn grab_needs_trigger_and_a_together() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::KNEE_BEND);
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(grab_state(&ctx, None, 0));
        let z = ProcessedInput {
            pressed: button::Z | button::ANALOG_LR | button::A,
            ..ProcessedInput::default()
        };
        let a = ProcessedInput {
            pressed: button::A,
            ..ProcessedInput::default()
        };
        assert_eq!(grab_input(&ctx, &z), 1);
        assert_eq!(grab_input(&ctx, &a), 0);
    }
}
