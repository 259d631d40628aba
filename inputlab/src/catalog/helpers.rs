//! Predicates shared across action types.

use crate::catalog::{ActionKind, Ctx};
use crate::history::ActionEntry;
use crate::input::ProcessedInput;
use crate::pad::{Vec2, button, stick_angle, stick_angle_abs_x};
use crate::player::{ActionState, PlayerState, SpecialKind, state};

/// Stick hold counter value meaning "not held past the threshold".
pub const HOLD_RESET: u32 = 0xFE;

/// Hold-frame window for dash-out-of-crouch inputs, wider than the smash window so slow
/// inputs still show up.
const DOOC_HOLD_FRAMES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    Ground,
    Air,
    Ledge,
    Knockdown,
}

pub fn state_class(player: &PlayerState, base: Option<&ActionEntry>) -> StateClass {
    if base.is_some_and(|base| base.is_type(&[ActionKind::Jump, ActionKind::LedgeFall])) {
        return StateClass::Air;
    }

    if player.in_state_range(state::CLIFF_CATCH, state::CLIFF_JUMP_QUICK2) {
        return StateClass::Ledge;
    }

    if player.in_state_range(state::DOWN_BOUND_U, state::DOWN_DAMAGE_U)
        || player.in_state_range(state::DOWN_BOUND_D, state::DOWN_DAMAGE_D)
    {
        return StateClass::Knockdown;
    }

    // Inputs during jumpsquat are attempted airborne inputs.
    if player.airborne || player.in_state(&[state::KNEE_BEND]) {
        return StateClass::Air;
    }

    StateClass::Ground
}

pub fn is_grounded(player: &PlayerState, base: Option<&ActionEntry>) -> bool {
    state_class(player, base) == StateClass::Ground
}

pub fn is_airborne(player: &PlayerState, base: Option<&ActionEntry>) -> bool {
    state_class(player, base) == StateClass::Air
}

pub fn is_on_ledge(player: &PlayerState, base: Option<&ActionEntry>) -> bool {
    state_class(player, base) == StateClass::Ledge
}

pub fn in_squat(player: &PlayerState) -> bool {
    player.in_state_range(state::SQUAT, state::SQUAT_RV)
}

fn hold_time(value: f32, last: f32, last_hold: u32, threshold: f32) -> u32 {
    let sign = 1f32.copysign(value);
    if value * sign < threshold {
        HOLD_RESET
    } else if last * sign < threshold {
        0
    } else {
        last_hold.saturating_add(1)
    }
}

/// The stick x hold counter the simulation will compute from this input.
pub fn stick_x_hold_time(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let last = &ctx.player.input;
    hold_time(
        input.stick.x,
        last.stick.x,
        last.stick_x_hold_time,
        ctx.tuning.stick_hold_threshold_x,
    )
}

pub fn stick_y_hold_time(ctx: &Ctx<'_>, input: &ProcessedInput) -> u32 {
    let last = &ctx.player.input;
    hold_time(
        input.stick.y,
        last.stick.y,
        last.stick_y_hold_time,
        ctx.tuning.stick_hold_threshold_y,
    )
}

fn forward(ctx: &Ctx<'_>, x: f32) -> f32 {
    x * ctx.player.direction
}

pub fn fsmash_region(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    forward(ctx, input.stick.x) >= ctx.tuning.x_smash_threshold
}

pub fn fsmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    fsmash_region(ctx, input) && stick_x_hold_time(ctx, input) < ctx.tuning.x_smash_frames
}

/// Forward smash input that was not already past the threshold last frame.
pub fn fsmash_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    fsmash_input(ctx, input)
        && forward(ctx, ctx.player.input.stick.x) < ctx.tuning.x_smash_threshold
}

pub fn bsmash_region(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    -forward(ctx, input.stick.x) >= ctx.tuning.x_smash_threshold
}

pub fn bsmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    bsmash_region(ctx, input) && stick_x_hold_time(ctx, input) < ctx.tuning.x_smash_frames
}

pub fn bsmash_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    bsmash_input(ctx, input)
        && -forward(ctx, ctx.player.input.stick.x) < ctx.tuning.x_smash_threshold
}

/// Forward dash out of crouch.
pub fn dfooc_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    fsmash_region(ctx, input)
        && stick_x_hold_time(ctx, input) < DOOC_HOLD_FRAMES
        && forward(ctx, ctx.player.input.stick.x) < ctx.tuning.x_smash_threshold
}

/// Backward dash out of crouch.
pub fn dbooc_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    bsmash_region(ctx, input)
        && stick_x_hold_time(ctx, input) < DOOC_HOLD_FRAMES
        && -forward(ctx, ctx.player.input.stick.x) < ctx.tuning.x_smash_threshold
}

/// Smash input in either horizontal direction.
pub fn xsmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    input.stick.x.abs() >= ctx.tuning.x_smash_threshold
        && stick_x_hold_time(ctx, input) < ctx.tuning.x_smash_frames
}

pub fn usmash_region(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    input.stick.y >= ctx.tuning.y_smash_threshold
}

pub fn usmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    usmash_region(ctx, input) && stick_y_hold_time(ctx, input) < ctx.tuning.y_smash_frames
}

pub fn usmash_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    usmash_input(ctx, input) && ctx.player.input.stick.y < ctx.tuning.y_smash_threshold
}

pub fn dsmash_region(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    -input.stick.y >= ctx.tuning.y_smash_threshold
}

pub fn dsmash_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    dsmash_region(ctx, input) && stick_y_hold_time(ctx, input) < ctx.tuning.y_smash_frames
}

pub fn ftilt_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    forward(ctx, input.stick.x) >= ctx.tuning.ftilt_threshold
}

pub fn btilt_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    -forward(ctx, input.stick.x) >= ctx.tuning.ftilt_threshold
}

pub fn btilt_instant(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    btilt_input(ctx, input) && -forward(ctx, ctx.player.input.stick.x) < ctx.tuning.ftilt_threshold
}

pub fn utilt_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    input.stick.y >= ctx.tuning.utilt_threshold
}

pub fn dtilt_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> bool {
    input.stick.y <= ctx.tuning.dtilt_threshold
}

/// Which special a B press would start in the current state.
pub fn special_input(ctx: &Ctx<'_>, input: &ProcessedInput, base: Option<&ActionEntry>) -> SpecialKind {
    if !input.is_pressed(button::B) {
        return SpecialKind::None;
    }

    let tuning = ctx.tuning;
    let crouch = ctx.player.in_state(&[state::SQUAT_WAIT, state::SQUAT_RV]);

    match state_class(ctx.player, base) {
        StateClass::Ground => {
            if input.stick.x.abs() >= tuning.x_special_threshold && !crouch {
                SpecialKind::Side
            } else if input.stick.y >= tuning.y_special_threshold {
                SpecialKind::Up
            } else if input.stick.y < -tuning.y_special_threshold {
                SpecialKind::Down
            } else if input.stick.y > -tuning.y_special_threshold && !crouch {
                SpecialKind::Neutral
            } else {
                SpecialKind::None
            }
        }
        StateClass::Air => {
            if input.stick.y >= tuning.y_special_threshold {
                SpecialKind::Up
            } else if input.stick.y <= -tuning.y_special_threshold {
                SpecialKind::Down
            } else if input.stick.x.abs() >= tuning.x_special_threshold {
                SpecialKind::Side
            } else {
                SpecialKind::Neutral
            }
        }
        StateClass::Ledge | StateClass::Knockdown => SpecialKind::None,
    }
}

/// Aerial attack state this input would start, if any.
pub fn aerial_input(ctx: &Ctx<'_>, input: &ProcessedInput) -> Option<ActionState> {
    let player = ctx.player;
    let last_cstick = player.input.cstick;
    let threshold_x = ctx.tuning.aerial_threshold_x;
    let threshold_y = ctx.tuning.aerial_threshold_y;

    let cstick_flicked = (last_cstick.x.abs() < threshold_x && input.cstick.x.abs() >= threshold_x)
        || (last_cstick.y.abs() < threshold_y && input.cstick.y.abs() >= threshold_y);

    let stick = if cstick_flicked {
        input.cstick
    } else if input.is_pressed(button::A) {
        if input.is_pressed(button::Z) {
            // Z during an aerial is an L cancel; during jumpsquat it is a jump-cancelled grab.
            let in_aerial =
                player.in_state_range(state::ATTACK_AIR_N, state::ATTACK_AIR_LW) && !player.iasa;
            if in_aerial || player.in_state(&[state::KNEE_BEND]) {
                return None;
            }
        }

        if input.stick.x.abs() < threshold_x && input.stick.y.abs() < threshold_y {
            return Some(state::ATTACK_AIR_N);
        }
        input.stick
    } else {
        return None;
    };

    let aerial = if stick_angle(stick) > ctx.tuning.angle_50d {
        if stick.y > 0.0 {
            state::ATTACK_AIR_HI
        } else {
            state::ATTACK_AIR_LW
        }
    } else if forward(ctx, stick.x) > 0.0 {
        state::ATTACK_AIR_F
    } else {
        state::ATTACK_AIR_B
    };
    Some(aerial)
}

pub fn in_ledge_deadzone(ctx: &Ctx<'_>, stick: Vec2) -> bool {
    stick.x.abs() < ctx.tuning.ledge_deadzone && stick.y.abs() < ctx.tuning.ledge_deadzone
}

/// Both sticks were neutral on the previous frame.
pub fn ledge_neutral_last_frame(ctx: &Ctx<'_>) -> bool {
    in_ledge_deadzone(ctx, ctx.player.input.stick) && in_ledge_deadzone(ctx, ctx.player.input.cstick)
}

pub fn ledge_fall_input(ctx: &Ctx<'_>, stick: Vec2) -> bool {
    if in_ledge_deadzone(ctx, stick) {
        return false;
    }
    let angle = stick_angle_abs_x(stick);
    if forward(ctx, stick.x) >= 0.0 {
        angle < -ctx.tuning.angle_50d
    } else {
        angle < ctx.tuning.angle_50d
    }
}

pub fn ledge_stand_input(ctx: &Ctx<'_>, stick: Vec2) -> bool {
    !in_ledge_deadzone(ctx, stick) && !ledge_fall_input(ctx, stick)
}

pub fn is_ground_base(entry: &ActionEntry) -> bool {
    use ActionKind::*;
    entry.is_type(&[
        Turn, Pivot, Dash, Dashback, SlowDashback, Run, RunBrake, Squat, AirDodge, FSmash,
        USmash, DSmash, FTilt, UTilt, DTilt, Grab, SideB, UpB, DownB, NeutralB,
    ])
}

pub fn is_air_base(entry: &ActionEntry) -> bool {
    use ActionKind::*;
    entry.is_type(&[
        Nair, Fair, Bair, Uair, Dair, Jump, DoubleJump, Multijump, SideB, UpB, DownB, NeutralB,
        LedgeFall,
    ])
}

pub fn is_ledge_base(entry: &ActionEntry) -> bool {
    entry.is_type(&[ActionKind::CliffCatch, ActionKind::CliffWait, ActionKind::LedgeFall])
}

/// Fixed-width stick coordinate in ten-thousandths, with exact extremes spelled out.
pub fn format_coord(coord: f32) -> String {
    if coord == 0.0 {
        "  0.0".to_string()
    } else if coord == 1.0 {
        "  1.0".to_string()
    } else if coord == -1.0 {
        " -1.0".to_string()
    } else {
        format!("{:5.0}", coord * 10000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::character;
    use crate::settings::Tuning;

    fn stick_input(x: f32, y: f32) -> ProcessedInput {
        ProcessedInput {
            stick: Vec2::new(x, y),
            ..ProcessedInput::default()
        }
    }

    #[test]
    fn jump_base_counts_as_airborne() {
        let player = PlayerState::new(0, character::FOX, state::TURN);
        let jump = ActionEntry::detected(ActionKind::Jump, None, 0, ProcessedInput::default(), 0, 0);
        assert_eq!(state_class(&player, None), StateClass::Ground);
        assert_eq!(state_class(&player, Some(&jump)), StateClass::Air);
    }

    #[test]
    fn jumpsquat_ledge_and_knockdown_are_classified() {
        let mut player = PlayerState::new(0, character::FOX, state::KNEE_BEND);
        assert!(is_airborne(&player, None));
        player.action_state = state::CLIFF_WAIT;
        assert!(is_on_ledge(&player, None));
        player.action_state = state::DOWN_BOUND_D + 1;
        assert_eq!(state_class(&player, None), StateClass::Knockdown);
    }

    #[test]
    fn hold_time_resets_restarts_and_counts() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::TURN);
        let ctx = Ctx::new(&player, &tuning, 8);
        assert_eq!(stick_x_hold_time(&ctx, &stick_input(0.1, 0.0)), HOLD_RESET);
        assert_eq!(stick_x_hold_time(&ctx, &stick_input(0.9, 0.0)), 0);

        player.input.stick = Vec2::new(0.9, 0.0);
        player.input.stick_x_hold_time = 4;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert_eq!(stick_x_hold_time(&ctx, &stick_input(0.95, 0.0)), 5);
        // Flipping sides restarts the counter.
        assert_eq!(stick_x_hold_time(&ctx, &stick_input(-0.95, 0.0)), 0);
    }

    #[test]
    fn smash_instant_requires_previous_frame_below_threshold() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::TURN);
        player.direction = -1.0;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(fsmash_instant(&ctx, &stick_input(-1.0, 0.0)));
        assert!(bsmash_instant(&ctx, &stick_input(1.0, 0.0)));

        player.input.stick = Vec2::new(-1.0, 0.0);
        player.input.stick_x_hold_time = 0;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(fsmash_input(&ctx, &stick_input(-1.0, 0.0)));
        assert!(!fsmash_instant(&ctx, &stick_input(-1.0, 0.0)));
    }

    #[test]
    fn specials_by_stick_direction() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::MARTH, state::TURN);
        let ctx = Ctx::new(&player, &tuning, 8);
        let press = |x, y| ProcessedInput {
            pressed: button::B,
            buttons: button::B,
            ..stick_input(x, y)
        };
        assert_eq!(special_input(&ctx, &press(0.0, 0.0), None), SpecialKind::Neutral);
        assert_eq!(special_input(&ctx, &press(0.9, 0.0), None), SpecialKind::Side);
        assert_eq!(special_input(&ctx, &press(0.0, 0.9), None), SpecialKind::Up);
        assert_eq!(special_input(&ctx, &press(0.0, -0.9), None), SpecialKind::Down);
        assert_eq!(special_input(&ctx, &stick_input(0.0, 0.0), None), SpecialKind::None);

        // Crouching suppresses side and neutral B on the ground.
        player.action_state = state::SQUAT_WAIT;
        let ctx = Ctx::new(&player, &tuning, 8);
        assert_eq!(special_input(&ctx, &press(0.9, 0.0), None), SpecialKind::None);
    }

    #[test]
    fn aerials_from_stick_and_cstick() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::FALL);
        player.airborne = true;
        let ctx = Ctx::new(&player, &tuning, 8);

        let a_press = |x, y| ProcessedInput {
            pressed: button::A,
            buttons: button::A,
            ..stick_input(x, y)
        };
        assert_eq!(aerial_input(&ctx, &a_press(0.0, 0.0)), Some(state::ATTACK_AIR_N));
        assert_eq!(aerial_input(&ctx, &a_press(1.0, 0.0)), Some(state::ATTACK_AIR_F));
        assert_eq!(aerial_input(&ctx, &a_press(-1.0, 0.0)), Some(state::ATTACK_AIR_B));
        assert_eq!(aerial_input(&ctx, &a_press(0.0, 1.0)), Some(state::ATTACK_AIR_HI));

        let cstick_down = ProcessedInput {
            cstick: Vec2::new(0.0, -1.0),
            ..ProcessedInput::default()
        };
        assert_eq!(aerial_input(&ctx, &cstick_down), Some(state::ATTACK_AIR_LW));
        assert_eq!(aerial_input(&ctx, &ProcessedInput::default()), None);
    }

    #[test]
    fn z_during_aerial_is_an_l_cancel() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::ATTACK_AIR_F);
        player.airborne = true;
        let ctx = Ctx::new(&player, &tuning, 8);
        let z = ProcessedInput {
            pressed: button::Z | button::A | button::ANALOG_LR,
            buttons: button::Z | button::A | button::ANALOG_LR,
            ..ProcessedInput::default()
        };
        assert_eq!(aerial_input(&ctx, &z), None);
    }

    #[test]
    fn ledge_stick_regions() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::CLIFF_WAIT);
        let ctx = Ctx::new(&player, &tuning, 8);
        assert!(ledge_fall_input(&ctx, Vec2::new(0.0, -1.0)));
        assert!(ledge_fall_input(&ctx, Vec2::new(-1.0, 0.0)));
        assert!(ledge_stand_input(&ctx, Vec2::new(1.0, 0.0)));
        assert!(ledge_stand_input(&ctx, Vec2::new(0.0, 1.0)));
        assert!(!ledge_stand_input(&ctx, Vec2::ZERO));
        assert!(!ledge_fall_input(&ctx, Vec2::ZERO));
    }

    #[test]
    fn coords_are_fixed_width() {
        assert_eq!(format_coord(0.0), "  0.0");
        assert_eq!(format_coord(-1.0), " -1.0");
        assert_eq!(format_coord(0.5), " 5000");
        assert_eq!(format_coord(-0.2875), "-2875");
    }
}
