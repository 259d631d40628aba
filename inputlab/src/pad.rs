use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Digital button bits as the host's pad library reports them, plus the synthetic
/// analog-trigger bit.
pub mod button {
    pub const DPAD_LEFT: u32 = 0x0001;
    pub const DPAD_RIGHT: u32 = 0x0002;
    pub const DPAD_DOWN: u32 = 0x0004;
    pub const DPAD_UP: u32 = 0x0008;
    pub const Z: u32 = 0x0010;
    pub const R: u32 = 0x0020;
    pub const L: u32 = 0x0040;
    pub const A: u32 = 0x0100;
    pub const B: u32 = 0x0200;
    pub const X: u32 = 0x0400;
    pub const Y: u32 = 0x0800;
    pub const START: u32 = 0x1000;
    pub const ANALOG_LR: u32 = 0x8000_0000;

    /// Buttons the press-interval monitor reports, in print order.
    pub const NAMED: [(u32, &str); 7] = [
        (A, "A"),
        (B, "B"),
        (X, "X"),
        (Y, "Y"),
        (L, "L"),
        (R, "R"),
        (Z, "Z"),
    ];
}

pub const STICK_DEADZONE: i8 = 22;
pub const STICK_RANGE: f32 = 80.0;
pub const TRIGGER_RANGE: f32 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Unsigned angle above or below the horizontal axis, in `[0, PI/2]`.
pub fn stick_angle(stick: Vec2) -> f32 {
    stick.y.abs().atan2(stick.x.abs())
}

/// Signed angle relative to the horizontal axis with x folded positive, in `[-PI/2, PI/2]`.
pub fn stick_angle_abs_x(stick: Vec2) -> f32 {
    stick.y.atan2(stick.x.abs())
}

pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

/// One raw controller sample exactly as the serial interface delivers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawPadStatus {
    pub buttons: u16,
    pub stick_x: i8,
    pub stick_y: i8,
    pub cstick_x: i8,
    pub cstick_y: i8,
    pub analog_l: u8,
    pub analog_r: u8,
    #[serde(default)]
    pub errstat: i8,
}

impl RawPadStatus {
    pub fn is_connected(&self) -> bool {
        self.errstat == 0
    }
}

/// Pad status scaled to engine units: sticks in `[-1, 1]` clamped to the unit circle,
/// triggers in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PadStatus {
    pub buttons: u32,
    pub stick: Vec2,
    pub cstick: Vec2,
    pub analog_l: f32,
    pub analog_r: f32,
}

impl PadStatus {
    pub fn from_raw(raw: &RawPadStatus) -> Self {
        Self {
            buttons: u32::from(raw.buttons),
            stick: convert_hw_coords(raw.stick_x, raw.stick_y),
            cstick: convert_hw_coords(raw.cstick_x, raw.cstick_y),
            analog_l: convert_trigger(raw.analog_l),
            analog_r: convert_trigger(raw.analog_r),
        }
    }

    pub fn trigger(&self) -> f32 {
        self.analog_l.max(self.analog_r)
    }
}

pub fn convert_hw_coords(x: i8, y: i8) -> Vec2 {
    let stick = Vec2::new(convert_axis(x), convert_axis(y));
    let length = stick.length();
    if length > 1.0 {
        Vec2::new(stick.x / length, stick.y / length)
    } else {
        stick
    }
}

fn convert_axis(value: i8) -> f32 {
    if value.unsigned_abs() <= STICK_DEADZONE.unsigned_abs() {
        0.0
    } else {
        f32::from(value) / STICK_RANGE
    }
}

fn convert_trigger(value: u8) -> f32 {
    (f32::from(value) / TRIGGER_RANGE).min(1.0)
}
