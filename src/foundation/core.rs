use std::ops::{Add, AddAssign};

/// Straight-alpha RGBA8 color. Doubles as the Parley text brush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| mul_div255(u16::from(c), a);
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// 26.6 fixed-point pixel quantity (64 units per pixel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed26_6(pub i32);

impl Fixed26_6 {
    pub const fn from_px(px: i32) -> Self {
        Self(px << 6)
    }

    /// Converts a point size to pixels at `dpi`, truncating toward zero.
    pub fn from_points(points: f64, dpi: f64) -> Self {
        Self((points * dpi * (64.0 / 72.0)) as i32)
    }

    pub fn from_px_f32(px: f32) -> Self {
        Self((px * 64.0) as i32)
    }

    pub const fn floor_px(self) -> i32 {
        self.0 >> 6
    }

    pub const fn ceil_px(self) -> i32 {
        (self.0 + 0x3f) >> 6
    }

    pub fn to_px_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }
}

impl Add for Fixed26_6 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed26_6 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Baseline origin of a text draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub x: Fixed26_6,
    pub y: Fixed26_6,
}

impl Origin {
    pub const fn from_px(x: i32, y: i32) -> Self {
        Self {
            x: Fixed26_6::from_px(x),
            y: Fixed26_6::from_px(y),
        }
    }
}

/// `x * y / 255`, rounded to nearest.
pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
