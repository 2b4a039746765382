//! Packed ARGB stroke colors
//!
//! Colors are stored as 32-bit ARGB words (alpha in the high byte). The
//! persisted form is the word reinterpreted as a signed 32-bit integer and
//! written in decimal, so opaque black is `-16777216`.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const LIGHT_GRAY: Color = Color(0xFFCC_CCCC);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Flip each RGB channel, keeping alpha.
    pub const fn inverted(self) -> Self {
        Color::from_argb(
            self.alpha(),
            255 - self.red(),
            255 - self.green(),
            255 - self.blue(),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as i32)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts the signed decimal form, and unsigned words above `i32::MAX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(signed) = s.parse::<i32>() {
            return Ok(Color(signed as u32));
        }
        s.parse::<u32>()
            .map(Color)
            .map_err(|e| Error::decode("color", format!("{s:?}: {e}")))
    }
}
