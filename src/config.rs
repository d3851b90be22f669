//! Layout constants and per-run inputs.
//!
//! [`LayoutConfig::default`] reproduces the stock caption card: a 14pt font at 72 dpi,
//! 1.5 line spacing, 20px side margins and 50px of padding below the body text.

use std::{io::Read, path::PathBuf};

use anyhow::Context as _;

use crate::foundation::{
    core::{Fixed26_6, Rgba8},
    error::{CaptionError, CaptionResult},
};

/// Unit used to count text for wrapping and for title centering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapUnit {
    /// Unicode scalar values. Never splits a character.
    #[default]
    Chars,
    /// UTF-8 bytes. Multi-byte characters cut at a line boundary decode as U+FFFD.
    Bytes,
}

impl WrapUnit {
    pub fn count(self, text: &str) -> usize {
        match self {
            Self::Chars => text.chars().count(),
            Self::Bytes => text.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Font size in points.
    pub font_size_pt: f64,
    /// Output resolution in dots per inch; 72 makes one point one pixel.
    pub dpi: f64,
    /// Multiplier applied to the font size to get the line pitch.
    pub line_spacing: f64,
    /// Assumed average glyph advance in pixels, used to derive line capacity.
    pub average_glyph_width_px: f64,
    /// Horizontal margin on each side of the template, in pixels.
    pub margin_px: u32,
    /// Extra pixels added below the body text.
    pub vertical_padding_px: u32,
    /// Pixels per title unit for the centering estimate.
    pub title_unit_width_px: i32,
    /// Title baseline before the ascent adjustment, in pixels from the top.
    pub title_baseline_px: i32,
    /// First body baseline before the ascent adjustment, in pixels from the top.
    pub body_baseline_px: i32,
    /// Left edge of body lines, in pixels.
    pub body_left_px: i32,
    pub background: Rgba8,
    pub foreground: Rgba8,
    pub wrap_unit: WrapUnit,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size_pt: 14.0,
            dpi: 72.0,
            line_spacing: 1.5,
            average_glyph_width_px: 4.92,
            margin_px: 20,
            vertical_padding_px: 50,
            title_unit_width_px: 5,
            title_baseline_px: 240,
            body_baseline_px: 265,
            body_left_px: 10,
            background: Rgba8::WHITE,
            foreground: Rgba8::BLACK,
            wrap_unit: WrapUnit::Chars,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_reader<R: Read>(reader: R) -> CaptionResult<Self> {
        let cfg: Self = serde_json::from_reader(reader).context("parse layout JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CaptionResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CaptionError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )))
            }
        };
        positive("font_size_pt", self.font_size_pt)?;
        positive("dpi", self.dpi)?;
        positive("line_spacing", self.line_spacing)?;
        positive("average_glyph_width_px", self.average_glyph_width_px)?;
        if self.title_unit_width_px < 0 {
            return Err(CaptionError::validation(
                "title_unit_width_px must be >= 0",
            ));
        }
        Ok(())
    }

    pub fn font_size_px(&self) -> f32 {
        (self.font_size_pt * self.dpi / 72.0) as f32
    }

    /// Vertical advance between body baselines.
    pub fn line_pitch(&self) -> Fixed26_6 {
        Fixed26_6::from_points(self.font_size_pt * self.line_spacing, self.dpi)
    }

    /// Line pitch rounded up to whole pixels, used for canvas sizing.
    pub fn line_pitch_px(&self) -> u32 {
        self.line_pitch().ceil_px().max(0) as u32
    }

    /// Pixels added to the title and body baselines: the font size in 26.6 units
    /// shifted right by eight bits.
    pub fn ascent_adjust_px(&self) -> i32 {
        Fixed26_6::from_points(self.font_size_pt, self.dpi).0 >> 8
    }
}

/// Inputs of a single run, resolved by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub template_path: PathBuf,
    pub text: String,
    pub output_path: PathBuf,
    pub font_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_derived_metrics() {
        let cfg = LayoutConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.line_pitch(), Fixed26_6(1344));
        assert_eq!(cfg.line_pitch_px(), 21);
        assert_eq!(cfg.ascent_adjust_px(), 3);
        assert_eq!(cfg.font_size_px(), 14.0);
    }

    #[test]
    fn json_fills_missing_fields_from_defaults() {
        let cfg = LayoutConfig::from_json_reader(
            r#"{ "margin_px": 8, "wrap_unit": "bytes" }"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(cfg.margin_px, 8);
        assert_eq!(cfg.wrap_unit, WrapUnit::Bytes);
        assert_eq!(cfg.font_size_pt, 14.0);
        assert_eq!(cfg.background, Rgba8::WHITE);
    }

    #[test]
    fn json_rejects_unknown_and_degenerate_values() {
        assert!(LayoutConfig::from_json_reader(r#"{ "margins": 8 }"#.as_bytes()).is_err());

        let err =
            LayoutConfig::from_json_reader(r#"{ "average_glyph_width_px": 0.0 }"#.as_bytes())
                .unwrap_err();
        assert!(matches!(err, CaptionError::Validation(_)));
    }

    #[test]
    fn wrap_unit_counts() {
        assert_eq!(WrapUnit::Chars.count("年月日"), 3);
        assert_eq!(WrapUnit::Bytes.count("年月日"), 9);
        assert_eq!(WrapUnit::Chars.count("abc"), WrapUnit::Bytes.count("abc"));
    }
}
