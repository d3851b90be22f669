use crate::{
    config::{LayoutConfig, WrapUnit},
    foundation::error::{CaptionError, CaptionResult},
};

/// Number of units per body line for a template `template_width` pixels wide.
pub fn line_capacity(template_width: u32, layout: &LayoutConfig) -> CaptionResult<usize> {
    let canvas_width = f64::from(template_width) + 2.0 * f64::from(layout.margin_px);
    let capacity = (canvas_width / layout.average_glyph_width_px).floor();
    if !capacity.is_finite() || capacity < 1.0 {
        return Err(CaptionError::validation(format!(
            "line capacity must be >= 1 (canvas width {canvas_width}px, glyph width {}px)",
            layout.average_glyph_width_px
        )));
    }
    Ok(capacity as usize)
}

/// Splits `text` into consecutive lines of exactly `capacity` units; the last line
/// holds the remainder.
pub fn wrap(text: &str, capacity: usize, unit: WrapUnit) -> CaptionResult<Vec<String>> {
    if capacity == 0 {
        return Err(CaptionError::validation("line capacity must be > 0"));
    }
    if text.is_empty() {
        return Err(CaptionError::precondition("texts is empty"));
    }

    let lines = match unit {
        WrapUnit::Chars => wrap_chars(text, capacity),
        WrapUnit::Bytes => text
            .as_bytes()
            .chunks(capacity)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect(),
    };
    Ok(lines)
}

fn wrap_chars(text: &str, capacity: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(text.len() / capacity + 1);
    let mut start = 0usize;
    let mut taken = 0usize;
    for (idx, _) in text.char_indices() {
        if taken == capacity {
            lines.push(text[start..idx].to_string());
            start = idx;
            taken = 0;
        }
        taken += 1;
    }
    lines.push(text[start..].to_string());
    lines
}
