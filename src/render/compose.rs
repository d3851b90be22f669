use crate::{
    config::LayoutConfig,
    foundation::{
        core::{Fixed26_6, Origin},
        error::{CaptionError, CaptionResult},
    },
    render::{font::FontEngine, surface::Surface},
};

/// Output canvas geometry derived from the template and the wrapped line count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub line_pitch_px: u32,
}

impl CanvasLayout {
    pub fn for_template(
        template_width: u32,
        template_height: u32,
        line_count: usize,
        layout: &LayoutConfig,
    ) -> CaptionResult<Self> {
        let overflow = || CaptionError::validation("canvas size overflows u32");
        let line_pitch_px = layout.line_pitch_px();
        let line_count = u32::try_from(line_count).map_err(|_| overflow())?;

        let width = layout
            .margin_px
            .checked_mul(2)
            .and_then(|m| template_width.checked_add(m))
            .ok_or_else(overflow)?;
        let height = line_pitch_px
            .checked_mul(line_count)
            .and_then(|body| template_height.checked_add(body))
            .and_then(|h| h.checked_add(layout.vertical_padding_px))
            .ok_or_else(overflow)?;

        Ok(Self {
            width,
            height,
            line_pitch_px,
        })
    }

    /// Baseline origin of the title, centered by the per-unit width estimate.
    pub fn title_origin(&self, title: &str, layout: &LayoutConfig) -> Origin {
        let units = layout.wrap_unit.count(title) as i64;
        let x = (i64::from(self.width) - units * i64::from(layout.title_unit_width_px)) / 2;
        Origin::from_px(
            x as i32,
            layout.title_baseline_px + layout.ascent_adjust_px(),
        )
    }

    /// Baseline origin of the first body line.
    pub fn body_origin(&self, layout: &LayoutConfig) -> Origin {
        Origin::from_px(
            layout.body_left_px,
            layout.body_baseline_px + layout.ascent_adjust_px(),
        )
    }
}

/// Builds the caption card: background, inset template, title, then body lines
/// top to bottom.
#[tracing::instrument(skip_all, fields(lines = lines.len()))]
pub fn compose<E: FontEngine>(
    engine: &mut E,
    font: &E::Font,
    template: &Surface,
    title: &str,
    lines: &[String],
    layout: &LayoutConfig,
) -> CaptionResult<Surface> {
    let canvas = CanvasLayout::for_template(template.width(), template.height(), lines.len(), layout)?;
    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        line_pitch_px = canvas.line_pitch_px,
        "canvas layout"
    );

    let mut surface = Surface::new(canvas.width, canvas.height)?;
    surface.fill(layout.background);
    surface.blit_src(template, (-i64::from(layout.margin_px), 0));

    let size_px = layout.font_size_px();
    engine.draw(
        &mut surface,
        title,
        canvas.title_origin(title, layout),
        font,
        size_px,
        layout.foreground,
    )?;

    let pitch: Fixed26_6 = layout.line_pitch();
    let mut pen = canvas.body_origin(layout);
    for line in lines {
        engine.draw(&mut surface, line, pen, font, size_px, layout.foreground)?;
        pen.y += pitch;
    }

    Ok(surface)
}
