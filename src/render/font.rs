use std::borrow::Cow;

use crate::{
    foundation::{
        core::{Fixed26_6, Origin, Rgba8},
        error::{CaptionError, CaptionResult},
    },
    render::surface::Surface,
};

/// Result of a successful draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    /// Horizontal extent of the shaped string in pixels.
    pub width_px: f32,
    /// Pen position after the string, on the same baseline.
    pub pen: Origin,
}

/// Parses fonts and draws strings into surfaces.
pub trait FontEngine {
    type Font;

    fn parse(&mut self, bytes: &[u8]) -> CaptionResult<Self::Font>;

    /// Draws `text` with its baseline starting at `origin`, compositing over `surface`.
    fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Origin,
        font: &Self::Font,
        size_px: f32,
        color: Rgba8,
    ) -> CaptionResult<Advance>;
}

/// Font parsed from raw bytes, ready for [`ParleyFontEngine`].
#[derive(Clone)]
pub struct ParleyFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

impl ParleyFont {
    pub fn family(&self) -> &str {
        &self.family
    }
}

impl std::fmt::Debug for ParleyFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyFont")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Shapes with Parley and rasterizes glyph runs with `vello_cpu`.
pub struct ParleyFontEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl Default for ParleyFontEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyFontEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout(
        &mut self,
        text: &str,
        font: &ParleyFont,
        size_px: f32,
        color: Rgba8,
    ) -> parley::Layout<Rgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Replaces line and paragraph breaks (and other control characters) with spaces so a
/// draw call always shapes to a single row.
fn single_line(text: &str) -> Cow<'_, str> {
    let breaks = |c: char| c.is_control() || c == '\u{2028}' || c == '\u{2029}';
    if text.contains(breaks) {
        Cow::Owned(text.chars().map(|c| if breaks(c) { ' ' } else { c }).collect())
    } else {
        Cow::Borrowed(text)
    }
}

struct ShapedRun {
    brush: Rgba8,
    font_size: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

impl FontEngine for ParleyFontEngine {
    type Font = ParleyFont;

    fn parse(&mut self, bytes: &[u8]) -> CaptionResult<ParleyFont> {
        let blob = parley::fontique::Blob::from(bytes.to_vec());
        let families = self
            .font_ctx
            .collection
            .register_fonts(blob.clone(), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CaptionError::font("no font families found in font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::font("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family, bytes = bytes.len(), "parsed font");

        let data = vello_cpu::peniko::FontData::new(blob, 0);
        Ok(ParleyFont { family, data })
    }

    fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Origin,
        font: &ParleyFont,
        size_px: f32,
        color: Rgba8,
    ) -> CaptionResult<Advance> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptionError::render(format!(
                "font size must be finite and > 0 (got {size_px})"
            )));
        }
        if text.is_empty() {
            return Ok(Advance {
                width_px: 0.0,
                pen: origin,
            });
        }

        let layout = self.layout(&single_line(text), font, size_px, color);
        let (line_baseline, ascent, descent) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (m.baseline, m.ascent.abs(), m.descent.abs())
            })
            .ok_or_else(|| CaptionError::render(format!("no lines shaped for {text:?}")))?;

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                runs.push(ShapedRun {
                    brush: run.style().brush,
                    font_size: run.run().font_size(),
                    glyphs: run
                        .positioned_glyphs()
                        .map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                        .collect(),
                });
            }
        }

        if runs.iter().all(|r| r.glyphs.is_empty()) && !text.trim().is_empty() {
            return Err(CaptionError::render(format!(
                "font '{}' produced no glyphs for {text:?}",
                font.family
            )));
        }

        // Rasterize only the band of rows the line can touch.
        let baseline_y = origin.y.to_px_f32();
        let pad = (size_px * 0.25).ceil() + 1.0;
        let top = ((baseline_y - ascent - pad).floor() as i64).max(0);
        let bottom = ((baseline_y + descent + pad).ceil() as i64).min(i64::from(surface.height()));

        if top < bottom {
            let width = surface.width();
            let band_height = (bottom - top) as u32;
            let mut ctx = vello_cpu::RenderContext::new(width as u16, band_height as u16);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(origin.x.to_px_f32()),
                f64::from(baseline_y - line_baseline) - top as f64,
            )));

            for run in runs {
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    run.brush.r,
                    run.brush.g,
                    run.brush.b,
                    run.brush.a,
                ));
                ctx.glyph_run(&font.data)
                    .font_size(run.font_size)
                    .fill_glyphs(run.glyphs.into_iter());
            }

            ctx.flush();
            let mut band = Surface::new(width, band_height)?;
            ctx.render_to_pixmap(band.pixmap_mut());
            surface.composite_band_over(&band, top as u32)?;
        }

        let width_px = layout.width();
        Ok(Advance {
            width_px,
            pen: Origin {
                x: origin.x + Fixed26_6::from_px_f32(width_px),
                y: origin.y,
            },
        })
    }
}
