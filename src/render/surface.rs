use crate::{
    foundation::{
        core::Rgba8,
        error::{CaptionError, CaptionResult},
    },
    render::composite,
};

/// Premultiplied RGBA8 raster, row-major and tightly packed.
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl Surface {
    /// Allocates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> CaptionResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| CaptionError::validation(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height.try_into().map_err(|_| {
            CaptionError::validation(format!("surface height {height} exceeds u16"))
        })?;
        if w == 0 || h == 0 {
            return Err(CaptionError::validation(format!(
                "surface must be non-empty (got {width}x{height})"
            )));
        }
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> CaptionResult<Self> {
        let mut surface = Self::new(width, height)?;
        let data = surface.pixmap.data_as_u8_slice_mut();
        if data.len() != rgba8_premul.len() {
            return Err(CaptionError::validation(format!(
                "pixel buffer of {} bytes does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        data.copy_from_slice(rgba8_premul);
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        let px = &self.data()[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn fill(&mut self, color: Rgba8) {
        let premul = color.premultiplied();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Copies `src` over this surface, replacing destination pixels (alpha included).
    ///
    /// Destination pixel `(x, y)` takes source pixel `(x + src_origin.0, y + src_origin.1)`;
    /// destination pixels whose source falls outside `src` are left untouched.
    pub fn blit_src(&mut self, src: &Surface, src_origin: (i64, i64)) {
        let (dw, dh) = (i64::from(self.width()), i64::from(self.height()));
        let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
        let (ox, oy) = src_origin;

        let x0 = 0i64.max(-ox);
        let x1 = dw.min(sw - ox);
        let y0 = 0i64.max(-oy);
        let y1 = dh.min(sh - oy);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = ((x1 - x0) * 4) as usize;
        let src_data = src.data();
        let dst_data = self.pixmap.data_as_u8_slice_mut();
        for y in y0..y1 {
            let d = ((y * dw + x0) * 4) as usize;
            let s = (((y + oy) * sw + (x0 + ox)) * 4) as usize;
            dst_data[d..d + span].copy_from_slice(&src_data[s..s + span]);
        }
    }

    /// Source-over composite of a same-sized layer onto this surface.
    pub fn composite_over(&mut self, layer: &Surface) -> CaptionResult<()> {
        if layer.height() != self.height() {
            return Err(CaptionError::render("composite layer size mismatch"));
        }
        self.composite_band_over(layer, 0)
    }

    /// Source-over composite of a full-width band whose first row lands on row `top`.
    pub fn composite_band_over(&mut self, band: &Surface, top: u32) -> CaptionResult<()> {
        if band.width() != self.width() || top + band.height() > self.height() {
            return Err(CaptionError::render(format!(
                "band {}x{} at row {top} does not fit {}x{} surface",
                band.width(),
                band.height(),
                self.width(),
                self.height()
            )));
        }
        let row_bytes = self.width() as usize * 4;
        let start = top as usize * row_bytes;
        let end = start + band.height() as usize * row_bytes;
        composite::over_in_place(
            &mut self.pixmap.data_as_u8_slice_mut()[start..end],
            band.data(),
        )
    }

    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut straight = self.data().to_vec();
        composite::unpremultiply_in_place(&mut straight);
        straight
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}
