use crate::foundation::{
    core::mul_div255,
    error::{CaptionError, CaptionResult},
};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> CaptionResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CaptionError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), a);
        }
    }
}

pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
