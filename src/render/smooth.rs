use crate::foundation::error::{EgoviewError, EgoviewResult};
use crate::render::frame::FrameRGB;

/// One 3x3 box-filter pass over an RGB8 frame, edges clamped.
///
/// Runs as two separable 3-tap passes; a constant frame comes back unchanged.
pub fn box3x3(frame: &FrameRGB) -> EgoviewResult<FrameRGB> {
    let expected_len = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| EgoviewError::evaluation("smoothing buffer size overflow"))?;
    if frame.data.len() != expected_len {
        return Err(EgoviewError::evaluation(
            "box3x3 expects data matching width*height*3",
        ));
    }
    if frame.width == 0 || frame.height == 0 {
        return Ok(frame.clone());
    }

    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    horizontal_pass(&frame.data, &mut tmp, frame.width, frame.height);
    vertical_pass(&tmp, &mut out, frame.width, frame.height);
    Ok(FrameRGB {
        width: frame.width,
        height: frame.height,
        data: out,
    })
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32) {
    let w = width as i64;
    for y in 0..height as i64 {
        for x in 0..w {
            let mut acc = [0u32; 3];
            for dx in -1..=1 {
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u32::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = div3(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32) {
    let w = width as i64;
    let h = height as i64;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 3];
            for dy in -1..=1 {
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u32::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = div3(acc[c]);
            }
        }
    }
}

fn div3(acc: u32) -> u8 {
    ((acc + 1) / 3).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/smooth.rs"]
mod tests;
