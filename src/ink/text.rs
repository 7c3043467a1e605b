//! Glyph rasterization for text annotations.

use crate::ink::model::Point;
use fontdue::{Font, FontSettings};
use once_cell::sync::Lazy;

static FONT: Lazy<Font> = Lazy::new(|| {
    Font::from_bytes(
        include_bytes!("../../assets/DejaVuSans.ttf") as &[u8],
        FontSettings::default(),
    )
    .expect("embedded font data is valid")
});

/// Stamp glyph coverage for `content` into `mask`, with the baseline of
/// the first glyph anchored at `anchor`.
pub fn stamp_text(
    mask: &mut [u8],
    width: u32,
    height: u32,
    anchor: Point,
    content: &str,
    px: f32,
) {
    if px <= 0.0 {
        return;
    }

    let baseline_x = anchor.x;
    let baseline_y = anchor.y.round() as i32;
    let mut pen_x = baseline_x;

    for ch in content.chars() {
        let (metrics, bitmap) = FONT.rasterize(ch, px);
        // Glyph bitmaps are top-down; the top row sits at
        // baseline - height - ymin (fontdue's layout convention).
        let glyph_left = pen_x.round() as i32 + metrics.xmin;
        let glyph_top = baseline_y - metrics.height as i32 - metrics.ymin;

        for (row, line) in bitmap.chunks_exact(metrics.width.max(1)).enumerate() {
            let y = glyph_top + row as i32;
            if y < 0 || y >= height as i32 {
                continue;
            }
            for (col, &coverage) in line.iter().enumerate() {
                if coverage == 0 {
                    continue;
                }
                let x = glyph_left + col as i32;
                if x < 0 || x >= width as i32 {
                    continue;
                }
                let idx = (y as u32 * width + x as u32) as usize;
                mask[idx] = mask[idx].max(coverage);
            }
        }

        pen_x += metrics.advance_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamping_a_glyph_marks_coverage_near_the_anchor() {
        let mut mask = vec![0u8; 64 * 64];
        stamp_text(&mut mask, 64, 64, Point::new(10.0, 40.0), "X", 20.0);
        assert!(mask.iter().any(|&c| c > 0));
    }

    #[test]
    fn empty_content_and_offscreen_anchor_are_safe() {
        let mut mask = vec![0u8; 16 * 16];
        stamp_text(&mut mask, 16, 16, Point::new(4.0, 8.0), "", 20.0);
        assert!(mask.iter().all(|&c| c == 0));

        // Entirely out of bounds must not panic or write.
        stamp_text(&mut mask, 16, 16, Point::new(-500.0, -500.0), "hi", 20.0);
        assert!(mask.iter().all(|&c| c == 0));
    }

    #[test]
    fn later_glyphs_advance_to_the_right() {
        let mut one = vec![0u8; 96 * 32];
        let mut two = vec![0u8; 96 * 32];
        stamp_text(&mut one, 96, 32, Point::new(2.0, 28.0), "i", 20.0);
        stamp_text(&mut two, 96, 32, Point::new(2.0, 28.0), "ii", 20.0);

        let rightmost = |mask: &[u8]| {
            (0..96 * 32)
                .filter(|&i| mask[i] > 0)
                .map(|i| i % 96)
                .max()
                .unwrap_or(0)
        };
        assert!(rightmost(&two) > rightmost(&one));
    }
}
