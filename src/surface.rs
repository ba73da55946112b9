// ============================================================================
// SURFACE — the signature raster and its stroke rasterizer
// ============================================================================

use egui::Pos2;
use image::{Rgba, RgbaImage};

/// Largest edge the pad will allocate. Anything wider (or a zero edge) means
/// no drawing context is available and the pad runs degraded.
pub const MAX_SURFACE_DIM: u32 = 8192;

/// Stroke parameters. Caps are always round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub width: f32,
    pub color: Rgba<u8>,
}

/// Owned RGBA raster with a background fill.
pub struct Surface {
    pixels: RgbaImage,
    background: Rgba<u8>,
}

impl Surface {
    /// Allocate a `width × height` raster filled with `background`.
    /// Returns `None` when the dimensions cannot back a drawing context.
    pub fn allocate(width: u32, height: u32, background: Rgba<u8>) -> Option<Self> {
        if width == 0 || height == 0 || width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return None;
        }
        Some(Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    /// Reset every pixel to the background.
    pub fn fill_background(&mut self) {
        let bg = self.background;
        for px in self.pixels.pixels_mut() {
            *px = bg;
        }
    }

    /// True when every pixel equals the background.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| *p == self.background)
    }

    /// Rasterize a round-capped segment directly onto the surface.
    ///
    /// Coverage of each pixel is its centre's distance to the segment measured
    /// against the pen radius, with a one-pixel anti-aliasing ramp. Endpoints
    /// outside the surface are clipped, not rejected.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, pen: &Pen) {
        let radius = pen.width * 0.5;
        let finite = |p: Pos2| p.x.is_finite() && p.y.is_finite();
        if radius <= 0.0 || !finite(from) || !finite(to) {
            return;
        }
        let reach = radius + 1.0;
        let w = self.width() as f32;
        let h = self.height() as f32;

        let min_x = (from.x.min(to.x) - reach).floor().max(0.0);
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0);
        let max_x = (from.x.max(to.x) + reach).ceil().min(w - 1.0);
        let max_y = (from.y.max(to.y) + reach).ceil().min(h - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let src_a = pen.color[3] as f32 / 255.0;
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance_to_segment(centre, from, to);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let px = self.pixels.get_pixel_mut(x, y);
                *px = blend_over(*px, pen.color, coverage * src_a);
            }
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Source-over with an explicit alpha, unmultiplied.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    let da = dst[3] as f32 / 255.0;
    let out_a = alpha + da * inv;
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let ch = |i: usize| {
        ((src[i] as f32 * alpha + dst[i] as f32 * da * inv) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([ch(0), ch(1), ch(2), (out_a * 255.0).round() as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba<u8> = Rgba([0xf8, 0xfa, 0xfc, 255]);
    const BLACK_PEN: Pen = Pen { width: 2.0, color: Rgba([0, 0, 0, 255]) };

    #[test]
    fn allocation_fills_background() {
        let s = Surface::allocate(64, 200, BG).unwrap();
        assert_eq!((s.width(), s.height()), (64, 200));
        assert!(s.is_blank());
    }

    #[test]
    fn degenerate_dimensions_yield_no_surface() {
        assert!(Surface::allocate(0, 200, BG).is_none());
        assert!(Surface::allocate(MAX_SURFACE_DIM + 1, 200, BG).is_none());
    }

    #[test]
    fn segment_paints_its_path_and_nothing_far_away() {
        let mut s = Surface::allocate(120, 60, BG).unwrap();
        s.stroke_segment(Pos2::new(10.0, 30.0), Pos2::new(110.0, 30.0), &BLACK_PEN);
        for x in [10, 40, 75, 109] {
            let px = s.pixel(x, 29).unwrap();
            assert!(px[0] < 64, "pixel ({x},29) not inked: {px:?}");
        }
        assert_eq!(s.pixel(60, 10), Some(BG));
        assert_eq!(s.pixel(60, 50), Some(BG));
    }

    #[test]
    fn caps_are_round() {
        let mut s = Surface::allocate(40, 40, BG).unwrap();
        let pen = Pen { width: 10.0, color: Rgba([0, 0, 0, 255]) };
        s.stroke_segment(Pos2::new(20.0, 20.0), Pos2::new(20.0, 20.0), &pen);
        // Corner of the bounding square lies outside the disc.
        assert_eq!(s.pixel(20, 20).unwrap()[0], 0);
        assert_eq!(s.pixel(15, 15), Some(BG));
        assert!(s.pixel(15, 20).unwrap()[0] < 64);
    }

    #[test]
    fn off_surface_segments_are_clipped() {
        let mut s = Surface::allocate(20, 20, BG).unwrap();
        s.stroke_segment(Pos2::new(-50.0, 10.0), Pos2::new(70.0, 10.0), &BLACK_PEN);
        assert!(s.pixel(0, 9).unwrap()[0] < 64);
        assert!(s.pixel(19, 9).unwrap()[0] < 64);
        s.stroke_segment(Pos2::new(-50.0, -50.0), Pos2::new(-40.0, -40.0), &BLACK_PEN);
    }

    #[test]
    fn fill_background_erases_strokes() {
        let mut s = Surface::allocate(30, 30, BG).unwrap();
        s.stroke_segment(Pos2::new(0.0, 0.0), Pos2::new(30.0, 30.0), &BLACK_PEN);
        assert!(!s.is_blank());
        s.fill_background();
        assert!(s.is_blank());
    }

    #[test]
    fn distance_clamps_to_endpoints() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Pos2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Pos2::new(13.0, 4.0), a, b), 5.0);
    }
}
