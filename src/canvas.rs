use std::f64::consts::TAU;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::WheelError;
use crate::render::{PlaceholderStyle, PointerStyle, Renderer, Slice, SliceStyle, WheelGeometry};

pub fn load_font(data: Vec<u8>) -> Result<Font<'static>, WheelError> {
    Font::try_from_vec(data).ok_or(WheelError::InvalidFont)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

/// RGBA8 framebuffer with anti-aliased drawing primitives. Text is only drawn when a
/// font is attached.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at a pixel, ignoring alpha. `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    // ========================================================================
    // DRAWING PRIMITIVES
    // ========================================================================

    pub fn fill(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, alpha: f32) {
        for py in y.max(0)..(y + h).min(self.height as i32) {
            for px in x.max(0)..(x + w).min(self.width as i32) {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let (x0, x1, y0, y1) = self.bounds(cx, cy, radius + 1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = (x as f64 - cx).hypot(y as f64 - cy);
                let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if aa > 0.0 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, thickness: f64, color: Color) {
        let half = thickness / 2.0;
        let (x0, x1, y0, y1) = self.bounds(cx, cy, radius + half + 1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = (x as f64 - cx).hypot(y as f64 - cy);
                let aa = (half + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor() as i32;
        let max_x = (x0.max(x1) + pad).ceil() as i32;
        let min_y = (y0.min(y1) - pad).floor() as i32;
        let max_y = (y0.max(y1) + pad).ceil() as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - x0;
                let py = y as f64 - y0;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = (x0 + t * dx - x as f64).hypot(y0 + t * dy - y as f64);
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    pub fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: Color) {
        let edge = |p: (f64, f64), q: (f64, f64), x: f64, y: f64| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        let area = edge(a, b, c.0, c.1);
        if area == 0.0 {
            return;
        }
        let min_x = a.0.min(b.0).min(c.0).floor() as i32;
        let max_x = a.0.max(b.0).max(c.0).ceil() as i32;
        let min_y = a.1.min(b.1).min(c.1).floor() as i32;
        let max_y = a.1.max(b.1).max(c.1).ceil() as i32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (fx, fy) = (x as f64 + 0.5, y as f64 + 0.5);
                let w0 = edge(b, c, fx, fy) / area;
                let w1 = edge(c, a, fx, fy) / area;
                let w2 = edge(a, b, fx, fy) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend_pixel(x, y, color, 1.0);
                }
            }
        }
    }

    // ========================================================================
    // TEXT
    // ========================================================================

    pub fn text_width(&self, text: &str, font_size: f32) -> i32 {
        let Some(font) = self.font else {
            return 0;
        };
        let glyphs = layout(font, text, font_size);
        let (min_x, max_x, _, _) = glyph_bounds(&glyphs);
        (max_x - min_x).max(0)
    }

    /// Draws a single line of text vertically centered on `y`.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, font_size: f32, color: Color, align: Align) {
        let Some(font) = self.font else {
            return;
        };
        let glyphs = layout(font, text, font_size);
        let (min_x, max_x, min_y, max_y) = glyph_bounds(&glyphs);
        let width_px = (max_x - min_x).max(0);
        let height_px = (max_y - min_y).max(0);
        let offset_x = match align {
            Align::Left => x,
            Align::Center => x - width_px / 2,
        };
        let offset_y = y - height_px / 2;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    self.blend_pixel(px, py, color, v);
                });
            }
        }
    }

    /// Draws text centered on `(cx, cy)` and rotated clockwise by `rotation` radians.
    pub fn draw_rotated_text(
        &mut self,
        cx: f64,
        cy: f64,
        text: &str,
        font_size: f32,
        rotation: f64,
        color: Color,
    ) {
        let Some(font) = self.font else {
            return;
        };
        let glyphs = layout(font, text, font_size);
        let (min_x, max_x, min_y, max_y) = glyph_bounds(&glyphs);
        if min_x >= max_x {
            return;
        }
        let center_x = (min_x + max_x) as f64 / 2.0;
        let center_y = (min_y + max_y) as f64 / 2.0;
        let (sin_r, cos_r) = rotation.sin_cos();

        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v > 0.001 {
                        let local_x = (gx as i32 + bb.min.x) as f64 - center_x;
                        let local_y = (gy as i32 + bb.min.y) as f64 - center_y;
                        let rotated_x = local_x * cos_r - local_y * sin_r;
                        let rotated_y = local_x * sin_r + local_y * cos_r;
                        self.draw_antialiased_pixel(cx + rotated_x, cy + rotated_y, color, v);
                    }
                });
            }
        }
    }

    fn draw_antialiased_pixel(&mut self, x: f64, y: f64, color: Color, alpha: f32) {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let (xi, yi) = (x_floor as i32, y_floor as i32);

        // Spread the sample over the four nearest pixels.
        let samples = [
            (xi, yi, (1.0 - x_frac) * (1.0 - y_frac)),
            (xi + 1, yi, x_frac * (1.0 - y_frac)),
            (xi, yi + 1, (1.0 - x_frac) * y_frac),
            (xi + 1, yi + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            let final_alpha = alpha * weight as f32;
            if final_alpha > 0.001 {
                self.blend_pixel(px, py, color, final_alpha);
            }
        }
    }

    fn bounds(&self, cx: f64, cy: f64, reach: f64) -> (i32, i32, i32, i32) {
        (
            ((cx - reach).floor() as i32).max(0),
            ((cx + reach).ceil() as i32).min(self.width as i32 - 1),
            ((cy - reach).floor() as i32).max(0),
            ((cy + reach).ceil() as i32).min(self.height as i32 - 1),
        )
    }
}

fn layout(font: &Font<'static>, text: &str, font_size: f32) -> Vec<PositionedGlyph<'static>> {
    let scale = Scale::uniform(font_size);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent)).collect()
}

fn glyph_bounds(glyphs: &[PositionedGlyph<'_>]) -> (i32, i32, i32, i32) {
    let bounds = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if bounds.0 > bounds.1 {
        (0, 0, 0, 0)
    } else {
        bounds
    }
}

// ============================================================================
// WHEEL RENDERING
// ============================================================================

impl Renderer for Canvas<'_> {
    fn clear(&mut self, color: Color) {
        self.fill(color);
    }

    /// Slices are laid out with equal sweeps, so each pixel's slice is found directly
    /// from its angle in a single pass over the disc.
    fn draw_slices(&mut self, geometry: &WheelGeometry, slices: &[Slice], style: &SliceStyle) {
        let Some(first) = slices.first() else {
            return;
        };
        let WheelGeometry { cx, cy, radius } = *geometry;
        let sweep = first.sweep.max(f64::EPSILON);

        let (x0, x1, y0, y1) = self.bounds(cx, cy, radius + 1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = (x as f64 - cx, y as f64 - cy);
                let aa = (radius + 0.5 - dx.hypot(dy)).clamp(0.0, 1.0);
                if aa <= 0.0 {
                    continue;
                }
                let from_first = (dy.atan2(dx) - first.start_angle).rem_euclid(TAU);
                let index = ((from_first / sweep) as usize).min(slices.len() - 1);
                self.blend_pixel(x, y, slices[index].color, aa as f32);
            }
        }

        if slices.len() > 1 {
            for slice in slices {
                let (sin_a, cos_a) = slice.start_angle.sin_cos();
                self.draw_line(cx, cy, cx + cos_a * radius, cy + sin_a * radius, 1.0, style.outline_color);
            }
        }
        self.stroke_circle(cx, cy, radius, 1.0, style.outline_color);

        let label_radius = radius * style.label_radius_factor;
        for slice in slices {
            let mid = slice.mid_angle();
            let (sin_m, cos_m) = mid.sin_cos();
            self.draw_rotated_text(
                cx + cos_m * label_radius,
                cy + sin_m * label_radius,
                &slice.label,
                style.font_size,
                mid,
                style.label_color,
            );
        }

        self.fill_circle(cx, cy, style.hub_radius, style.hub_color);
        self.stroke_circle(cx, cy, style.hub_radius, 1.0, style.outline_color);
    }

    fn draw_placeholder(&mut self, geometry: &WheelGeometry, message: &str, style: &PlaceholderStyle) {
        let WheelGeometry { cx, cy, radius } = *geometry;
        self.fill_circle(cx, cy, radius, style.fill);
        self.stroke_circle(cx, cy, radius, 1.0, style.outline);
        self.draw_text(
            cx.round() as i32,
            cy.round() as i32,
            message,
            style.font_size,
            style.text_color,
            Align::Center,
        );
    }

    fn draw_pointer(&mut self, geometry: &WheelGeometry, style: &PointerStyle) {
        let top = geometry.cy - geometry.radius;
        let tip = (geometry.cx, top + style.size);
        let left = (geometry.cx - style.size, top - style.size * 0.5);
        let right = (geometry.cx + style.size, top - style.size * 0.5);
        self.fill_triangle(tip, left, right, style.fill);
        for (a, b) in [(tip, left), (left, right), (right, tip)] {
            self.draw_line(a.0, a.1, b.0, b.1, 1.0, style.outline);
        }
    }
}
