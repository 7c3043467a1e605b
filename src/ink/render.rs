//! Retained-mode redraw: the canvas is reconstructed from scratch on
//! every call by replaying the committed history in order, then the
//! in-progress record, then the spotlight mask. Output is a pure function
//! of those inputs.
//!
//! Each record is first stamped into a coverage mask and then composited
//! once, so a stroke that crosses itself still paints with uniform
//! opacity. Replay cost grows linearly with history size; large histories
//! would want a cached committed-layer raster, which this deliberately
//! does not build.

use crate::ink::history::History;
use crate::ink::model::{
    Annotation, Color, Point, Rect, ARROW_HEAD_FACTOR, TEXT_SIZE_FACTOR,
};
use crate::ink::text;

/// Diameter of the undimmed hole around the cursor in spotlight mode.
pub const SPOTLIGHT_DIAMETER: f32 = 200.0;
const SPOTLIGHT_DIM_ALPHA: f32 = 0.55;

/// RGBA8 drawing surface (straight alpha), exclusively owned by the
/// render pipeline and written only during [`Canvas::redraw`].
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    mask: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![0; len * 4],
            mask: vec![0; len],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        let len = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.pixels = vec![0; len * 4];
        self.mask = vec![0; len];
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = ((y * self.width + x) * 4) as usize;
        Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Full clear and replay. `in_progress` is painted on top without
    /// being committed; `spotlight` dims everything outside a circular
    /// hole around the given cursor position.
    pub fn redraw(
        &mut self,
        history: &History,
        in_progress: Option<&Annotation>,
        spotlight: Option<Point>,
    ) {
        self.pixels.fill(0);
        for record in history.records() {
            self.paint(record);
        }
        if let Some(active) = in_progress {
            self.paint(active);
        }
        if let Some(cursor) = spotlight {
            apply_spotlight(&mut self.pixels, self.width, self.height, cursor);
        }
    }

    fn paint(&mut self, record: &Annotation) {
        self.mask.fill(0);
        let (w, h) = (self.width, self.height);
        match record {
            Annotation::Path {
                points,
                color,
                width,
                opacity,
            } => {
                stamp_polyline(&mut self.mask, w, h, points, *width);
                composite_mask(&mut self.pixels, &self.mask, *color, *opacity);
            }
            Annotation::Eraser { points, width } => {
                stamp_polyline(&mut self.mask, w, h, points, *width);
                erase_mask(&mut self.pixels, &self.mask);
            }
            Annotation::Rectangle { rect, color, width } => {
                stamp_rect(&mut self.mask, w, h, rect, *width);
                composite_mask(&mut self.pixels, &self.mask, *color, 1.0);
            }
            Annotation::Circle { rect, color, width } => {
                stamp_ellipse(&mut self.mask, w, h, rect, *width);
                composite_mask(&mut self.pixels, &self.mask, *color, 1.0);
            }
            Annotation::Line {
                start,
                end,
                color,
                width,
            } => {
                stamp_segment(&mut self.mask, w, h, *start, *end, *width);
                composite_mask(&mut self.pixels, &self.mask, *color, 1.0);
            }
            Annotation::Arrow {
                start,
                end,
                color,
                width,
            } => {
                stamp_segment(&mut self.mask, w, h, *start, *end, *width);
                stamp_triangle(&mut self.mask, w, h, arrow_head(*start, *end, *width));
                composite_mask(&mut self.pixels, &self.mask, *color, 1.0);
            }
            Annotation::Text {
                anchor,
                content,
                color,
                size,
            } => {
                text::stamp_text(
                    &mut self.mask,
                    w,
                    h,
                    *anchor,
                    content,
                    size * TEXT_SIZE_FACTOR,
                );
                composite_mask(&mut self.pixels, &self.mask, *color, 1.0);
            }
        }
    }
}

/// Corners of the filled arrow head: tip first, then the two wings at
/// ±π/6 off the shaft direction, head length 4× the stroke width.
pub fn arrow_head(start: Point, end: Point, width: f32) -> [Point; 3] {
    let head_len = ARROW_HEAD_FACTOR * width;
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |offset: f32| {
        Point::new(
            end.x - head_len * (angle + offset).cos(),
            end.y - head_len * (angle + offset).sin(),
        )
    };
    [
        end,
        wing(-std::f32::consts::FRAC_PI_6),
        wing(std::f32::consts::FRAC_PI_6),
    ]
}

fn idx(width: u32, x: i32, y: i32) -> usize {
    (y as u32 * width + x as u32) as usize
}

/// Round brush: every pixel within `radius` of the center.
fn stamp_disc(mask: &mut [u8], width: u32, height: u32, center: Point, radius: f32) {
    let r = radius.max(0.5);
    let r_sq = r * r;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    let reach = r.ceil() as i32;

    for dy in -reach..=reach {
        let y = cy + dy;
        if y < 0 || y >= height as i32 {
            continue;
        }
        for dx in -reach..=reach {
            let x = cx + dx;
            if x < 0 || x >= width as i32 {
                continue;
            }
            if (dx * dx + dy * dy) as f32 <= r_sq {
                mask[idx(width, x, y)] = 255;
            }
        }
    }
}

/// Bresenham walk stamping the round brush at every step, which gives
/// round caps and joins for free.
fn stamp_segment(mask: &mut [u8], width: u32, height: u32, a: Point, b: Point, stroke: f32) {
    let radius = stroke * 0.5;
    let mut x0 = a.x.round() as i32;
    let mut y0 = a.y.round() as i32;
    let x1 = b.x.round() as i32;
    let y1 = b.y.round() as i32;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp_disc(mask, width, height, Point::new(x0 as f32, y0 as f32), radius);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn stamp_polyline(mask: &mut [u8], width: u32, height: u32, points: &[Point], stroke: f32) {
    match points {
        [] => {}
        [only] => stamp_disc(mask, width, height, *only, stroke * 0.5),
        _ => {
            for pair in points.windows(2) {
                stamp_segment(mask, width, height, pair[0], pair[1], stroke);
            }
        }
    }
}

fn stamp_rect(mask: &mut [u8], width: u32, height: u32, rect: &Rect, stroke: f32) {
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.x + rect.w, rect.y);
    let br = Point::new(rect.x + rect.w, rect.y + rect.h);
    let bl = Point::new(rect.x, rect.y + rect.h);
    stamp_segment(mask, width, height, tl, tr, stroke);
    stamp_segment(mask, width, height, tr, br, stroke);
    stamp_segment(mask, width, height, br, bl, stroke);
    stamp_segment(mask, width, height, bl, tl, stroke);
}

/// Ellipse inscribed in the bounding box, stepped parametrically at
/// roughly one brush stamp per perimeter pixel.
fn stamp_ellipse(mask: &mut [u8], width: u32, height: u32, rect: &Rect, stroke: f32) {
    let rx = (rect.w * 0.5).max(0.5);
    let ry = (rect.h * 0.5).max(0.5);
    let center = rect.center();

    let circumference = std::f32::consts::TAU * rx.max(ry);
    let steps = circumference.max(12.0) as usize;

    for step in 0..=steps {
        let t = (step as f32 / steps as f32) * std::f32::consts::TAU;
        let point = Point::new(center.x + rx * t.cos(), center.y + ry * t.sin());
        stamp_disc(mask, width, height, point, stroke * 0.5);
    }
}

fn stamp_triangle(mask: &mut [u8], width: u32, height: u32, corners: [Point; 3]) {
    let [a, b, c] = corners;
    let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if area.abs() < f32::EPSILON {
        // Degenerate head (zero-length arrow): nothing beyond the shaft.
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as i32;
    let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32 - 1.0) as i32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i32;
    let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32 - 1.0) as i32;

    let edge = |p: Point, q: Point, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (fx, fy) = (x as f32, y as f32);
            let e0 = edge(a, b, fx, fy) * area.signum();
            let e1 = edge(b, c, fx, fy) * area.signum();
            let e2 = edge(c, a, fx, fy) * area.signum();
            if e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0 {
                mask[idx(width, x, y)] = 255;
            }
        }
    }
}

/// Source-over blend of `color` (scaled by `opacity`) wherever the mask
/// has coverage. One pass per record keeps self-crossing strokes uniform.
fn composite_mask(pixels: &mut [u8], mask: &[u8], color: Color, opacity: f32) {
    let base_alpha = (color.a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if base_alpha <= 0.0 {
        return;
    }

    for (px, &coverage) in pixels.chunks_exact_mut(4).zip(mask.iter()) {
        if coverage == 0 {
            continue;
        }
        let src_a = base_alpha * (coverage as f32 / 255.0);
        let dst_a = px[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            continue;
        }

        let blend = |src: u8, dst: u8| {
            let src = src as f32 / 255.0;
            let dst = dst as f32 / 255.0;
            let out = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
            (out * 255.0).round() as u8
        };
        px[0] = blend(color.r, px[0]);
        px[1] = blend(color.g, px[1]);
        px[2] = blend(color.b, px[2]);
        px[3] = (out_a * 255.0).round() as u8;
    }
}

/// Destination-out: coverage removes alpha instead of adding color.
fn erase_mask(pixels: &mut [u8], mask: &[u8]) {
    for (px, &coverage) in pixels.chunks_exact_mut(4).zip(mask.iter()) {
        if coverage == 0 {
            continue;
        }
        let keep = 1.0 - coverage as f32 / 255.0;
        px[3] = (px[3] as f32 * keep).round() as u8;
    }
}

fn apply_spotlight(pixels: &mut [u8], width: u32, height: u32, cursor: Point) {
    let radius = SPOTLIGHT_DIAMETER * 0.5;
    let r_sq = radius * radius;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cursor.x;
            let dy = y as f32 - cursor.y;
            if dx * dx + dy * dy <= r_sq {
                continue;
            }
            let i = idx(width, x as i32, y as i32);
            let px = &mut pixels[i..i + 4];
            let src_a = SPOTLIGHT_DIM_ALPHA;
            let dst_a = px[3] as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            let blend = |dst: u8| {
                let dst = dst as f32 / 255.0;
                ((dst * dst_a * (1.0 - src_a)) / out_a * 255.0).round() as u8
            };
            px[0] = blend(px[0]);
            px[1] = blend(px[1]);
            px[2] = blend(px[2]);
            px[3] = (out_a * 255.0).round() as u8;
        }
    }
}
