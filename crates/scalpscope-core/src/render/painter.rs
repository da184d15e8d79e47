//! Scalp topomap painter
//!
//! Rasterizes one interpolated scalp map per call into a region of an RGBA
//! frame: head outline with nose and ears, inverse-distance-weighted
//! interpolation of the sensor values inside the scalp disk, sensor
//! markers with optional mask highlighting, and an optional colorbar.

use crate::render::colormap::Colormap;
use crate::types::FrameSize;

/// Frame background (white, opaque).
pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
/// Outline and marker edge color.
const OUTLINE: [u8; 4] = [33, 33, 33, 255];
/// Small dot drawn for unmasked sensors.
const SENSOR: [u8; 4] = [66, 66, 66, 255];

/// Head radius as a fraction of the drawing region; the remainder leaves
/// room for the nose and ears.
const HEAD_RADIUS_FRAC: f64 = 0.4;
/// Interpolation weight falloff exponent.
const IDW_POWER: f64 = 2.0;
/// Masked sensors draw as 8 px markers, unmasked as small dots.
const MASK_MARKER_RADIUS: f64 = 4.0;
const SENSOR_DOT_RADIUS: f64 = 1.5;

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Create a frame filled with the background color.
    #[must_use]
    pub fn new(size: FrameSize) -> Self {
        let mut pixels = vec![255u8; size.pixels() * 4];
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&BACKGROUND);
        }
        Self {
            width: size.width,
            height: size.height,
            pixels,
        }
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when every pixel still has the background color
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px == BACKGROUND)
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Plot a 2x2 block for ~2 px stroke weight.
    fn plot(&mut self, x: f64, y: f64, color: [u8; 4]) {
        let (x, y) = (x.round() as i64, y.round() as i64);
        for dy in 0..2 {
            for dx in 0..2 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: [u8; 4]) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f64).sqrt() <= radius {
                    self.set_pixel(cx.round() as i64 + dx, cy.round() as i64 + dy, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, color: [u8; 4]) {
        let steps = (std::f64::consts::TAU * radius).ceil().max(16.0) as usize;
        for i in 0..steps {
            let angle = std::f64::consts::TAU * i as f64 / steps as f64;
            self.plot(cx + radius * angle.cos(), cy + radius * angle.sin(), color);
        }
    }

    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: [u8; 4]) {
        let steps = (std::f64::consts::TAU * rx.max(ry)).ceil().max(16.0) as usize;
        for i in 0..steps {
            let angle = std::f64::consts::TAU * i as f64 / steps as f64;
            self.plot(cx + rx * angle.cos(), cy + ry * angle.sin(), color);
        }
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: [u8; 4]) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, color);
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
        for py in y..(y + h).min(self.height) {
            for px in x..(x + w).min(self.width) {
                self.set_pixel(i64::from(px), i64::from(py), color);
            }
        }
    }

    fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
        for px in x..(x + w).min(self.width) {
            self.set_pixel(i64::from(px), i64::from(y), color);
            self.set_pixel(i64::from(px), i64::from(y + h.saturating_sub(1)), color);
        }
        for py in y..(y + h).min(self.height) {
            self.set_pixel(i64::from(x), i64::from(py), color);
            self.set_pixel(i64::from(x + w.saturating_sub(1)), i64::from(py), color);
        }
    }
}

/// A sub-region of a frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Rect {
    /// Create a region.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Placement and value range of a painted colorbar, for host-side labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorbarLayout {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Bar width in pixels
    pub width: u32,
    /// Bar height in pixels
    pub height: u32,
    /// Value at the bottom of the bar
    pub vmin: f64,
    /// Value at the top of the bar
    pub vmax: f64,
}

/// Paints scalp maps into [`Frame`] regions.
#[derive(Debug, Clone, Copy)]
pub struct TopomapPainter {
    colormap: Colormap,
}

impl TopomapPainter {
    /// Create a painter using the given colormap.
    #[must_use]
    pub const fn new(colormap: Colormap) -> Self {
        Self { colormap }
    }

    /// Paint one scalp map into `region`.
    ///
    /// `sensors` are unit-disk positions (nose toward +y), one per value.
    /// `mask` selects sensors drawn with the highlight marker; it may be
    /// shorter than the sensor list. `limit` is the symmetric value range:
    /// values map onto `[-limit, +limit]`; a non-positive limit renders the
    /// whole scalp at the colormap midpoint.
    pub fn paint_map(
        &self,
        frame: &mut Frame,
        region: Rect,
        sensors: &[[f64; 2]],
        values: &[f64],
        mask: &[bool],
        limit: f64,
    ) {
        let size = f64::from(region.width.min(region.height));
        if size < 8.0 || sensors.is_empty() {
            return;
        }
        let cx = f64::from(region.x) + f64::from(region.width) / 2.0;
        let cy = f64::from(region.y) + f64::from(region.height) / 2.0;
        let radius = size * HEAD_RADIUS_FRAC;

        self.paint_surface(frame, cx, cy, radius, sensors, values, limit);
        paint_head(frame, cx, cy, radius);
        paint_sensors(frame, cx, cy, radius, sensors, mask);
    }

    /// Paint the vertical colorbar into the right gutter of `frame`.
    ///
    /// Returns the layout so the embedding tier can attach min/max labels.
    pub fn paint_colorbar(&self, frame: &mut Frame, vmin: f64, vmax: f64) -> ColorbarLayout {
        let bar_width = 20u32.min(frame.width / 8).max(4);
        let bar_height = (f64::from(frame.height) * 0.6) as u32;
        let bar_x = frame.width.saturating_sub(2 * bar_width);
        let bar_y = (frame.height - bar_height) / 2;

        for i in 0..bar_height {
            let t = 1.0 - f64::from(i) / f64::from(bar_height.max(1));
            let color = self.colormap.sample(t);
            frame.fill_rect(bar_x, bar_y + i, bar_width, 1, color);
        }
        frame.stroke_rect(bar_x, bar_y, bar_width, bar_height, OUTLINE);

        ColorbarLayout {
            x: bar_x,
            y: bar_y,
            width: bar_width,
            height: bar_height,
            vmin,
            vmax,
        }
    }

    /// Interpolated surface inside the scalp disk.
    fn paint_surface(
        &self,
        frame: &mut Frame,
        cx: f64,
        cy: f64,
        radius: f64,
        sensors: &[[f64; 2]],
        values: &[f64],
        limit: f64,
    ) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                let nx = dx as f64 / radius;
                let ny = -dy as f64 / radius;
                if nx * nx + ny * ny > 1.0 {
                    continue;
                }
                let value = interpolate_idw(sensors, values, nx, ny);
                let t = if limit > 0.0 {
                    (value + limit) / (2.0 * limit)
                } else {
                    0.5
                };
                frame.set_pixel(
                    cx.round() as i64 + dx,
                    cy.round() as i64 + dy,
                    self.colormap.sample(t),
                );
            }
        }
    }
}

/// Inverse-distance-weighted interpolation at a unit-disk point.
fn interpolate_idw(sensors: &[[f64; 2]], values: &[f64], x: f64, y: f64) -> f64 {
    let mut sum_weights = 0.0;
    let mut sum_values = 0.0;
    for (&[sx, sy], &value) in sensors.iter().zip(values) {
        let dist = ((x - sx) * (x - sx) + (y - sy) * (y - sy)).sqrt();
        if dist < 1e-3 {
            return value;
        }
        let weight = dist.powf(-IDW_POWER);
        sum_weights += weight;
        sum_values += weight * value;
    }
    if sum_weights > 0.0 {
        sum_values / sum_weights
    } else {
        0.0
    }
}

/// Head circle, nose, and ears (nose at the top).
fn paint_head(frame: &mut Frame, cx: f64, cy: f64, radius: f64) {
    frame.stroke_circle(cx, cy, radius, OUTLINE);

    let nose_half = radius * 0.08;
    let nose_tip = cy - radius * 1.12;
    frame.draw_line(cx - nose_half, cy - radius, cx, nose_tip, OUTLINE);
    frame.draw_line(cx + nose_half, cy - radius, cx, nose_tip, OUTLINE);

    let ear_rx = radius * 0.05;
    let ear_ry = radius * 0.15;
    frame.stroke_ellipse(cx - radius - ear_rx, cy, ear_rx, ear_ry, OUTLINE);
    frame.stroke_ellipse(cx + radius + ear_rx, cy, ear_rx, ear_ry, OUTLINE);
}

/// Sensor markers; masked sensors get the highlight style.
fn paint_sensors(
    frame: &mut Frame,
    cx: f64,
    cy: f64,
    radius: f64,
    sensors: &[[f64; 2]],
    mask: &[bool],
) {
    for (i, &[sx, sy]) in sensors.iter().enumerate() {
        let px = cx + sx * radius;
        let py = cy - sy * radius;
        if mask.get(i).copied().unwrap_or(false) {
            frame.fill_circle(px, py, MASK_MARKER_RADIUS, BACKGROUND);
            frame.stroke_circle(px, py, MASK_MARKER_RADIUS, OUTLINE);
        } else {
            frame.fill_circle(px, py, SENSOR_DOT_RADIUS, SENSOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameSize;

    fn sensors() -> Vec<[f64; 2]> {
        vec![[0.0, 0.8], [-0.6, -0.4], [0.6, -0.4]]
    }

    #[test]
    fn test_new_frame_is_blank() {
        let frame = Frame::new(FrameSize::new(64, 48));
        assert_eq!(frame.pixels().len(), 64 * 48 * 4);
        assert!(frame.is_blank());
    }

    #[test]
    fn test_paint_map_writes_pixels() {
        let mut frame = Frame::new(FrameSize::new(120, 100));
        let painter = TopomapPainter::new(Colormap::CoolWarm);
        painter.paint_map(
            &mut frame,
            Rect::new(0, 0, 120, 100),
            &sensors(),
            &[1.0, -1.0, 0.5],
            &[],
            1.0,
        );
        assert!(!frame.is_blank());
    }

    #[test]
    fn test_paint_map_stays_inside_region() {
        let mut frame = Frame::new(FrameSize::new(200, 100));
        let painter = TopomapPainter::new(Colormap::CoolWarm);
        // Paint only into the left half; nose/ears stay within the region
        // margins because the head radius leaves 10% slack.
        painter.paint_map(
            &mut frame,
            Rect::new(0, 0, 100, 100),
            &sensors(),
            &[1.0, -1.0, 0.5],
            &[],
            1.0,
        );
        let width = frame.width() as usize;
        for y in 0..frame.height() as usize {
            for x in 110..width {
                let idx = (y * width + x) * 4;
                assert_eq!(&frame.pixels()[idx..idx + 4], &BACKGROUND);
            }
        }
    }

    #[test]
    fn test_zero_limit_renders_midpoint() {
        let mut frame = Frame::new(FrameSize::new(80, 80));
        let painter = TopomapPainter::new(Colormap::CoolWarm);
        painter.paint_map(
            &mut frame,
            Rect::new(0, 0, 80, 80),
            &sensors(),
            &[0.0, 0.0, 0.0],
            &[],
            0.0,
        );
        // Center pixel sits inside the disk away from any marker and must
        // carry the colormap midpoint.
        let idx = (40 * 80 + 40) * 4;
        let expected = Colormap::CoolWarm.sample(0.5);
        assert_eq!(&frame.pixels()[idx..idx + 4], &expected);
    }

    #[test]
    fn test_mask_changes_marker_pixels() {
        let size = FrameSize::new(100, 100);
        let map_sensors = sensors();
        let values = [0.0, 0.0, 0.0];
        let painter = TopomapPainter::new(Colormap::CoolWarm);

        let mut plain = Frame::new(size);
        painter.paint_map(
            &mut plain,
            Rect::new(0, 0, 100, 100),
            &map_sensors,
            &values,
            &[false, false, false],
            1.0,
        );
        let mut masked = Frame::new(size);
        painter.paint_map(
            &mut masked,
            Rect::new(0, 0, 100, 100),
            &map_sensors,
            &values,
            &[true, false, false],
            1.0,
        );
        assert_ne!(plain, masked);
    }

    #[test]
    fn test_idw_hits_sensor_value_exactly() {
        let map_sensors = sensors();
        let values = [3.0, -1.0, 2.0];
        assert_eq!(interpolate_idw(&map_sensors, &values, 0.0, 0.8), 3.0);
        // Between sensors the estimate stays within the value range.
        let mid = interpolate_idw(&map_sensors, &values, 0.0, 0.0);
        assert!(mid > -1.0 && mid < 3.0);
    }

    #[test]
    fn test_colorbar_layout_and_gradient() {
        let mut frame = Frame::new(FrameSize::new(200, 100));
        let painter = TopomapPainter::new(Colormap::CoolWarm);
        let layout = painter.paint_colorbar(&mut frame, -5.0, 5.0);
        assert_eq!(layout.vmin, -5.0);
        assert_eq!(layout.vmax, 5.0);
        assert!(layout.x + layout.width <= frame.width());
        // Top of the bar carries the high end of the colormap (red side).
        let x = (layout.x + layout.width / 2) as usize;
        let y = (layout.y + 1) as usize;
        let idx = (y * frame.width() as usize + x) * 4;
        let px = &frame.pixels()[idx..idx + 4];
        assert!(px[0] > px[2]);
    }
}
