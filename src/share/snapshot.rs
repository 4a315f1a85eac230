//! Off-screen rendering of the timer display region.
//!
//! The region holds the progress ring, the clock, a mode bar and one dot
//! per completed session. The share controls are never part of it.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use super::{CaptureRegion, CapturedImage, ScreenCapture, ShareError};
use crate::types::{Mode, Theme};
use crate::view::DisplayProjection;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 400;

const RING_CENTER: (f64, f64) = (160.0, 160.0);
const RING_RADIUS: f64 = 140.0;
const RING_THICKNESS: f64 = 14.0;

const DIGIT_WIDTH: u32 = 30;
const DIGIT_HEIGHT: u32 = 54;
const SEGMENT: u32 = 6;
const COLON_WIDTH: u32 = 10;
const CHAR_GAP: u32 = 8;

const DOT_RADIUS: i64 = 8;
const DOT_SPACING: i64 = 24;
const DOT_ROW_Y: i64 = 350;
const MAX_DOTS: u32 = 10;

/// Segment masks (bit 0 = top, clockwise, bit 6 = middle).
const DIGIT_SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

struct Palette {
    background: Rgba<u8>,
    track: Rgba<u8>,
    foreground: Rgba<u8>,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Rgba([255, 255, 255, 255]),
                track: Rgba([229, 231, 235, 255]),
                foreground: Rgba([31, 41, 55, 255]),
            },
            Theme::Dark => Self {
                background: Rgba([31, 41, 55, 255]),
                track: Rgba([55, 65, 81, 255]),
                foreground: Rgba([243, 244, 246, 255]),
            },
        }
    }
}

fn accent(mode: Mode) -> Rgba<u8> {
    match mode {
        Mode::Focus => Rgba([239, 68, 68, 255]),
        Mode::ShortBreak => Rgba([34, 197, 94, 255]),
        Mode::LongBreak => Rgba([59, 130, 246, 255]),
    }
}

/// Renders [`CaptureRegion`]s to PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotRenderer;

impl SnapshotRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Draws the region into an RGBA buffer.
    pub fn render(&self, region: &CaptureRegion) -> RgbaImage {
        let palette = Palette::for_theme(region.theme);
        let accent = accent(region.mode);
        let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, palette.background);

        draw_ring(&mut img, &region.display, accent, palette.track);
        draw_clock(&mut img, &region.display.clock.to_string(), palette.foreground);
        fill_rect(&mut img, WIDTH / 2 - 30, 210, 60, SEGMENT, accent);
        draw_session_dots(&mut img, region.completed_focus_sessions, accent);

        img
    }

    pub fn encode(&self, img: &RgbaImage) -> Result<Vec<u8>, ShareError> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| ShareError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

impl ScreenCapture for SnapshotRenderer {
    async fn capture(&self, region: &CaptureRegion) -> Result<CapturedImage, ShareError> {
        let img = self.render(region);
        let png = self.encode(&img)?;
        debug!(bytes = png.len(), "timer display captured");
        Ok(CapturedImage {
            png,
            width: img.width(),
            height: img.height(),
        })
    }
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_ring(
    img: &mut RgbaImage,
    display: &DisplayProjection,
    filled: Rgba<u8>,
    track: Rgba<u8>,
) {
    let (cx, cy) = RING_CENTER;
    let inner = RING_RADIUS - RING_THICKNESS;
    let circumference = std::f64::consts::TAU * (RING_RADIUS - RING_THICKNESS / 2.0);
    let visible = circumference - display.stroke_offset(circumference);

    for y in 0..img.height() {
        for x in 0..img.width() {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < inner || distance > RING_RADIUS {
                continue;
            }

            // Arc length clockwise from twelve o'clock.
            let mut angle = dx.atan2(-dy);
            if angle < 0.0 {
                angle += std::f64::consts::TAU;
            }
            let arc = angle / std::f64::consts::TAU * circumference;

            let color = if arc < visible { filled } else { track };
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_clock(img: &mut RgbaImage, text: &str, color: Rgba<u8>) {
    let width: u32 = text
        .chars()
        .map(|c| if c == ':' { COLON_WIDTH } else { DIGIT_WIDTH })
        .sum::<u32>()
        + CHAR_GAP * (text.chars().count() as u32).saturating_sub(1);

    let mut x = (WIDTH - width.min(WIDTH)) / 2;
    let y = RING_CENTER.1 as u32 - DIGIT_HEIGHT / 2;

    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            draw_digit(img, x, y, DIGIT_SEGMENTS[digit as usize], color);
            x += DIGIT_WIDTH + CHAR_GAP;
        } else {
            let dot_x = x + (COLON_WIDTH - SEGMENT) / 2;
            fill_rect(img, dot_x, y + DIGIT_HEIGHT / 3 - SEGMENT / 2, SEGMENT, SEGMENT, color);
            fill_rect(img, dot_x, y + 2 * DIGIT_HEIGHT / 3 - SEGMENT / 2, SEGMENT, SEGMENT, color);
            x += COLON_WIDTH + CHAR_GAP;
        }
    }
}

fn draw_digit(img: &mut RgbaImage, x: u32, y: u32, mask: u8, color: Rgba<u8>) {
    let half = DIGIT_HEIGHT / 2;
    let segments = [
        (x, y, DIGIT_WIDTH, SEGMENT),
        (x + DIGIT_WIDTH - SEGMENT, y, SEGMENT, half),
        (x + DIGIT_WIDTH - SEGMENT, y + half, SEGMENT, half),
        (x, y + DIGIT_HEIGHT - SEGMENT, DIGIT_WIDTH, SEGMENT),
        (x, y + half, SEGMENT, half),
        (x, y, SEGMENT, half),
        (x, y + half - SEGMENT / 2, DIGIT_WIDTH, SEGMENT),
    ];

    for (bit, (sx, sy, w, h)) in segments.into_iter().enumerate() {
        if mask & (1 << bit) != 0 {
            fill_rect(img, sx, sy, w, h, color);
        }
    }
}

fn draw_session_dots(img: &mut RgbaImage, sessions: u32, color: Rgba<u8>) {
    let count = i64::from(sessions.min(MAX_DOTS));
    if count == 0 {
        return;
    }

    let first_x = i64::from(WIDTH) / 2 - (count - 1) * DOT_SPACING / 2;
    for i in 0..count {
        let cx = first_x + i * DOT_SPACING;
        for dy in -DOT_RADIUS..=DOT_RADIUS {
            for dx in -DOT_RADIUS..=DOT_RADIUS {
                if dx * dx + dy * dy > DOT_RADIUS * DOT_RADIUS {
                    continue;
                }
                let (px, py) = (cx + dx, DOT_ROW_Y + dy);
                if px >= 0 && py >= 0 && px < i64::from(WIDTH) && py < i64::from(HEIGHT) {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DurationConfig, TimerState};

    fn region(remaining_seconds: u32, sessions: u32, theme: Theme) -> CaptureRegion {
        let mut state = TimerState::new(DurationConfig::default());
        state.remaining_seconds = remaining_seconds;
        state.completed_focus_sessions = sessions;
        CaptureRegion::from_state(&state, theme)
    }

    /// A pixel in the middle of the ring band at twelve o'clock.
    fn ring_top(img: &RgbaImage) -> Rgba<u8> {
        *img.get_pixel(160, 160 - 133)
    }

    #[test]
    fn test_full_ring_is_accent() {
        let img = SnapshotRenderer::new().render(&region(1500, 0, Theme::Light));
        assert_eq!(ring_top(&img), accent(Mode::Focus));
    }

    #[test]
    fn test_empty_ring_is_track() {
        let img = SnapshotRenderer::new().render(&region(0, 0, Theme::Light));
        assert_eq!(ring_top(&img), Palette::for_theme(Theme::Light).track);
    }

    #[test]
    fn test_half_ring_follows_stroke_offset() {
        let img = SnapshotRenderer::new().render(&region(750, 0, Theme::Light));
        let track = Palette::for_theme(Theme::Light).track;

        // Three o'clock is inside the remaining half, nine o'clock is not.
        assert_eq!(*img.get_pixel(160 + 133, 160), accent(Mode::Focus));
        assert_eq!(*img.get_pixel(160 - 133, 160), track);
    }

    #[test]
    fn test_dark_theme_background() {
        let img = SnapshotRenderer::new().render(&region(1500, 0, Theme::Dark));
        assert_eq!(*img.get_pixel(0, 0), Palette::for_theme(Theme::Dark).background);
    }

    #[test]
    fn test_session_dots_drawn() {
        let renderer = SnapshotRenderer::new();
        let none = renderer.render(&region(1500, 0, Theme::Light));
        let one = renderer.render(&region(1500, 1, Theme::Light));

        let center = (WIDTH / 2, DOT_ROW_Y as u32);
        assert_eq!(*none.get_pixel(center.0, center.1), Palette::for_theme(Theme::Light).background);
        assert_eq!(*one.get_pixel(center.0, center.1), accent(Mode::Focus));
    }

    #[tokio::test]
    async fn test_capture_produces_png() {
        let image = SnapshotRenderer::new()
            .capture(&region(754, 3, Theme::Light))
            .await
            .unwrap();

        assert_eq!(&image.png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!((image.width, image.height), (WIDTH, HEIGHT));
    }
}
