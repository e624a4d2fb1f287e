//! Signature capture pad
//!
//! Collects pen strokes on a fixed-size canvas and, on save, rasterizes them
//! into a PNG data URL suitable for `reviewer_signature_base64`. The pad does
//! no I/O; persisting the payload is up to the caller's completion callback.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::error::{AppraiseError, Result};

pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Prefix of every payload produced by [`SignaturePad::save`]
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Largest canvas edge accepted by [`SignaturePad::new`]
pub const MAX_DIMENSION: u32 = 4096;

const PEN_RADIUS: i64 = 1;
const INK: [u8; 4] = [0, 0, 0, 255];

/// Canvas coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Pad lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadState {
    /// Editable; clear and save are available
    Unsigned,
    /// Locked, holding the saved payload
    Signed(String),
}

#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
    state: PadState,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl SignaturePad {
    /// Canvas of the given size, clamped to `1..=MAX_DIMENSION` per edge
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(1, MAX_DIMENSION),
            height: height.clamp(1, MAX_DIMENSION),
            strokes: Vec::new(),
            drawing: false,
            state: PadState::Unsigned,
        }
    }

    /// Pad showing a signature captured earlier. Always locked.
    pub fn with_existing(payload: impl Into<String>) -> Self {
        let mut pad = Self::default();
        pad.state = PadState::Signed(payload.into());
        pad
    }

    pub fn state(&self) -> &PadState {
        &self.state
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.state, PadState::Signed(_))
    }

    /// Saved payload, once signed
    pub fn signature(&self) -> Option<&str> {
        match &self.state {
            PadState::Signed(payload) => Some(payload),
            PadState::Unsigned => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(|s| s.is_empty())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pen_down(&mut self, at: Point) {
        if self.is_signed() {
            return;
        }
        let at = self.clamp(at);
        self.strokes.push(vec![at]);
        self.drawing = true;
    }

    pub fn pen_move(&mut self, to: Point) {
        if self.is_signed() || !self.drawing {
            return;
        }
        let to = self.clamp(to);
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(to);
        }
    }

    pub fn pen_up(&mut self) {
        self.drawing = false;
    }

    /// Append a whole stroke
    pub fn stroke(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.pen_down(*first);
        for point in rest {
            self.pen_move(*point);
        }
        self.pen_up();
    }

    /// Wipe the canvas. Keeps the pad unsigned; ignored once signed.
    pub fn clear(&mut self) {
        if self.is_signed() {
            return;
        }
        self.strokes.clear();
        self.drawing = false;
    }

    /// Encode the canvas and hand the payload to `on_save`.
    ///
    /// Returns `Ok(false)` without calling back when the canvas is empty or
    /// the pad is already signed. On success the pad locks.
    pub fn save<F>(&mut self, on_save: F) -> Result<bool>
    where
        F: FnOnce(&str),
    {
        if self.is_signed() || self.is_empty() {
            debug!("Nothing to save on signature pad");
            return Ok(false);
        }

        let payload = self.to_data_url()?;
        on_save(&payload);
        self.drawing = false;
        self.state = PadState::Signed(payload);
        Ok(true)
    }

    /// Current canvas as a PNG data URL
    pub fn to_data_url(&self) -> Result<String> {
        let png = encode_png(self.width, self.height, &self.rasterize())?;
        Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(png)))
    }

    fn clamp(&self, p: Point) -> Point {
        Point {
            x: p.x.min(self.width - 1),
            y: p.y.min(self.height - 1),
        }
    }

    /// RGBA pixels: transparent background, black ink
    fn rasterize(&self) -> Vec<u8> {
        let mut pixels = vec![0u8; self.width as usize * self.height as usize * 4];

        for stroke in &self.strokes {
            match stroke.as_slice() {
                [] => {}
                [only] => self.stamp(&mut pixels, i64::from(only.x), i64::from(only.y)),
                points => {
                    for pair in points.windows(2) {
                        self.line(&mut pixels, pair[0], pair[1]);
                    }
                }
            }
        }
        pixels
    }

    fn line(&self, pixels: &mut [u8], from: Point, to: Point) {
        let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(pixels, x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn stamp(&self, pixels: &mut [u8], cx: i64, cy: i64) {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        for y in (cy - PEN_RADIUS)..=(cy + PEN_RADIUS) {
            for x in (cx - PEN_RADIUS)..=(cx + PEN_RADIUS) {
                if x < 0 || y < 0 || x >= w || y >= h {
                    continue;
                }
                let offset = ((y * w + x) * 4) as usize;
                pixels[offset..offset + 4].copy_from_slice(&INK);
            }
        }
    }
}

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppraiseError::Signature(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| AppraiseError::Signature(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| AppraiseError::Signature(e.to_string()))?;
    }
    Ok(out)
}

/// Raw PNG bytes of a signature data URL
pub fn decode_data_url(payload: &str) -> Result<Vec<u8>> {
    let encoded = payload
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| AppraiseError::Signature("not a PNG data URL".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| AppraiseError::Signature(format!("invalid base64: {}", e)))
}

/// Parse a stroke written as space-separated `x,y` pairs
pub fn parse_stroke(input: &str) -> Result<Vec<Point>> {
    input
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(|| {
                AppraiseError::Signature(format!("expected x,y but got '{}'", pair))
            })?;
            let parse = |v: &str| {
                v.trim()
                    .parse::<u32>()
                    .map_err(|_| AppraiseError::Signature(format!("bad coordinate '{}'", v)))
            };
            Ok(Point::new(parse(x)?, parse(y)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scribble(pad: &mut SignaturePad) {
        pad.pen_down(Point::new(10, 10));
        pad.pen_move(Point::new(60, 40));
        pad.pen_move(Point::new(120, 15));
        pad.pen_up();
    }

    #[test]
    fn test_save_on_empty_canvas_is_noop() {
        let mut pad = SignaturePad::default();
        let mut calls = 0;

        let saved = pad.save(|_| calls += 1).unwrap();

        assert!(!saved);
        assert_eq!(calls, 0);
        assert_eq!(pad.state(), &PadState::Unsigned);
    }

    #[test]
    fn test_save_calls_back_once_and_locks() {
        let mut pad = SignaturePad::default();
        scribble(&mut pad);

        let mut received = Vec::new();
        let saved = pad.save(|payload| received.push(payload.to_string())).unwrap();

        assert!(saved);
        assert_eq!(received.len(), 1);
        assert!(received[0].starts_with(DATA_URL_PREFIX));
        assert!(received[0].len() > DATA_URL_PREFIX.len());
        assert_eq!(pad.signature(), Some(received[0].as_str()));

        // Locked: a second save does nothing
        let mut again = 0;
        assert!(!pad.save(|_| again += 1).unwrap());
        assert_eq!(again, 0);
    }

    #[test]
    fn test_clear_keeps_pad_unsigned() {
        let mut pad = SignaturePad::default();
        scribble(&mut pad);
        pad.clear();

        assert!(pad.is_empty());
        assert!(!pad.is_signed());
        assert!(!pad.save(|_| {}).unwrap());
    }

    #[test]
    fn test_signed_pad_ignores_edits() {
        let mut pad = SignaturePad::with_existing("data:image/png;base64,AAAA");
        pad.pen_down(Point::new(1, 1));
        pad.pen_move(Point::new(5, 5));
        pad.clear();

        assert!(pad.is_empty());
        assert_eq!(pad.signature(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_payload_is_a_png_of_canvas_size() {
        let mut pad = SignaturePad::new(64, 32);
        pad.stroke(&[Point::new(0, 0), Point::new(63, 31)]);
        let url = pad.to_data_url().unwrap();

        let bytes = decode_data_url(&url).unwrap();
        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (64, 32));
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }

    #[test]
    fn test_oversized_canvas_is_clamped() {
        let mut pad = SignaturePad::new(u32::MAX, 0);
        assert_eq!(pad.dimensions(), (MAX_DIMENSION, 1));

        pad.stroke(&[Point::new(0, 0), Point::new(u32::MAX, 5)]);
        assert_eq!(pad.rasterize().len(), MAX_DIMENSION as usize * 4);
    }

    #[test]
    fn test_ink_follows_strokes() {
        let mut pad = SignaturePad::new(20, 10);
        pad.stroke(&[Point::new(2, 5), Point::new(17, 5)]);
        let pixels = pad.rasterize();

        let alpha = |x: usize, y: usize| pixels[(y * 20 + x) * 4 + 3];
        assert_eq!(alpha(10, 5), 255);
        assert_eq!(alpha(10, 6), 255);
        assert_eq!(alpha(10, 0), 0);
    }

    #[test]
    fn test_points_outside_canvas_are_clamped() {
        let mut pad = SignaturePad::new(10, 10);
        pad.stroke(&[Point::new(500, 500)]);
        assert_eq!(pad.stroke_count(), 1);
        assert!(pad.to_data_url().is_ok());
    }

    #[test]
    fn test_move_without_pen_down_is_ignored() {
        let mut pad = SignaturePad::default();
        pad.pen_move(Point::new(3, 3));
        assert!(pad.is_empty());
    }

    #[test]
    fn test_parse_stroke() {
        let points = parse_stroke("10,10 20,15  30,5").unwrap();
        assert_eq!(points, vec![Point::new(10, 10), Point::new(20, 15), Point::new(30, 5)]);
        assert!(parse_stroke("10;10").is_err());
        assert!(parse_stroke("a,1").is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_payloads() {
        assert!(decode_data_url("data:image/jpeg;base64,AAAA").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }
}
