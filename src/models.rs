use serde::{Deserialize, Serialize};

/// Minimum contour area (pixel units) accepted as a document region.
/// Tied to the expected card size at the expected camera distance.
pub const MIN_REGION_AREA: f64 = 5000.0;

/// Maximum contour area (pixel units) accepted as a document region.
pub const MAX_REGION_AREA: f64 = 50000.0;

/// Target cadence of the detection loop, in frames per second.
pub const TARGET_FPS: u32 = 60;

/// Stroke width of the candidate overlay rectangle, in pixels.
pub const OVERLAY_STROKE: u32 = 2;

/// A pixel position in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in frame coordinates.
///
/// `bottom_right` is exclusive: a rectangle covering a `w x h` block of
/// pixels starting at `top_left` has `bottom_right = (x + w, y + h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rectangle {
    /// Build from inclusive pixel bounds, as produced by a contour scan.
    pub fn from_bounds(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            top_left: Point::new(min_x, min_y),
            bottom_right: Point::new(max_x + 1, max_y + 1),
        }
    }

    /// Rectangle covering an entire frame of the given dimensions.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self {
            top_left: Point::new(0, 0),
            bottom_right: Point::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> u32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Convert to the `imageproc` rectangle type used for drawing.
    pub fn to_rect(&self) -> imageproc::rect::Rect {
        imageproc::rect::Rect::at(self.top_left.x as i32, self.top_left.y as i32)
            .of_size(self.width().max(1), self.height().max(1))
    }
}

/// The most recent accepted document-region detection.
///
/// Overwritten whenever a frame yields a qualifying contour; left stale on
/// frames where none qualifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rectangle: Rectangle,
    pub area: f64,
}

/// Brightness/contrast parameters for the tone mapper.
///
/// Both values are clamped to [-255, 255]. The contrast remap formula is
/// singular at exactly 131, so that value is clamped to 130.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneParams {
    pub brightness: i32,
    pub contrast: i32,
}

impl ToneParams {
    pub fn new(brightness: i32, contrast: i32) -> Self {
        Self {
            brightness,
            contrast,
        }
        .clamped()
    }

    /// Identity parameters: no brightness or contrast adjustment.
    pub fn identity() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
        }
    }

    /// Clamp both parameters into range and steer contrast off the
    /// singular point of the remap formula.
    pub fn clamped(self) -> Self {
        let brightness = self.brightness.clamp(-255, 255);
        let mut contrast = self.contrast.clamp(-255, 255);
        if contrast == 131 {
            contrast = 130;
        }
        Self {
            brightness,
            contrast,
        }
    }
}

impl Default for ToneParams {
    /// Operational defaults used when enhancing a captured crop.
    fn default() -> Self {
        Self {
            brightness: 30,
            contrast: 30,
        }
    }
}
