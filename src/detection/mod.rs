pub mod contours;
pub mod preprocessing;

use image::RgbaImage;
use tracing::debug;

use crate::models::{Candidate, MAX_REGION_AREA, MIN_REGION_AREA};

/// Sigma approximating the 5x5 Gaussian kernel used for noise suppression.
const DEFAULT_BLUR_SIGMA: f32 = 1.1;

/// Document-region detector: one RGBA frame in, zero-or-one candidate out.
pub struct RegionDetector {
    /// Inclusive lower bound on accepted contour area, in pixel units.
    pub min_area: f64,
    /// Inclusive upper bound on accepted contour area, in pixel units.
    pub max_area: f64,
    pub blur_sigma: f32,
}

impl RegionDetector {
    pub fn new() -> Self {
        Self {
            min_area: MIN_REGION_AREA,
            max_area: MAX_REGION_AREA,
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }

    pub fn with_area_range(mut self, min_area: f64, max_area: f64) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    /// Run the detection pass on a single frame.
    ///
    /// Grayscale, blur, Otsu binarization, contour extraction, then the
    /// *first* contour whose area falls inside the configured range wins.
    /// First-fit is deliberate: callers must not assume largest-match
    /// semantics. Returns `None` when no contour qualifies.
    pub fn detect(&self, frame: &RgbaImage) -> Option<Candidate> {
        let gray = preprocessing::to_grayscale(frame);
        let blurred = preprocessing::apply_blur(&gray, self.blur_sigma);
        let binary = preprocessing::binarize(&blurred);

        let regions = contours::extract_regions(&binary);
        debug!(count = regions.len(), "contours extracted");

        regions
            .into_iter()
            .find(|region| region.area >= self.min_area && region.area <= self.max_area)
            .map(|region| Candidate {
                rectangle: region.rectangle,
                area: region.area,
            })
    }
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self::new()
    }
}
