use std::time::Duration;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::detection::RegionDetector;
use crate::models::{Candidate, OVERLAY_STROKE, TARGET_FPS};

/// Delivers RGBA frames of consistent dimensions on request.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RgbaImage>;
}

/// Accepts a rendered frame for display each iteration.
pub trait PreviewSink {
    fn present(&mut self, frame: RgbaImage);
}

/// Per-frame detection loop.
///
/// Runs the region detector against a live frame source, retains the last
/// accepted candidate, and publishes an annotated preview. Each iteration
/// runs to completion before the next is scheduled; a failed iteration is
/// logged and the loop continues.
pub struct DetectionLoop<S, P> {
    source: S,
    preview: P,
    detector: RegionDetector,
    last_candidate: Option<Candidate>,
}

impl<S: FrameSource, P: PreviewSink> DetectionLoop<S, P> {
    pub fn new(source: S, preview: P, detector: RegionDetector) -> Self {
        Self {
            source,
            preview,
            detector,
            last_candidate: None,
        }
    }

    /// The last accepted detection, if any frame has produced one.
    pub fn last_candidate(&self) -> Option<Candidate> {
        self.last_candidate
    }

    /// Pull one unannotated frame from the source, bypassing detection.
    /// Used by the capture flow to freeze a still image.
    pub fn raw_frame(&mut self) -> Result<RgbaImage> {
        self.source.next_frame()
    }

    /// Run one iteration: pull a frame, detect, annotate, publish.
    ///
    /// Errors are caught and logged here so a bad frame never kills the
    /// scan; the caller is free to schedule the next iteration.
    pub fn tick(&mut self) {
        if let Err(err) = self.process_frame() {
            warn!(error = %err, "frame iteration failed, continuing scan");
        }
    }

    fn process_frame(&mut self) -> Result<()> {
        let mut frame = self.source.next_frame()?;

        if let Some(candidate) = self.detector.detect(&frame) {
            debug!(area = candidate.area, "candidate region detected");
            self.last_candidate = Some(candidate);
            draw_candidate(&mut frame, &candidate);
        }

        self.preview.present(frame);
        Ok(())
    }

    /// Drive the loop at the target cadence until the stop flag flips.
    ///
    /// Frame-driven pacing: each iteration runs to completion before the
    /// next tick, so a slow detection pass throttles the cadence instead
    /// of queueing frames. Cancellation is cooperative and only observed
    /// between iterations.
    pub async fn run(&mut self, stop: watch::Receiver<bool>) {
        let mut ticker = time::interval(Duration::from_secs(1) / TARGET_FPS);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !*stop.borrow() {
            self.tick();
            ticker.tick().await;
        }
    }
}

/// Draw the candidate rectangle on the frame as a red hollow overlay.
pub fn draw_candidate(frame: &mut RgbaImage, candidate: &Candidate) {
    let color = Rgba([255u8, 0, 0, 255]);
    let rect = candidate.rectangle;

    // A hollow rect is one pixel wide; nest insets to build the stroke.
    for inset in 0..OVERLAY_STROKE {
        let width = rect.width().saturating_sub(2 * inset);
        let height = rect.height().saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let outline = Rect::at(
            rect.top_left.x as i32 + inset as i32,
            rect.top_left.y as i32 + inset as i32,
        )
        .of_size(width, height);
        draw_hollow_rect_mut(frame, outline, color);
    }
}
