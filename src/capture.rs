use std::sync::Arc;

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use tokio::sync::{oneshot, watch};
use tracing::{info, warn};

use crate::models::{Rectangle, ToneParams};
use crate::scan::{DetectionLoop, FrameSource, PreviewSink};
use crate::tone;

/// Lifecycle of one capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Detection loop actively consuming frames; no still frame held.
    Scanning,
    /// Capture requested; a still frame is held and the loop is halted.
    Frozen,
    /// Still frame handed to the crop surface, seeded with a rectangle.
    Cropping,
    /// Crop surface returned a final image; the still may be released.
    Cropped,
    /// Tone mapper has produced the final output.
    Enhanced,
}

/// Interactive crop-adjustment surface (external collaborator).
///
/// Accepts the frozen still and a seed rectangle, and later yields the
/// user-finalized image through a single-shot completion channel. The
/// signal fires at most once per request.
pub trait CropSurface {
    fn begin(
        &mut self,
        image: RgbaImage,
        seed: Rectangle,
    ) -> oneshot::Receiver<Result<RgbaImage>>;
}

/// Handle for halting a running scan from outside the session.
#[derive(Clone)]
pub struct ScanHalt(Arc<watch::Sender<bool>>);

impl ScanHalt {
    /// Request that the loop not schedule its next iteration. An
    /// iteration already in flight is allowed to finish.
    pub fn halt(&self) {
        self.0.send_replace(true);
    }
}

/// Capture/crop coordinator.
///
/// Owns the detection loop, the single held still image, and the capture
/// state machine. At most one still is held at a time; entering `Frozen`
/// releases any previously held still first.
pub struct CaptureSession<S, P> {
    scanner: DetectionLoop<S, P>,
    state: PipelineState,
    still: Option<RgbaImage>,
    cropped: Option<RgbaImage>,
    enhanced: Option<RgbaImage>,
    tone_params: ToneParams,
    stop: Arc<watch::Sender<bool>>,
}

impl<S: FrameSource, P: PreviewSink> CaptureSession<S, P> {
    pub fn new(scanner: DetectionLoop<S, P>) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            scanner,
            state: PipelineState::Scanning,
            still: None,
            cropped: None,
            enhanced: None,
            tone_params: ToneParams::default(),
            stop: Arc::new(stop),
        }
    }

    pub fn with_tone_params(mut self, params: ToneParams) -> Self {
        self.tone_params = params.clamped();
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn still(&self) -> Option<&RgbaImage> {
        self.still.as_ref()
    }

    pub fn cropped(&self) -> Option<&RgbaImage> {
        self.cropped.as_ref()
    }

    pub fn enhanced(&self) -> Option<&RgbaImage> {
        self.enhanced.as_ref()
    }

    pub fn scanner(&self) -> &DetectionLoop<S, P> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut DetectionLoop<S, P> {
        &mut self.scanner
    }

    /// Handle that an operator-facing surface can use to stop the scan.
    pub fn halt_handle(&self) -> ScanHalt {
        ScanHalt(self.stop.clone())
    }

    /// Drive the detection loop until the halt handle fires.
    ///
    /// Returns an error without starting the loop when the session is not
    /// scanning, or when the frame source cannot deliver its first frame
    /// (no camera, permission denied).
    pub async fn run_scan(&mut self) -> Result<()> {
        if self.state != PipelineState::Scanning {
            bail!("cannot scan while in state {:?}", self.state);
        }

        // Probe the source once so acquisition failure is reported to the
        // caller instead of being swallowed by per-frame error isolation.
        self.scanner
            .raw_frame()
            .context("frame source unavailable")?;

        let receiver = self.stop.subscribe();
        self.scanner.run(receiver).await;
        Ok(())
    }

    /// Scanning -> Frozen: freeze one unannotated frame as the still
    /// image and halt the loop.
    pub fn capture(&mut self) -> Result<()> {
        if self.state != PipelineState::Scanning {
            bail!("capture requested while in state {:?}", self.state);
        }

        self.stop.send_replace(true);
        self.still = None;
        let frame = self.scanner.raw_frame().context("failed to freeze frame")?;
        info!(
            width = frame.width(),
            height = frame.height(),
            "still frame frozen"
        );
        self.still = Some(frame);
        self.state = PipelineState::Frozen;
        Ok(())
    }

    /// Frozen -> Cropping: hand the still and a seed rectangle to the
    /// crop surface. With no prior candidate the seed defaults to the
    /// whole frame.
    pub fn begin_crop(
        &mut self,
        surface: &mut impl CropSurface,
    ) -> Result<oneshot::Receiver<Result<RgbaImage>>> {
        if self.state != PipelineState::Frozen {
            bail!("crop requested while in state {:?}", self.state);
        }
        let still = self.still.as_ref().context("no still frame held")?;

        let seed = self
            .scanner
            .last_candidate()
            .map(|candidate| candidate.rectangle)
            .unwrap_or_else(|| Rectangle::full_frame(still.width(), still.height()));

        let receiver = surface.begin(still.clone(), seed);
        self.state = PipelineState::Cropping;
        Ok(receiver)
    }

    /// Cropping -> Cropped on success. On a crop-surface load failure the
    /// session stays in `Cropping` so the operator can retry or reset.
    pub fn complete_crop(&mut self, result: Result<RgbaImage>) -> Result<()> {
        if self.state != PipelineState::Cropping {
            bail!("crop completion while in state {:?}", self.state);
        }
        match result {
            Ok(image) => {
                self.cropped = Some(image);
                self.still = None;
                self.state = PipelineState::Cropped;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "crop surface failed to produce an image");
                Err(err)
            }
        }
    }

    /// Run the whole crop interaction: begin, await the single-shot
    /// completion, apply the resulting transition.
    pub async fn crop_with(&mut self, surface: &mut impl CropSurface) -> Result<()> {
        let receiver = self.begin_crop(surface)?;
        let result = receiver.await.context("crop surface dropped its reply")?;
        self.complete_crop(result)
    }

    /// Cropped -> Enhanced: tone-map the finalized crop.
    pub fn enhance(&mut self) -> Result<&RgbaImage> {
        if self.state != PipelineState::Cropped {
            bail!("enhance requested while in state {:?}", self.state);
        }
        let cropped = self.cropped.as_ref().context("no cropped image held")?;
        let output = tone::enhance(cropped, self.tone_params);
        self.state = PipelineState::Enhanced;
        Ok(self.enhanced.insert(output))
    }

    /// Any state -> Scanning: release held images and resume the loop.
    pub fn reset(&mut self) {
        self.still = None;
        self.cropped = None;
        self.enhanced = None;
        self.stop.send_replace(false);
        self.state = PipelineState::Scanning;
    }
}
