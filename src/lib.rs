pub mod capture;
pub mod detection;
pub mod models;
pub mod scan;
pub mod tone;

pub use capture::{CaptureSession, CropSurface, PipelineState, ScanHalt};
pub use detection::RegionDetector;
pub use models::{Candidate, Point, Rectangle, ToneParams};
pub use scan::{DetectionLoop, FrameSource, PreviewSink};
