#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use image::{Rgba, RgbaImage};
use tokio::sync::oneshot;

use cardscan::models::Rectangle;
use cardscan::{CropSurface, FrameSource, PreviewSink};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Black frame with a single filled white rectangle.
pub fn frame_with_rect(
    frame_w: u32,
    frame_h: u32,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(frame_w, frame_h, BLACK);
    for py in y..(y + h).min(frame_h) {
        for px in x..(x + w).min(frame_w) {
            frame.put_pixel(px, py, WHITE);
        }
    }
    frame
}

/// Uniform frame of a single color.
pub fn uniform_frame(frame_w: u32, frame_h: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(frame_w, frame_h, color)
}

/// Frame source that hands out the same frame on every request.
pub struct StaticSource {
    pub frame: RgbaImage,
}

impl StaticSource {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame }
    }
}

impl FrameSource for StaticSource {
    fn next_frame(&mut self) -> Result<RgbaImage> {
        Ok(self.frame.clone())
    }
}

/// Frame source that plays a fixed sequence, then repeats the last frame.
pub struct SequenceSource {
    frames: Vec<RgbaImage>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(frames: Vec<RgbaImage>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl FrameSource for SequenceSource {
    fn next_frame(&mut self) -> Result<RgbaImage> {
        let index = self.cursor.min(self.frames.len() - 1);
        self.cursor += 1;
        Ok(self.frames[index].clone())
    }
}

/// Frame source with no camera behind it.
pub struct UnavailableSource;

impl FrameSource for UnavailableSource {
    fn next_frame(&mut self) -> Result<RgbaImage> {
        Err(anyhow!("no capture device available"))
    }
}

/// Frame source that fails a set number of times before recovering.
pub struct FlakySource {
    pub failures_left: usize,
    pub frame: RgbaImage,
}

impl FrameSource for FlakySource {
    fn next_frame(&mut self) -> Result<RgbaImage> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(anyhow!("transient frame delivery failure"));
        }
        Ok(self.frame.clone())
    }
}

/// Preview sink that records every presented frame for inspection.
#[derive(Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<RgbaImage>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> Vec<RgbaImage> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RgbaImage> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl PreviewSink for RecordingSink {
    fn present(&mut self, frame: RgbaImage) {
        self.frames.lock().unwrap().push(frame);
    }
}

/// Crop surface that immediately crops the image to the seed rectangle
/// and records the seed it was given.
#[derive(Default)]
pub struct SeedCropSurface {
    pub last_seed: Option<Rectangle>,
}

impl CropSurface for SeedCropSurface {
    fn begin(
        &mut self,
        image: RgbaImage,
        seed: Rectangle,
    ) -> oneshot::Receiver<Result<RgbaImage>> {
        self.last_seed = Some(seed);
        let crop = image::imageops::crop_imm(
            &image,
            seed.top_left.x,
            seed.top_left.y,
            seed.width().min(image.width() - seed.top_left.x),
            seed.height().min(image.height() - seed.top_left.y),
        )
        .to_image();

        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Ok(crop));
        rx
    }
}

/// Crop surface whose load always fails.
pub struct FailingCropSurface;

impl CropSurface for FailingCropSurface {
    fn begin(
        &mut self,
        _image: RgbaImage,
        _seed: Rectangle,
    ) -> oneshot::Receiver<Result<RgbaImage>> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(anyhow!("cropper failed to load image")));
        rx
    }
}
