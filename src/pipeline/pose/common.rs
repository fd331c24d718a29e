use anyhow::{Context, Result, anyhow};
use fast_image_resize as fir;
use ndarray::Array4;

use crate::types::{BodyPart, Frame, Keypoint, Pose};

/// Where the frame landed inside the square model input.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterboxInfo {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub input_size: u32,
    pub orig_w: u32,
    pub orig_h: u32,
}

impl LetterboxInfo {
    pub fn for_frame(width: u32, height: u32, input_size: u32) -> Self {
        let scale = input_size as f32 / (width.max(height).max(1) as f32);
        let new_w = (width as f32 * scale).round().max(1.0) as u32;
        let new_h = (height as f32 * scale).round().max(1.0) as u32;
        Self {
            scale,
            pad_x: ((input_size as i64 - new_w as i64) / 2).max(0) as f32,
            pad_y: ((input_size as i64 - new_h as i64) / 2).max(0) as f32,
            input_size,
            orig_w: width,
            orig_h: height,
        }
    }

    fn resized_dims(&self) -> (u32, u32) {
        (
            (self.orig_w as f32 * self.scale).round().max(1.0) as u32,
            (self.orig_h as f32 * self.scale).round().max(1.0) as u32,
        )
    }

    /// Maps coordinates normalised to the model input back to frame pixels.
    pub fn project(&self, x_norm: f32, y_norm: f32) -> (f32, f32) {
        let size = self.input_size as f32;
        let px = (x_norm * size - self.pad_x) / self.scale;
        let py = (y_norm * size - self.pad_y) / self.scale;
        (
            px.clamp(0.0, self.orig_w.saturating_sub(1) as f32),
            py.clamp(0.0, self.orig_h.saturating_sub(1) as f32),
        )
    }
}

/// Letterboxes the frame into an NHWC float tensor with 0..255 channel values.
pub fn prepare_frame(frame: &Frame, input_size: u32) -> Result<(Array4<f32>, LetterboxInfo)> {
    let expected_len = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.rgba.len() != expected_len || expected_len == 0 {
        return Err(anyhow!(
            "frame buffer size mismatch: got {}, expected {}",
            frame.rgba.len(),
            expected_len
        ));
    }

    let letterbox = LetterboxInfo::for_frame(frame.width, frame.height, input_size);
    let (new_w, new_h) = letterbox.resized_dims();

    let src_image = fir::images::ImageRef::new(
        frame.width,
        frame.height,
        &frame.rgba,
        fir::PixelType::U8x4,
    )?;
    let mut dst_image = fir::images::Image::new(new_w, new_h, fir::PixelType::U8x4);
    let resize_options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Interpolation(fir::FilterType::Bilinear));
    fir::Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&resize_options))
        .context("fast resize failed")?;
    let resized = dst_image.into_vec();

    let side = input_size as usize;
    let mut input = Array4::<f32>::zeros((1, side, side, 3));
    let (pad_x, pad_y) = (letterbox.pad_x as usize, letterbox.pad_y as usize);
    for (row, src_row) in resized.chunks_exact(new_w as usize * 4).enumerate() {
        let y = pad_y + row;
        if y >= side {
            break;
        }
        for (col, px) in src_row.chunks_exact(4).enumerate() {
            let x = pad_x + col;
            if x >= side {
                break;
            }
            for c in 0..3 {
                input[[0, y, x, c]] = px[c] as f32;
            }
        }
    }

    Ok((input, letterbox))
}

/// Decodes `[1, 1, 17, 3]` rows of (y, x, score) into a pose in frame pixels.
pub fn decode_keypoints(flat: &[f32], letterbox: &LetterboxInfo) -> Result<Pose> {
    let needed = BodyPart::COUNT * 3;
    if flat.len() < needed {
        return Err(anyhow!(
            "unexpected keypoint tensor length: got {}, need {needed}",
            flat.len()
        ));
    }

    let mut pose = Pose::new();
    let mut total = 0.0;
    for (part, row) in BodyPart::ALL.iter().zip(flat.chunks_exact(3)) {
        let (x, y) = letterbox.project(row[1], row[0]);
        let score = row[2].clamp(0.0, 1.0);
        total += score;
        pose.set(*part, Keypoint::new(x, y, score));
    }
    pose.score = total / BodyPart::COUNT as f32;
    Ok(pose)
}
