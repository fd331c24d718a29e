use anyhow::{Result, anyhow};
use nokhwa::{Buffer, utils::FrameFormat};
use rayon::prelude::*;
use yuv::{
    YuvBiPlanarImage, YuvConversionMode, YuvPackedImage, YuvRange, YuvStandardMatrix,
    yuv_nv12_to_rgba, yuyv422_to_rgba,
};
use zune_jpeg::{
    JpegDecoder,
    zune_core::{bytestream::ZCursor, colorspace::ColorSpace, options::DecoderOptions},
};

#[derive(Debug)]
pub struct RgbaFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decodes a camera buffer to RGBA, optionally mirrored like a selfie view.
pub fn convert_camera_frame(frame: &Buffer, mirror: bool) -> Result<RgbaFrame> {
    let resolution = frame.resolution();
    let (width, height) = (resolution.width_x, resolution.height_y);
    let data = frame.buffer();

    let mut rgba = match frame.source_frame_format() {
        FrameFormat::NV12 => nv12_to_rgba(data, width, height)?,
        FrameFormat::YUYV => yuyv_to_rgba(data, width, height)?,
        FrameFormat::MJPEG => mjpeg_to_rgba(data, width, height)?,
        FrameFormat::RAWRGB => expand_to_rgba(data, width, height, 3, |src| {
            [src[0], src[1], src[2], 255]
        })?,
        FrameFormat::RAWBGR => expand_to_rgba(data, width, height, 3, |src| {
            [src[2], src[1], src[0], 255]
        })?,
        FrameFormat::GRAY => expand_to_rgba(data, width, height, 1, |src| {
            [src[0], src[0], src[0], 255]
        })?,
    };

    if mirror {
        mirror_rows(&mut rgba, width);
    }

    Ok(RgbaFrame {
        rgba,
        width,
        height,
    })
}

fn ensure_len(kind: &str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(anyhow!(
            "{kind} buffer too small: got {}, expected {expected}",
            data.len()
        ));
    }
    Ok(())
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn nv12_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let y_len = pixel_count(width, height);
    let uv_len = y_len / 2;
    ensure_len("NV12", data, y_len + uv_len)?;

    let image = YuvBiPlanarImage {
        y_plane: &data[..y_len],
        y_stride: width,
        uv_plane: &data[y_len..y_len + uv_len],
        uv_stride: width,
        width,
        height,
    };

    let mut rgba = vec![0u8; y_len * 4];
    yuv_nv12_to_rgba(
        &image,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .map_err(|err| anyhow!("NV12→RGBA failed: {err:?}"))?;
    Ok(rgba)
}

fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    ensure_len("YUYV", data, pixel_count(width, height) * 2)?;

    let packed = YuvPackedImage {
        yuy: data,
        yuy_stride: width * 2,
        width,
        height,
    };

    let mut rgba = vec![0u8; pixel_count(width, height) * 4];
    yuyv422_to_rgba(
        &packed,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
    )
    .map_err(|err| anyhow!("YUYV422→RGBA failed: {err:?}"))?;
    Ok(rgba)
}

fn mjpeg_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGBA);
    let mut decoder = JpegDecoder::new_with_options(ZCursor::new(data), options);
    let rgba = decoder
        .decode()
        .map_err(|err| anyhow!("MJPEG decode failed: {err:?}"))?;

    // Some drivers report a resolution that differs from the encoded stream.
    ensure_len("MJPEG", &rgba, pixel_count(width, height) * 4)?;
    Ok(rgba)
}

fn expand_to_rgba<F>(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    to_rgba: F,
) -> Result<Vec<u8>>
where
    F: Fn(&[u8]) -> [u8; 4] + Sync,
{
    let pixels = pixel_count(width, height);
    ensure_len("raw", data, pixels * channels)?;

    let mut rgba = vec![0u8; pixels * 4];
    rgba.par_chunks_mut(4)
        .zip(data.par_chunks_exact(channels))
        .for_each(|(dst, src)| dst.copy_from_slice(&to_rgba(src)));
    Ok(rgba)
}

/// Flips every row left-to-right in place.
pub fn mirror_rows(rgba: &mut [u8], width: u32) {
    let stride = width as usize * 4;
    if stride == 0 {
        return;
    }
    rgba.par_chunks_mut(stride).for_each(|row| {
        let pixels = row.len() / 4;
        for x in 0..pixels / 2 {
            let (left, right) = (x * 4, (pixels - 1 - x) * 4);
            for c in 0..4 {
                row.swap(left + c, right + c);
            }
        }
    });
}
