use af_core::error::CoreError;
use af_core::frame::{FrameBuffer, IntensityBuffer};
use rayon::prelude::*;

/// Convert an RGBA frame into a single-channel intensity buffer.
///
/// Each pixel becomes its BT.709 luminance in [0.0, 255.0]; alpha is ignored.
///
/// # Errors
/// Returns [`CoreError::InvalidImage`] if the frame has a zero dimension or
/// its data does not cover `width × height` pixels.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_ascii::luminance::to_intensity;
///
/// let frame = FrameBuffer::filled(4, 2, (255, 255, 255, 255));
/// let buf = to_intensity(&frame).unwrap();
/// assert_eq!((buf.width, buf.height), (4, 2));
/// assert!(buf.data.iter().all(|&v| (v - 255.0).abs() < 1e-3));
/// ```
pub fn to_intensity(frame: &FrameBuffer) -> Result<IntensityBuffer, CoreError> {
    if frame.is_empty() {
        return Err(CoreError::InvalidImage(format!(
            "buffer vide ({}×{}, {} octets)",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let mut data = vec![0.0f32; width * height];

    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = frame.luminance(x as u32, y as u32).clamp(0.0, 255.0);
            }
        });

    Ok(IntensityBuffer {
        data,
        width,
        height,
    })
}
