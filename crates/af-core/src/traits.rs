use crate::frame::SourceFrame;

/// Fournit des frames décodées au pipeline, dans l'ordre de la source.
///
/// Implémenté par : `ImageSource` (une frame), `GifSource` (N frames).
///
/// # Example
/// ```
/// use af_core::traits::Source;
/// use af_core::frame::{FrameBuffer, SourceFrame};
///
/// struct Single(Option<SourceFrame>);
/// impl Source for Single {
///     fn next_frame(&mut self) -> Option<SourceFrame> { self.0.take() }
///     fn native_size(&self) -> (u32, u32) { (1, 1) }
///     fn frame_count(&self) -> usize { 1 }
/// }
///
/// let mut s = Single(Some(SourceFrame { buffer: FrameBuffer::new(1, 1), delay: None }));
/// assert_eq!(s.drain().len(), 1);
/// ```
pub trait Source {
    /// Retourne la prochaine frame, ou `None` si la source est épuisée.
    fn next_frame(&mut self) -> Option<SourceFrame>;

    /// Dimensions natives de la source (avant resize).
    fn native_size(&self) -> (u32, u32);

    /// Nombre total de frames.
    fn frame_count(&self) -> usize;

    /// Collect every remaining frame in order.
    fn drain(&mut self) -> Vec<SourceFrame> {
        let mut frames = Vec::with_capacity(self.frame_count());
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }
}
