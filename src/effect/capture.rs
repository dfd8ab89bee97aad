use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{SnapError, SnapResult};

/// Source of the subject's current appearance.
///
/// Called exactly once per snap, before decomposition. Return [`SnapError::NotReady`] when the
/// subject cannot be rasterized yet (for example before it has been laid out); the snap is then
/// abandoned and may be retried.
pub trait Capture: Send {
    /// Rasterize the subject as it looks right now.
    fn capture(&mut self) -> SnapResult<PixelBuffer>;
}

impl<F> Capture for F
where
    F: FnMut() -> SnapResult<PixelBuffer> + Send,
{
    fn capture(&mut self) -> SnapResult<PixelBuffer> {
        self()
    }
}

/// Capture that always returns the same image.
#[derive(Clone, Debug)]
pub struct StillCapture {
    image: PixelBuffer,
}

impl StillCapture {
    /// Capture that hands out clones of `image`.
    pub fn new(image: PixelBuffer) -> Self {
        Self { image }
    }
}

impl Capture for StillCapture {
    fn capture(&mut self) -> SnapResult<PixelBuffer> {
        Ok(self.image.clone())
    }
}

/// Capture with nothing to show yet; every call reports [`SnapError::NotReady`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingCapture;

impl Capture for PendingCapture {
    fn capture(&mut self) -> SnapResult<PixelBuffer> {
        Err(SnapError::not_ready("subject has not been laid out"))
    }
}
