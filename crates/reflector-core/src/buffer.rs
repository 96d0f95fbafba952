//! Offscreen reflection buffer bookkeeping.

/// Renderer-issued handle to an offscreen render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(pub u32);

/// The offscreen color target a reflector renders into.
///
/// The GPU memory lives in the renderer; this tracks its handle, size, and
/// the frame its contents were produced in. Contents are only valid for
/// that frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionBuffer {
    target: RenderTargetId,
    width: u32,
    height: u32,
    rendered_frame: Option<u64>,
}

impl ReflectionBuffer {
    /// Wraps an allocated target.
    pub fn new(target: RenderTargetId, width: u32, height: u32) -> Self {
        Self {
            target,
            width,
            height,
            rendered_frame: None,
        }
    }

    /// Returns the render target handle.
    pub fn target(&self) -> RenderTargetId {
        self.target
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame index of the last successful render, if any.
    pub fn rendered_frame(&self) -> Option<u64> {
        self.rendered_frame
    }

    /// Returns whether the contents were rendered during `frame`.
    pub fn is_fresh(&self, frame: u64) -> bool {
        self.rendered_frame == Some(frame)
    }

    /// Returns whether the buffer has ever been rendered into.
    pub fn has_contents(&self) -> bool {
        self.rendered_frame.is_some()
    }

    pub(crate) fn mark_rendered(&mut self, frame: u64) {
        self.rendered_frame = Some(frame);
    }

    /// Records a new size. Resized targets start out empty.
    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rendered_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_is_per_frame() {
        let mut buffer = ReflectionBuffer::new(RenderTargetId(1), 64, 32);
        assert!(!buffer.has_contents());
        buffer.mark_rendered(7);
        assert!(buffer.is_fresh(7));
        assert!(!buffer.is_fresh(8));
        assert_eq!(buffer.rendered_frame(), Some(7));
    }

    #[test]
    fn test_resize_clears_contents() {
        let mut buffer = ReflectionBuffer::new(RenderTargetId(1), 64, 32);
        buffer.mark_rendered(1);
        buffer.set_size(128, 64);
        assert_eq!(buffer.size(), (128, 64));
        assert!(!buffer.has_contents());
    }
}
