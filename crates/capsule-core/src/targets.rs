//! Render-target sizing and the resize barrier.

use crate::constants::MAX_DEVICE_PIXEL_RATIO;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Backing size for a CSS/logical viewport.
    ///
    /// The pixel ratio is capped at `MAX_DEVICE_PIXEL_RATIO` (ratios below 1,
    /// e.g. a zoomed-out page, are kept) and each axis at `max_dim`; zero-sized
    /// viewports still yield a 1x1 target.
    pub fn from_viewport(width: f64, height: f64, device_pixel_ratio: f64, max_dim: u32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let axis = |logical: f64| -> u32 {
            let px = if logical.is_finite() {
                (logical.max(0.0) * dpr).round()
            } else {
                0.0
            };
            (px.min(max_dim as f64) as u32).clamp(1, max_dim.max(1))
        };
        Self {
            width: axis(width),
            height: axis(height),
        }
    }

    pub fn half(&self) -> Self {
        Self {
            width: (self.width / 2).max(1),
            height: (self.height / 2).max(1),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Serialises viewport changes so targets are only recreated between frames.
///
/// Resize events may arrive at any time; they only record the newest size.
/// The render loop calls [`ResizeBarrier::take_pending`] before the first
/// pass of a frame, which is the only point where targets are rebuilt.
#[derive(Debug)]
pub struct ResizeBarrier {
    current: TargetSize,
    pending: Option<TargetSize>,
}

impl ResizeBarrier {
    pub fn new(initial: TargetSize) -> Self {
        Self {
            current: initial,
            pending: None,
        }
    }

    pub fn current(&self) -> TargetSize {
        self.current
    }

    pub fn request(&mut self, size: TargetSize) {
        if size == self.current {
            self.pending = None;
        } else {
            self.pending = Some(size);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the size to rebuild targets at, if it changed since last frame.
    pub fn take_pending(&mut self) -> Option<TargetSize> {
        let next = self.pending.take()?;
        log::info!(
            "[targets] resize {}x{} -> {}x{}",
            self.current.width,
            self.current.height,
            next.width,
            next.height
        );
        self.current = next;
        Some(next)
    }

    /// Puts back a size whose target rebuild failed so the next frame retries it.
    pub fn requeue(&mut self, previous: TargetSize, failed: TargetSize) {
        self.current = previous;
        if self.pending.is_none() {
            self.request(failed);
        }
    }
}
