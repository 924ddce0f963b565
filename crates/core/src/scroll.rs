//! Smooth-scroll easing and scroll-spy section tracking for the page
//! navigation.

/// Height of the fixed navigation bar; scroll targets land this far above
/// the section top.
pub const NAVBAR_OFFSET: f64 = 80.0;
/// Default smooth-scroll duration in milliseconds.
pub const SCROLL_DURATION_MS: f64 = 1000.0;
/// A section becomes active once its top is at most this far below the
/// viewport top.
pub const ACTIVE_THRESHOLD: f64 = 100.0;
/// Scroll offset past which the navigation bar switches to its compact style.
pub const SCROLLED_THRESHOLD: f64 = 50.0;

/// Cubic ease-in-out on [0, 1]. Inputs outside the range are clamped.
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// A scroll from one offset to another over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    duration_ms: f64,
}

/// Scroll offset at one instant of a [`ScrollAnimation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub position: f64,
    pub finished: bool,
}

impl ScrollAnimation {
    /// A non-positive duration makes the animation jump straight to `to`.
    pub fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
        }
    }

    /// Scroll from `current` to the section whose top is at `section_top`,
    /// stopping [`NAVBAR_OFFSET`] above it.
    pub fn to_section(current: f64, section_top: f64) -> Self {
        Self::new(current, section_top - NAVBAR_OFFSET, SCROLL_DURATION_MS)
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn sample(&self, elapsed_ms: f64) -> ScrollSample {
        let progress = if self.duration_ms > 0.0 {
            (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        ScrollSample {
            position: self.from + (self.to - self.from) * ease_in_out_cubic(progress),
            finished: progress >= 1.0,
        }
    }
}

/// The section the reader has scrolled into, if any.
///
/// `sections` pairs each id with its top edge relative to the viewport top,
/// in page order. Scanning from the last section up, the first one whose top
/// is at or above `threshold` wins. Returns `None` when no section
/// qualifies; the caller keeps whichever section it had active.
pub fn active_section<'a>(sections: &[(&'a str, f64)], threshold: f64) -> Option<&'a str> {
    sections
        .iter()
        .rev()
        .find(|(_, top)| *top <= threshold)
        .map(|(id, _)| *id)
}

/// Whether the page has scrolled far enough to compact the navigation bar.
pub fn is_scrolled(position: f64) -> bool {
    position > SCROLLED_THRESHOLD
}
