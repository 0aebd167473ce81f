//! Featured-card selection.
//!
//! The view layer pins one "featured" card under a sticky header. As the page
//! scrolls, the featured topic is the card whose vertical midpoint sits
//! closest to a target line just below the sticky element. The view reports
//! card geometry; this module only does the arithmetic and the bookkeeping
//! that keeps recomputation cheap:
//!
//! - [`compute_featured`] is the pure geometry function
//! - [`FrameGuard`] allows at most one pending recompute per display frame
//! - [`FeaturedSelector`] remembers the current pick and only reports changes

use serde::{Deserialize, Serialize};

/// Gap between the sticky element's bottom edge and the target line.
pub const TARGET_OFFSET: f64 = 12.0;

/// Vertical extent of a mounted card, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardRect {
    pub top: f64,
    pub height: f64,
}

impl CardRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// A card that may be featured. `rect` is `None` while the card is not
/// mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub rect: Option<CardRect>,
}

impl Candidate {
    pub fn mounted(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            rect: Some(CardRect::new(top, height)),
        }
    }

    pub fn unmounted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rect: None,
        }
    }
}

/// Target line: bottom edge of the sticky element plus `offset`.
pub fn target_line(sticky_top: f64, sticky_height: f64, offset: f64) -> f64 {
    sticky_top + sticky_height + offset
}

/// Pick the candidate whose midpoint is closest to `target_y`.
///
/// The first candidate wins ties. Falls back to the last candidate when none
/// is mounted, or when every mounted card lies above the line (the feed has
/// been scrolled past its end). Returns `None` only for an empty list.
///
/// ```
/// use comentaram_feed::{compute_featured, Candidate};
///
/// let cards = [
///     Candidate::mounted("a", 40.0, 20.0),
///     Candidate::mounted("b", 185.0, 20.0),
///     Candidate::mounted("c", 390.0, 20.0),
/// ];
/// assert_eq!(compute_featured(200.0, &cards), Some("b"));
/// ```
pub fn compute_featured(target_y: f64, candidates: &[Candidate]) -> Option<&str> {
    let last = candidates.last()?;

    let mut best: Option<(&Candidate, f64)> = None;
    let mut any_below = false;
    for candidate in candidates {
        let Some(rect) = candidate.rect else {
            continue;
        };
        let mid = rect.midpoint();
        if !mid.is_finite() {
            continue;
        }
        any_below |= mid >= target_y;
        let distance = (mid - target_y).abs();
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    match best {
        Some((candidate, _)) if any_below => Some(candidate.id.as_str()),
        _ => Some(last.id.as_str()),
    }
}

/// Single pending frame request.
///
/// Scroll events can fire faster than the display refreshes; only the first
/// one in a frame schedules work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGuard {
    pending: bool,
}

impl FrameGuard {
    /// Ask for a frame. Returns true if the caller should schedule one.
    pub fn request(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Consume the pending request when the frame runs. Returns false if
    /// nothing was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop any pending request (teardown).
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

/// A change of featured topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedChange {
    pub previous: Option<String>,
    pub current: String,
}

/// Tracks the featured topic across scroll and resize events.
#[derive(Debug, Clone, Default)]
pub struct FeaturedSelector {
    current: Option<String>,
    frame: FrameGuard,
}

impl FeaturedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently featured id.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Reset to the head of a freshly rendered list.
    pub fn reset(&mut self, first: Option<&str>) -> Option<FeaturedChange> {
        self.apply(first.map(str::to_string))
    }

    /// Recompute now. Returns a change only when the pick differs from the
    /// current one; an empty candidate list leaves the selection untouched.
    pub fn recompute(&mut self, target_y: f64, candidates: &[Candidate]) -> Option<FeaturedChange> {
        let next = compute_featured(target_y, candidates)?.to_string();
        self.apply(Some(next))
    }

    fn apply(&mut self, next: Option<String>) -> Option<FeaturedChange> {
        if next == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next.clone());
        next.map(|current| FeaturedChange { previous, current })
    }

    /// Scroll event: returns true if a frame should be scheduled.
    pub fn on_scroll(&mut self) -> bool {
        self.frame.request()
    }

    /// Scheduled frame: recompute if a scroll asked for it.
    pub fn on_frame(&mut self, target_y: f64, candidates: &[Candidate]) -> Option<FeaturedChange> {
        if !self.frame.take() {
            return None;
        }
        self.recompute(target_y, candidates)
    }

    /// Resize event: recompute immediately.
    pub fn on_resize(&mut self, target_y: f64, candidates: &[Candidate]) -> Option<FeaturedChange> {
        self.recompute(target_y, candidates)
    }

    /// Whether a frame is pending.
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    /// Cancel any pending frame (teardown).
    pub fn cancel(&mut self) {
        self.frame.cancel();
    }
}
