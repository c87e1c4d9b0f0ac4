//! ViewportManager - maps scroll position (or page) to the window of rows
//! that must be materialized.
//!
//! Architecture:
//! RowStore (authoritative rows)
//!     → DataView (filtered/sorted projection)
//!         → ViewportManager (visible window)
//!             → TableRenderer (rows handed to a sink)
use std::ops::Range;
use tracing::debug;

/// Window of rows for virtual scrolling.
///
/// `start = floor(scroll_offset / row_height)` clamped to `[0, total)`,
/// `end = start + visible_count + overscan` clamped to `total`.
pub fn compute_window(
    scroll_offset: u64,
    row_height: u32,
    visible_count: usize,
    overscan: usize,
    total: usize,
) -> Range<usize> {
    if total == 0 {
        return 0..0;
    }
    let raw_start = if row_height == 0 {
        0
    } else {
        usize::try_from(scroll_offset / u64::from(row_height)).unwrap_or(usize::MAX)
    };
    let start = raw_start.min(total - 1);
    let end = start
        .saturating_add(visible_count)
        .saturating_add(overscan)
        .min(total);
    start..end
}

/// Window of rows for page-based pagination
pub fn compute_page(page_index: usize, page_size: usize, total: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Number of pages needed for `total` rows (at least one)
pub fn page_count(page_size: usize, total: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// How rows are windowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Virtual scrolling over a fixed-height row canvas
    Virtual {
        row_height: u32,
        visible_count: usize,
        overscan: usize,
    },
    /// Page-based pagination
    Paged { page_size: usize },
}

/// Current scroll/page position and the arithmetic around it
#[derive(Debug, Clone)]
pub struct ViewportManager {
    mode: WindowMode,
    scroll_offset: u64,
    page_index: usize,
}

impl ViewportManager {
    pub fn new(mode: WindowMode) -> Self {
        Self {
            mode,
            scroll_offset: 0,
            page_index: 0,
        }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn row_height(&self) -> u32 {
        match self.mode {
            WindowMode::Virtual { row_height, .. } => row_height,
            WindowMode::Paged { .. } => 0,
        }
    }

    /// Set the raw scroll offset reported by the scroll container
    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset;
    }

    /// Derive the visible row count from a viewport height in pixels
    pub fn set_viewport_height(&mut self, height: u32) {
        if let WindowMode::Virtual {
            row_height,
            visible_count,
            ..
        } = &mut self.mode
        {
            if *row_height > 0 {
                *visible_count = (height.div_ceil(*row_height) as usize).max(1);
                debug!(target: "viewport", "Viewport height {} -> {} visible rows", height, visible_count);
            }
        }
    }

    /// The half-open range of filtered indices to render
    pub fn window(&self, total: usize) -> Range<usize> {
        match self.mode {
            WindowMode::Virtual {
                row_height,
                visible_count,
                overscan,
            } => compute_window(self.scroll_offset, row_height, visible_count, overscan, total),
            WindowMode::Paged { page_size } => compute_page(self.page_index, page_size, total),
        }
    }

    /// Pull the position back inside the data after it shrank, so the next
    /// window starts no later than `max(0, total - visible_count)`.
    pub fn clamp_to(&mut self, total: usize) {
        match self.mode {
            WindowMode::Virtual {
                row_height,
                visible_count,
                ..
            } => {
                let max_start = total.saturating_sub(visible_count) as u64;
                let max_offset = max_start * u64::from(row_height);
                if self.scroll_offset > max_offset {
                    debug!(
                        target: "viewport",
                        "Clamping scroll offset {} -> {} ({} rows)",
                        self.scroll_offset, max_offset, total
                    );
                    self.scroll_offset = max_offset;
                }
            }
            WindowMode::Paged { page_size } => {
                let last = page_count(page_size, total) - 1;
                if self.page_index > last {
                    debug!(target: "viewport", "Clamping page {} -> {}", self.page_index, last);
                    self.page_index = last;
                }
            }
        }
    }

    /// Vertical translate offset applied to the rendered rows
    pub fn offset_px(&self, start: usize) -> u64 {
        start as u64 * u64::from(self.row_height())
    }

    /// Height of the full virtual canvas
    pub fn canvas_height_px(&self, total: usize) -> u64 {
        total as u64 * u64::from(self.row_height())
    }

    pub fn page_count(&self, total: usize) -> usize {
        match self.mode {
            WindowMode::Paged { page_size } => page_count(page_size, total),
            WindowMode::Virtual { .. } => 1,
        }
    }

    /// Move to a page, clamped to the valid range. Returns the page shown.
    pub fn goto_page(&mut self, page: usize, total: usize) -> usize {
        let last = self.page_count(total) - 1;
        self.page_index = page.min(last);
        self.page_index
    }

    pub fn next_page(&mut self, total: usize) -> usize {
        self.goto_page(self.page_index.saturating_add(1), total)
    }

    pub fn prev_page(&mut self, total: usize) -> usize {
        self.goto_page(self.page_index.saturating_sub(1), total)
    }

    /// Back to the top of the data
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.page_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_basic() {
        assert_eq!(compute_window(4200, 42, 25, 0, 1000), 100..125);
        assert_eq!(compute_window(4200, 42, 25, 5, 1000), 100..130);
        assert_eq!(compute_window(41, 42, 25, 0, 1000), 0..25);
    }

    #[test]
    fn test_window_empty_and_short() {
        assert_eq!(compute_window(0, 42, 25, 0, 0), 0..0);
        assert_eq!(compute_window(0, 42, 25, 0, 10), 0..10);
        // Past the end: start stays inside the data
        assert_eq!(compute_window(1_000_000, 42, 25, 0, 10), 9..10);
        assert_eq!(compute_window(u64::MAX, 1, 25, 0, 3), 2..3);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(compute_page(0, 10, 25), 0..10);
        assert_eq!(compute_page(2, 10, 25), 20..25);
        assert_eq!(compute_page(5, 10, 25), 25..25);
        assert_eq!(page_count(10, 25), 3);
        assert_eq!(page_count(10, 0), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut viewport = ViewportManager::new(WindowMode::Virtual {
            row_height: 42,
            visible_count: 25,
            overscan: 0,
        });
        viewport.set_scroll_offset(990 * 42);
        viewport.clamp_to(30);
        assert_eq!(viewport.window(30), 5..30);
        viewport.clamp_to(10);
        assert_eq!(viewport.window(10), 0..10);
    }

    #[test]
    fn test_viewport_height_sets_visible_count() {
        let mut viewport = ViewportManager::new(WindowMode::Virtual {
            row_height: 42,
            visible_count: 25,
            overscan: 0,
        });
        viewport.set_viewport_height(400);
        assert_eq!(viewport.window(100), 0..10);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut viewport = ViewportManager::new(WindowMode::Paged { page_size: 10 });
        assert_eq!(viewport.next_page(25), 1);
        assert_eq!(viewport.next_page(25), 2);
        assert_eq!(viewport.next_page(25), 2);
        assert_eq!(viewport.prev_page(25), 1);
        viewport.goto_page(2, 25);
        viewport.clamp_to(5);
        assert_eq!(viewport.page_index(), 0);
        assert_eq!(viewport.offset_px(3), 0);
    }
}
