//! Page geometry and the explicit layout cursor used by the portable-page export.
//!
//! Vertical positions are measured in points from the top edge of the page; the PDF writer
//! flips them into PDF user space. Page-break decisions are pure functions of the cursor,
//! the height of the next block and the page geometry.

use serde::{Deserialize, Serialize};

/// Fixed page size and content bounds, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    /// Where the cursor sits at the start of every page.
    pub top_pt: f32,
    /// Nothing may extend below this line.
    pub bottom_limit_pt: f32,
}

impl PageGeometry {
    /// A4 portrait with 40pt side margins, content between 50pt and 50pt from the edges.
    pub fn a4() -> Self {
        Self {
            width_pt: 595.28,
            height_pt: 841.89,
            margin_left_pt: 40.0,
            margin_right_pt: 40.0,
            top_pt: 50.0,
            bottom_limit_pt: 841.89 - 50.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_pt - self.margin_left_pt - self.margin_right_pt
    }

    /// Vertical room on a fresh page.
    pub fn content_height(&self) -> f32 {
        self.bottom_limit_pt - self.top_pt
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Running vertical position and page index.
///
/// `y` is the top edge of the next block to place. Cursors are plain values: every emission
/// step takes one and returns the advanced one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutCursor {
    pub y: f32,
    pub page: usize,
}

impl LayoutCursor {
    pub fn start(geometry: &PageGeometry) -> Self {
        Self {
            y: geometry.top_pt,
            page: 0,
        }
    }

    pub fn advance(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    pub fn next_page(self, geometry: &PageGeometry) -> Self {
        Self {
            y: geometry.top_pt,
            page: self.page + 1,
        }
    }

    /// True when a block of `height` placed here stays above the bottom limit.
    pub fn fits(&self, height: f32, geometry: &PageGeometry) -> bool {
        self.y + height <= geometry.bottom_limit_pt
    }

    /// Returns the cursor at which a block of `height` should be placed: this one if the block
    /// fits, otherwise the top of the next page.
    ///
    /// A block taller than a whole page still moves to a fresh page when the current one
    /// already has content; callers split such blocks themselves.
    pub fn reserve(self, height: f32, geometry: &PageGeometry) -> Self {
        if self.fits(height, geometry) || self.y <= geometry.top_pt {
            self
        } else {
            self.next_page(geometry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_geometry_sanity() {
        let g = PageGeometry::a4();
        assert!((g.content_width() - 515.28).abs() < 1e-3);
        assert!(g.content_height() > 700.0);
        assert_eq!(PageGeometry::default(), g);
    }

    #[test]
    fn test_start_is_top_of_first_page() {
        let g = PageGeometry::a4();
        let c = LayoutCursor::start(&g);
        assert_eq!(c.page, 0);
        assert_eq!(c.y, g.top_pt);
    }

    #[test]
    fn test_reserve_keeps_cursor_when_block_fits() {
        let g = PageGeometry::a4();
        let c = LayoutCursor { y: 300.0, page: 2 };
        assert_eq!(c.reserve(100.0, &g), c);
    }

    #[test]
    fn test_reserve_breaks_page_when_block_does_not_fit() {
        let g = PageGeometry::a4();
        let c = LayoutCursor {
            y: g.bottom_limit_pt - 20.0,
            page: 0,
        };
        let moved = c.reserve(28.0, &g);
        assert_eq!(moved.page, 1);
        assert_eq!(moved.y, g.top_pt);
    }

    #[test]
    fn test_reserve_exact_fit_stays() {
        let g = PageGeometry::a4();
        let c = LayoutCursor {
            y: g.bottom_limit_pt - 28.0,
            page: 0,
        };
        assert_eq!(c.reserve(28.0, &g).page, 0);
    }

    #[test]
    fn test_reserve_oversized_block_at_page_top_does_not_loop() {
        let g = PageGeometry::a4();
        let c = LayoutCursor::start(&g).next_page(&g);
        let tall = g.content_height() * 2.0;
        assert_eq!(c.reserve(tall, &g), c);
    }

    #[test]
    fn test_advance_keeps_page() {
        let g = PageGeometry::a4();
        let c = LayoutCursor::start(&g).advance(14.0);
        assert_eq!(c.page, 0);
        assert_eq!(c.y, g.top_pt + 14.0);
    }
}
