// Layout primitives for the portable-page (PDF) export.
// Implements: standard-font metrics, greedy word wrap, page geometry, explicit layout cursor.

pub mod cursor;
pub mod font_metrics;

pub use cursor::{LayoutCursor, PageGeometry};
pub use font_metrics::{get_metrics, FontFace};
