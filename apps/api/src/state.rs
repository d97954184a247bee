use std::sync::Arc;

use crate::export::assets::AssetSource;
use crate::export::delivery::FileDelivery;
use crate::layout::PageGeometry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Badge source for DOCX exports. HTTP or filesystem, chosen from `BADGE_ASSET`.
    pub assets: Arc<dyn AssetSource>,
    /// Set when `EXPORT_DIR` is configured.
    pub delivery: Option<Arc<dyn FileDelivery>>,
    pub page_geometry: PageGeometry,
}
