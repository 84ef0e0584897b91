//! Application state shared across all request handlers.

use herald_core::admission::AdmissionController;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Admission pipeline, owning the dedup cache.
    pub admission: AdmissionController,
}

impl AppState {
    pub fn new(admission: AdmissionController) -> Self {
        Self { admission }
    }
}
