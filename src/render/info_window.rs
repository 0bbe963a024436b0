//! The single shared info window of one map instance.

use crate::render::backend::{MapBackend, OverlayId};

/// Exclusively owned by the renderer; every open goes through here, so at
/// most one info window is visible at any time.
#[derive(Debug, Default)]
pub struct InfoWindow {
    open_on: Option<OverlayId>,
}

impl InfoWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes whatever is open, then opens on the given marker
    pub fn open<B: MapBackend>(&mut self, backend: &mut B, marker: OverlayId, content: &str) {
        backend.close_info_window();
        backend.open_info_window(marker, content);
        self.open_on = Some(marker);
    }

    pub fn close<B: MapBackend>(&mut self, backend: &mut B) {
        backend.close_info_window();
        self.open_on = None;
    }

    pub fn is_open(&self) -> bool {
        self.open_on.is_some()
    }

    pub fn open_on(&self) -> Option<OverlayId> {
        self.open_on
    }
}
