// Global application state for the GUI: the user's current selections.
// Load progress lives in engine::data::loader::LoadTracker, owned by the app.

use shared::models::{Granularity, Theme, UnknownGranularity};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AppState {
    pub theme: Theme,
    pub granularity: Granularity,
}

impl AppState {
    pub fn new(theme: Theme, granularity: Granularity) -> Self {
        Self { theme, granularity }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = ?self.theme, "Theme toggled");
    }

    /// Applies a granularity picked by its key. An unknown key leaves the
    /// current selection in place.
    pub fn select(&mut self, key: &str) -> Result<Granularity, UnknownGranularity> {
        let granularity: Granularity = key.parse()?;
        self.granularity = granularity;
        Ok(granularity)
    }
}
