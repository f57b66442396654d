// Chart sessions: theming, axes, pan/zoom window, frame layout and the
// controller that keeps exactly one session alive per surface.
pub mod axis;
pub mod controller;
pub mod scene;
pub mod session;
pub mod style;
pub mod viewport;

pub use controller::{needs_rebuild, Reconcile, RenderSurface, SessionController};
pub use session::{ChartSession, SessionId, SessionKey, Tooltip};
