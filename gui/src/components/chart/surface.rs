// The webview-side render surface. Sessions draw into an <svg> element whose
// nodes Dioxus owns, so attaching only records which session is live and the
// size it draws at.
use engine::chart::{ChartSession, RenderSurface, SessionController, SessionId};

pub struct SvgSurface {
    width: f64,
    height: f64,
    attached: Option<SessionId>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, attached: None }
    }

    /// Returns `true` when the size actually changed.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        if width <= 0.0 || height <= 0.0 || (width == self.width && height == self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }
}

impl RenderSurface for SvgSurface {
    fn attach(&mut self, session: &ChartSession) {
        if let Some(previous) = self.attached {
            tracing::warn!(?previous, next = ?session.id(), "Surface still held a session on attach");
        }
        self.attached = Some(session.id());
    }

    fn detach(&mut self, session: SessionId) {
        if self.attached == Some(session) {
            self.attached = None;
        }
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Applies a measured container size to the surface and the live session.
/// Returns `true` when the chart has to be redrawn.
pub fn apply_measured_size(controller: &mut SessionController<SvgSurface>, width: f64, height: f64) -> bool {
    if !controller.surface_mut().set_size(width, height) {
        return false;
    }
    controller.resize();
    tracing::debug!(width, height, "Chart surface resized");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{Candle, CandleSeries, Granularity, Theme};

    fn minute_series(n: i64) -> CandleSeries {
        let start = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap().and_hms_opt(9, 15, 0).unwrap();
        let candles = (0..n)
            .map(|i| Candle {
                timestamp: start + chrono::Duration::minutes(i),
                open: 100.0,
                high: 104.0,
                low: 99.0,
                close: 102.0,
            })
            .collect();
        CandleSeries::new(Granularity::Minute1, candles)
    }

    #[test]
    fn test_set_size_ignores_degenerate_sizes() {
        let mut surface = SvgSurface::new(800.0, 500.0);
        assert!(!surface.set_size(0.0, 500.0));
        assert!(!surface.set_size(800.0, 500.0));
        assert!(surface.set_size(1024.0, 500.0));
        assert_eq!(surface.size(), (1024.0, 500.0));
    }

    #[test]
    fn test_window_resize_reaches_live_session() {
        let mut ctl = SessionController::new(SvgSurface::new(900.0, 500.0), "NIFTY");
        ctl.reconcile(Some(&minute_series(10)), Granularity::Minute1, Theme::Light);
        let session = ctl.session().unwrap().id();
        assert_eq!(ctl.frame().unwrap().width, 900.0);

        assert!(apply_measured_size(&mut ctl, 1400.0, 500.0));
        assert_eq!(ctl.frame().unwrap().width, 1400.0);
        assert_eq!(ctl.session().unwrap().id(), session, "resizing must not rebuild the session");

        assert!(!apply_measured_size(&mut ctl, 1400.0, 500.0));
        assert!(apply_measured_size(&mut ctl, 700.0, 420.0));
        assert_eq!(ctl.session().unwrap().size(), (700.0, 420.0));
    }
}
