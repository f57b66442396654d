// Owns the single live chart session of a display surface and rebuilds it
// when the series, granularity or theme changes.
use super::scene::Frame;
use super::session::{ChartSession, SessionId, SessionKey, Tooltip};
use shared::models::{CandleSeries, Granularity, Theme};

/// A drawable region that sessions attach to.
///
/// Whatever native resources a session needs are allocated on `attach` and
/// released on `detach`. The controller guarantees at most one attached
/// session per surface and always detaches before attaching the next.
pub trait RenderSurface {
    fn attach(&mut self, session: &ChartSession);
    fn detach(&mut self, session: SessionId);
    /// Current drawable size in pixels.
    fn size(&self) -> (f64, f64);
}

/// The rebuild rule: a new session is needed exactly when the inputs it would
/// be built from differ from those of the current one.
pub fn needs_rebuild(current: Option<&SessionKey>, next: Option<&SessionKey>) -> bool {
    current != next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    Unchanged,
    Rebuilt,
    Cleared,
}

pub struct SessionController<S: RenderSurface> {
    surface: S,
    symbol: String,
    active: Option<ChartSession>,
    created: u64,
    disposed: u64,
    torn_down: bool,
}

impl<S: RenderSurface> SessionController<S> {
    pub fn new(surface: S, symbol: impl Into<String>) -> Self {
        Self { surface, symbol: symbol.into(), active: None, created: 0, disposed: 0, torn_down: false }
    }

    /// Brings the live session in line with the given inputs.
    ///
    /// A missing or empty series, or one loaded for another granularity,
    /// leaves the surface without a session. The previous session is always
    /// detached before its replacement is attached, within this one call.
    pub fn reconcile(&mut self, series: Option<&CandleSeries>, granularity: Granularity, theme: Theme) -> Reconcile {
        let series = series.filter(|s| {
            if s.granularity() != granularity {
                tracing::debug!(series = %s.granularity(), %granularity, "Series granularity does not match selection");
                return false;
            }
            !s.is_empty()
        });
        let next = series.map(|s| SessionKey { series: s.id(), granularity, theme });
        let current = self.active.as_ref().map(ChartSession::key);
        if self.torn_down || !needs_rebuild(current.as_ref(), next.as_ref()) {
            return Reconcile::Unchanged;
        }

        self.dispose_active();
        let Some(series) = series else {
            tracing::debug!(%granularity, ?theme, "No candles to draw; chart session cleared");
            return Reconcile::Cleared;
        };

        let session = ChartSession::new(series.clone(), granularity, theme, &self.symbol, self.surface.size());
        self.surface.attach(&session);
        self.created += 1;
        tracing::info!(
            session = ?session.id(),
            %granularity,
            ?theme,
            candles = series.len(),
            "Chart session created"
        );
        self.active = Some(session);
        Reconcile::Rebuilt
    }

    fn dispose_active(&mut self) {
        if let Some(session) = self.active.take() {
            self.surface.detach(session.id());
            self.disposed += 1;
            tracing::debug!(session = ?session.id(), "Chart session disposed");
        }
    }

    /// Disposes the live session for good; later reconciles build nothing.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.dispose_active();
        tracing::debug!(created = self.created, disposed = self.disposed, "Chart surface torn down");
    }

    pub fn session(&self) -> Option<&ChartSession> {
        self.active.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn disposed(&self) -> u64 {
        self.disposed
    }

    pub fn frame(&self) -> Option<Frame> {
        self.active.as_ref().map(ChartSession::frame)
    }

    /// Picks up a new surface size without rebuilding the session.
    pub fn resize(&mut self) {
        let (width, height) = self.surface.size();
        if let Some(session) = self.active.as_mut() {
            session.resize(width, height);
        }
    }

    pub fn wheel(&mut self, delta_y: f64, x: f64) -> bool {
        self.active.as_mut().is_some_and(|s| s.wheel(delta_y, x))
    }

    pub fn pinch(&mut self, scale: f64, x: f64) -> bool {
        self.active.as_mut().is_some_and(|s| s.pinch(scale, x))
    }

    pub fn drag_start(&mut self, x: f64, y: f64) {
        if let Some(session) = self.active.as_mut() {
            session.drag_start(x, y);
        }
    }

    pub fn drag_move(&mut self, x: f64) -> bool {
        self.active.as_mut().is_some_and(|s| s.drag_move(x))
    }

    pub fn drag_end(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.drag_end();
        }
    }

    pub fn hover(&mut self, x: f64) -> Option<Tooltip> {
        self.active.as_mut().and_then(|s| s.hover(x))
    }

    pub fn leave(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.leave();
        }
    }

    pub fn reset_zoom(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.reset_zoom();
        }
    }
}

impl<S: RenderSurface> Drop for SessionController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::Candle;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Attach(SessionId),
        Detach(SessionId),
    }

    #[derive(Default, Clone)]
    struct RecordingSurface {
        events: Rc<RefCell<Vec<Event>>>,
        attached: Rc<RefCell<Option<SessionId>>>,
    }

    impl RenderSurface for RecordingSurface {
        fn attach(&mut self, session: &ChartSession) {
            let mut attached = self.attached.borrow_mut();
            assert!(attached.is_none(), "two sessions attached to one surface");
            *attached = Some(session.id());
            self.events.borrow_mut().push(Event::Attach(session.id()));
        }

        fn detach(&mut self, session: SessionId) {
            let mut attached = self.attached.borrow_mut();
            assert_eq!(*attached, Some(session), "detaching a session that is not attached");
            *attached = None;
            self.events.borrow_mut().push(Event::Detach(session));
        }

        fn size(&self) -> (f64, f64) {
            (900.0, 500.0)
        }
    }

    impl RecordingSurface {
        fn counts(&self) -> (usize, usize) {
            let events = self.events.borrow();
            let attaches = events.iter().filter(|e| matches!(e, Event::Attach(_))).count();
            (attaches, events.len() - attaches)
        }
    }

    fn series(granularity: Granularity, n: usize) -> CandleSeries {
        let start = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap().and_hms_opt(9, 15, 0).unwrap();
        let candles = (0..n)
            .map(|i| Candle {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open: 100.0,
                high: 105.0,
                low: 99.0,
                close: 103.0,
            })
            .collect();
        CandleSeries::new(granularity, candles)
    }

    fn controller() -> (SessionController<RecordingSurface>, RecordingSurface) {
        let surface = RecordingSurface::default();
        (SessionController::new(surface.clone(), "NIFTY"), surface)
    }

    #[test]
    fn test_needs_rebuild() {
        let s = series(Granularity::Minute1, 1);
        let key = SessionKey { series: s.id(), granularity: Granularity::Minute1, theme: Theme::Light };
        assert!(!needs_rebuild(None, None));
        assert!(needs_rebuild(None, Some(&key)));
        assert!(needs_rebuild(Some(&key), None));
        assert!(!needs_rebuild(Some(&key), Some(&key)));
        assert!(needs_rebuild(Some(&key), Some(&SessionKey { theme: Theme::Dark, ..key })));
        assert!(needs_rebuild(Some(&key), Some(&SessionKey { granularity: Granularity::Second1, ..key })));
    }

    #[test]
    fn test_same_inputs_do_not_rebuild() {
        let (mut ctl, surface) = controller();
        let s = series(Granularity::Minute1, 3);
        assert_eq!(ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Light), Reconcile::Rebuilt);
        assert_eq!(ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Light), Reconcile::Unchanged);
        assert_eq!(ctl.reconcile(Some(&s.clone()), Granularity::Minute1, Theme::Light), Reconcile::Unchanged);
        assert_eq!(surface.counts(), (1, 0));
    }

    #[test]
    fn test_theme_toggle_rebuilds_once() {
        let (mut ctl, surface) = controller();
        let s = series(Granularity::Minute1, 3);
        ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Light);
        let first = ctl.session().unwrap().id();

        assert_eq!(ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Dark), Reconcile::Rebuilt);
        assert_eq!(ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Dark), Reconcile::Unchanged);

        let second = ctl.session().unwrap().id();
        assert_ne!(first, second);
        assert_eq!(*surface.events.borrow(), vec![Event::Attach(first), Event::Detach(first), Event::Attach(second)]);
        assert_eq!((ctl.created(), ctl.disposed()), (2, 1));
        assert_eq!(ctl.session().unwrap().style().grid_color, "#333333");
    }

    #[test]
    fn test_reloaded_series_rebuilds_even_with_equal_values() {
        let (mut ctl, _surface) = controller();
        let a = series(Granularity::Minute1, 3);
        let b = CandleSeries::new(Granularity::Minute1, a.candles().to_vec());
        ctl.reconcile(Some(&a), Granularity::Minute1, Theme::Light);
        assert_eq!(ctl.reconcile(Some(&b), Granularity::Minute1, Theme::Light), Reconcile::Rebuilt);
    }

    #[test]
    fn test_empty_or_missing_series_builds_nothing() {
        let (mut ctl, surface) = controller();
        let empty = series(Granularity::Minute1, 0);
        assert_eq!(ctl.reconcile(Some(&empty), Granularity::Minute1, Theme::Light), Reconcile::Unchanged);
        assert_eq!(ctl.reconcile(None, Granularity::Minute1, Theme::Light), Reconcile::Unchanged);
        assert!(ctl.session().is_none());
        assert!(ctl.frame().is_none());
        assert_eq!(surface.counts(), (0, 0));
    }

    #[test]
    fn test_loading_clears_previous_session() {
        let (mut ctl, surface) = controller();
        let s = series(Granularity::Minute1, 3);
        ctl.reconcile(Some(&s), Granularity::Minute1, Theme::Light);
        assert_eq!(ctl.reconcile(None, Granularity::Second1, Theme::Light), Reconcile::Cleared);
        assert!(ctl.session().is_none());
        assert_eq!(surface.counts(), (1, 1));

        let fine = series(Granularity::Second1, 2);
        assert_eq!(ctl.reconcile(Some(&fine), Granularity::Second1, Theme::Light), Reconcile::Rebuilt);
        assert_eq!(ctl.session().unwrap().title(), "NIFTY Candlestick Chart (1 Second)");
    }

    #[test]
    fn test_series_for_other_granularity_builds_nothing() {
        let (mut ctl, surface) = controller();
        let minutes = series(Granularity::Minute1, 3);
        assert_eq!(ctl.reconcile(Some(&minutes), Granularity::Second1, Theme::Light), Reconcile::Unchanged);
        assert!(ctl.session().is_none());

        ctl.reconcile(Some(&minutes), Granularity::Minute1, Theme::Light);
        assert_eq!(ctl.reconcile(Some(&minutes), Granularity::Second1, Theme::Light), Reconcile::Cleared);
        assert!(ctl.session().is_none());
        assert_eq!(surface.counts(), (1, 1));
    }

    #[test]
    fn test_teardown_disposes_exactly_once() {
        let (mut ctl, surface) = controller();
        ctl.reconcile(Some(&series(Granularity::Minute1, 3)), Granularity::Minute1, Theme::Light);
        ctl.teardown();
        ctl.teardown();
        assert_eq!(ctl.reconcile(Some(&series(Granularity::Minute1, 3)), Granularity::Minute1, Theme::Dark), Reconcile::Unchanged);
        drop(ctl);
        assert_eq!(surface.counts(), (1, 1));
        assert_eq!(*surface.attached.borrow(), None);
    }

    #[test]
    fn test_drop_disposes_live_session() {
        let (mut ctl, surface) = controller();
        ctl.reconcile(Some(&series(Granularity::Minute1, 3)), Granularity::Minute1, Theme::Light);
        drop(ctl);
        assert_eq!(surface.counts(), (1, 1));
    }

    #[test]
    fn test_interaction_without_session_is_noop() {
        let (mut ctl, _surface) = controller();
        assert!(!ctl.wheel(-100.0, 400.0));
        assert!(!ctl.drag_move(10.0));
        assert!(ctl.hover(400.0).is_none());
        ctl.leave();
        ctl.reset_zoom();
    }

    #[test]
    fn test_interaction_reaches_live_session() {
        let (mut ctl, _surface) = controller();
        ctl.reconcile(Some(&series(Granularity::Minute1, 30)), Granularity::Minute1, Theme::Light);
        let plot = ctl.session().unwrap().plot_area();
        assert!(ctl.wheel(-300.0, plot.x + plot.width / 2.0));
        assert!(ctl.session().unwrap().viewport().is_zoomed());
        assert!(ctl.hover(plot.x + plot.width / 2.0).is_some());
        assert!(ctl.frame().unwrap().tooltip.is_some());
        ctl.reset_zoom();
        assert!(!ctl.session().unwrap().viewport().is_zoomed());
    }
}
