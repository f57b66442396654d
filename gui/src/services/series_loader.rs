// Bridges the engine loader into Dioxus: loads run as spawned tasks and
// report back through the shared LoadTracker signal.
use dioxus::prelude::*;
use engine::data::loader::{LoadTracker, TimeSeriesLoader};
use shared::models::Granularity;
use std::sync::Arc;

/// Whether picking `granularity` should start a load. Re-picking the series
/// that is loading or loaded is a no-op; re-picking a failed one retries.
pub fn should_request(tracker: &LoadTracker, granularity: Granularity) -> bool {
    tracker.requested() != Some(granularity) || tracker.error().is_some()
}

/// Starts loading `granularity`, superseding any load still in flight.
pub fn request_series(loader: Arc<TimeSeriesLoader>, mut tracker: Signal<LoadTracker>, granularity: Granularity) {
    let ticket = tracker.write().begin(granularity);
    spawn(async move {
        let result = loader.load(ticket.granularity()).await;
        tracker.write().finish(ticket, result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::EngineError;
    use shared::models::CandleSeries;

    #[test]
    fn test_should_request() {
        let mut tracker = LoadTracker::new();
        assert!(should_request(&tracker, Granularity::Minute1));

        let ticket = tracker.begin(Granularity::Minute1);
        assert!(!should_request(&tracker, Granularity::Minute1));
        assert!(should_request(&tracker, Granularity::Second1));

        tracker.finish(ticket, Ok(CandleSeries::new(Granularity::Minute1, Vec::new())));
        assert!(!should_request(&tracker, Granularity::Minute1));

        let ticket = tracker.begin(Granularity::Second1);
        tracker.finish(ticket, Err(EngineError::CsvDataFormatError("bad".to_string())));
        assert!(should_request(&tracker, Granularity::Second1));
    }
}
