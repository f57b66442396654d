// Time-series loading: granularity -> feed address -> fetched text -> candle series.
use super::csv_parser::FeedParser;
use super::feed::{DefaultFetcher, FeedFetcher, FeedSource};
use crate::config::settings::LoaderSettings;
use crate::error::EngineError;
use shared::models::{CandleSeries, Granularity};
use std::sync::Arc;
use std::time::Duration;

pub struct TimeSeriesLoader {
    settings: LoaderSettings,
    parser: FeedParser,
    fetcher: Arc<dyn FeedFetcher>,
}

impl TimeSeriesLoader {
    pub fn new(settings: LoaderSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        let fetcher = DefaultFetcher::new(Duration::from_secs(settings.request_timeout_secs))?;
        Ok(Self::with_fetcher(settings, Arc::new(fetcher)))
    }

    pub fn with_fetcher(settings: LoaderSettings, fetcher: Arc<dyn FeedFetcher>) -> Self {
        let parser = FeedParser::new(settings.delimiter);
        Self { settings, parser, fetcher }
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Looks up the feed for a granularity. A granularity without a
    /// configured feed is an error, never a fallback to another feed.
    pub fn resolve(&self, granularity: Granularity) -> Result<FeedSource, EngineError> {
        self.settings
            .feed_address(granularity)
            .map(FeedSource::from_address)
            .ok_or_else(|| EngineError::ConfigError(format!("No data feed configured for '{}'", granularity)))
    }

    pub async fn load(&self, granularity: Granularity) -> Result<CandleSeries, EngineError> {
        let source = self.resolve(granularity)?;
        tracing::info!(%granularity, %source, "Loading candle feed");

        let text = self.fetcher.fetch(&source).await.map_err(|e| {
            tracing::error!(%granularity, %source, error = %e, "Failed to fetch candle feed");
            e
        })?;
        let candles = self.parser.parse(&text).map_err(|e| {
            tracing::error!(%granularity, %source, error = %e, "Failed to parse candle feed");
            e
        })?;

        tracing::info!(%granularity, candles = candles.len(), "Candle feed loaded");
        Ok(CandleSeries::new(granularity, candles))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(CandleSeries),
    Failed(String),
}

/// Identifies one load request. Only the most recent ticket may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    id: u64,
    granularity: Granularity,
}

impl LoadTicket {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

/// Latest-request-wins bookkeeping for loads.
///
/// Starting a request supersedes every earlier one. A superseded request is
/// not aborted; its result is dropped when it arrives.
#[derive(Debug)]
pub struct LoadTracker {
    latest: u64,
    requested: Option<Granularity>,
    state: LoadState,
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTracker {
    pub fn new() -> Self {
        LoadTracker { latest: 0, requested: None, state: LoadState::Loading }
    }

    pub fn begin(&mut self, granularity: Granularity) -> LoadTicket {
        self.latest += 1;
        self.requested = Some(granularity);
        self.state = LoadState::Loading;
        tracing::debug!(%granularity, ticket = self.latest, "Load requested");
        LoadTicket { id: self.latest, granularity }
    }

    /// Applies a finished load. Returns `false`, leaving the state untouched,
    /// when the ticket has been superseded.
    pub fn finish(&mut self, ticket: LoadTicket, result: Result<CandleSeries, EngineError>) -> bool {
        if ticket.id != self.latest || self.requested != Some(ticket.granularity) {
            tracing::warn!(
                granularity = %ticket.granularity,
                ticket = ticket.id,
                latest = self.latest,
                "Discarding stale load result"
            );
            return false;
        }
        self.state = match result {
            Ok(series) => LoadState::Ready(series),
            Err(e) => LoadState::Failed(e.user_message()),
        };
        true
    }

    /// Records a selection that cannot be loaded at all, superseding any
    /// request still in flight.
    pub fn reject(&mut self, error: EngineError) {
        self.latest += 1;
        self.requested = None;
        tracing::warn!(error = %error, "Rejected load request");
        self.state = LoadState::Failed(error.user_message());
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn requested(&self) -> Option<Granularity> {
        self.requested
    }

    pub fn series(&self) -> Option<&CandleSeries> {
        match &self.state {
            LoadState::Ready(series) => Some(series),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
