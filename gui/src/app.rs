#![allow(non_snake_case)]
use crate::components::{CandleChart, Toolbar};
use crate::config::theme::ThemePalette;
use crate::config::AppConfig;
use crate::services::series_loader::{request_series, should_request};
use crate::state::app_state::AppState;
use dioxus::prelude::*;
use engine::data::loader::{LoadTracker, TimeSeriesLoader};
use engine::EngineError;
use std::sync::Arc;

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let loader = use_context::<Arc<TimeSeriesLoader>>();
    let mut state = use_signal(|| AppState::new(config.app.theme, config.app.granularity));
    let mut tracker = use_signal(LoadTracker::new);

    // Initial load. Reads nothing reactively, so it runs once.
    use_effect({
        let loader = loader.clone();
        move || request_series(loader.clone(), tracker, state.peek().granularity)
    });

    let on_select = {
        let loader = loader.clone();
        move |key: String| {
            let picked = state.write().select(&key);
            match picked {
                Ok(granularity) => {
                    if should_request(&tracker.peek(), granularity) {
                        request_series(loader.clone(), tracker, granularity);
                    }
                }
                Err(e) => tracker.write().reject(EngineError::from(e)),
            }
        }
    };

    let current = *state.read();
    let palette = ThemePalette::for_theme(current.theme);

    rsx! {
        div {
            class: "app",
            style: palette.page_style(),
            h1 { style: "margin: 0 0 16px 0; font-size: 24px;", "{config.window.title}" }
            div {
                style: "display: flex; gap: 16px; align-items: flex-start;",
                Toolbar {
                    granularity: current.granularity,
                    theme: current.theme,
                    on_select: on_select,
                    on_toggle_theme: move |_| state.write().toggle_theme(),
                }
                div {
                    style: "flex: 1; min-width: 0; background-color: {palette.panel}; \
                            border: 1px solid {palette.border}; border-radius: 12px;",
                    CandleChart {
                        tracker: tracker,
                        granularity: current.granularity,
                        theme: current.theme,
                        symbol: loader.settings().symbol.clone(),
                        height: config.chart.height,
                    }
                }
            }
        }
    }
}
