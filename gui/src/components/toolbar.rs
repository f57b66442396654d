// Granularity selector and theme toggle shown beside the chart.
#![allow(non_snake_case)]
use crate::config::theme::ThemePalette;
use dioxus::prelude::*;
use shared::models::{Granularity, Theme};

#[component]
pub fn Toolbar(
    granularity: Granularity,
    theme: Theme,
    on_select: EventHandler<String>,
    on_toggle_theme: EventHandler<()>,
) -> Element {
    let palette = ThemePalette::for_theme(theme);
    let theme_label = match theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    };

    rsx! {
        div {
            class: "toolbar",
            style: "display: flex; flex-direction: column; gap: 8px; min-width: 140px; padding: 12px; \
                    background-color: {palette.panel}; border: 1px solid {palette.border}; border-radius: 8px;",
            span { style: "font-weight: bold; margin-bottom: 4px;", "Timeframe" }
            for option in Granularity::ALL {
                button {
                    key: "{option.key()}",
                    style: button_style(&palette, option == granularity),
                    onclick: move |_| on_select.call(option.key().to_string()),
                    "{option.label()}"
                }
            }
            button {
                style: button_style(&palette, false),
                onclick: move |_| on_toggle_theme.call(()),
                "{theme_label}"
            }
        }
    }
}

fn button_style(palette: &ThemePalette, selected: bool) -> String {
    let (background, color) = if selected {
        (palette.accent, palette.accent_text)
    } else {
        (palette.panel, palette.foreground)
    };
    format!(
        "padding: 6px 10px; border: 1px solid {}; border-radius: 4px; cursor: pointer; \
         background-color: {background}; color: {color};",
        palette.border
    )
}
