// Candlestick chart component: keeps one chart session in step with the
// loaded series and draws its frames as SVG.
#![allow(non_snake_case)]
use super::surface::{apply_measured_size, SvgSurface};
use crate::config::theme::ThemePalette;
use dioxus::prelude::*;
use dioxus_desktop::tao::event::{Event, WindowEvent};
use dioxus_desktop::use_wry_event_handler;
use engine::chart::scene::Frame;
use engine::chart::SessionController;
use engine::data::loader::LoadTracker;
use shared::models::{Granularity, Theme};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// Until the container reports its real size.
const INITIAL_WIDTH: f64 = 900.0;
// Ctrl+wheel is how trackpad pinches reach the webview.
const PINCH_SPEED: f64 = 0.01;

type Controller = Rc<RefCell<SessionController<SvgSurface>>>;

#[component]
pub fn CandleChart(
    tracker: Signal<LoadTracker>,
    granularity: Granularity,
    theme: Theme,
    symbol: String,
    height: f64,
) -> Element {
    let controller: Controller =
        use_hook(|| Rc::new(RefCell::new(SessionController::new(SvgSurface::new(INITIAL_WIDTH, height), symbol.clone()))));
    let pointer_x = use_hook(|| Rc::new(Cell::new(INITIAL_WIDTH / 2.0)));
    let container = use_hook(|| Rc::new(RefCell::new(None::<Rc<MountedData>>)));
    let mut redraw = use_signal(|| 0u64);
    let mut window_resized = use_signal(|| 0u64);
    use_drop({
        let controller = controller.clone();
        move || controller.borrow_mut().teardown()
    });

    use_wry_event_handler(move |event, _| {
        if let Event::WindowEvent { event: WindowEvent::Resized(_), .. } = event {
            window_resized += 1;
        }
    });

    // Re-measure the container whenever the window changes size.
    use_effect({
        let controller = controller.clone();
        let container = container.clone();
        move || {
            let _ = window_resized.read();
            let Some(element) = container.borrow().clone() else {
                return;
            };
            spawn(measure(element, controller.clone(), redraw));
        }
    });

    // Reconciling here means a frame is never drawn from a session built
    // for inputs other than the current ones.
    let _ = redraw.read();
    let (frame, loading, error) = {
        let load = tracker.read();
        let mut ctl = controller.borrow_mut();
        ctl.reconcile(load.series(), granularity, theme);
        (ctl.frame(), load.is_loading(), load.error().map(str::to_string))
    };

    let on_mounted = {
        let controller = controller.clone();
        move |evt: MountedEvent| {
            let element = evt.data();
            *container.borrow_mut() = Some(element.clone());
            measure(element, controller.clone(), redraw)
        }
    };

    let on_wheel = {
        let controller = controller.clone();
        let pointer_x = pointer_x.clone();
        move |evt: WheelEvent| {
            let delta = evt.delta().strip_units().y;
            let x = pointer_x.get();
            let mut ctl = controller.borrow_mut();
            let changed = if evt.modifiers().ctrl() {
                ctl.pinch((-delta * PINCH_SPEED).exp(), x)
            } else {
                ctl.wheel(delta, x)
            };
            drop(ctl);
            if changed {
                redraw += 1;
            }
        }
    };

    let on_mouse_down = {
        let controller = controller.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            controller.borrow_mut().drag_start(point.x, point.y);
        }
    };

    let on_mouse_move = {
        let controller = controller.clone();
        let pointer_x = pointer_x.clone();
        move |evt: MouseEvent| {
            let point = evt.element_coordinates();
            pointer_x.set(point.x);
            let mut ctl = controller.borrow_mut();
            ctl.drag_move(point.x);
            ctl.hover(point.x);
            drop(ctl);
            redraw += 1;
        }
    };

    let on_mouse_up = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.borrow_mut().drag_end()
    };

    let on_mouse_leave = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let mut ctl = controller.borrow_mut();
            ctl.drag_end();
            ctl.leave();
            drop(ctl);
            redraw += 1;
        }
    };

    let on_double_click = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            controller.borrow_mut().reset_zoom();
            redraw += 1;
        }
    };

    let palette = ThemePalette::for_theme(theme);

    rsx! {
        div {
            class: "chart-container",
            style: "position: relative; width: 100%; height: {height}px; user-select: none;",
            onmounted: on_mounted,
            if let Some(frame) = frame {
                {render_frame(&frame)}
            }
            div {
                class: "chart-overlay",
                style: "position: absolute; inset: 0; cursor: crosshair;",
                onwheel: on_wheel,
                onmousedown: on_mouse_down,
                onmousemove: on_mouse_move,
                onmouseup: on_mouse_up,
                onmouseleave: on_mouse_leave,
                ondoubleclick: on_double_click,
            }
            if loading {
                div {
                    class: "chart-loading",
                    style: palette.overlay_style(false),
                    "Loading data..."
                }
            }
            if let Some(message) = error {
                div {
                    class: "chart-error",
                    style: palette.overlay_style(true),
                    "{message}"
                }
            }
        }
    }
}

async fn measure(element: Rc<MountedData>, controller: Controller, mut redraw: Signal<u64>) {
    match element.get_client_rect().await {
        Ok(rect) => {
            let changed = apply_measured_size(&mut controller.borrow_mut(), rect.width(), rect.height());
            if changed {
                redraw += 1;
            }
        }
        Err(e) => tracing::warn!("Could not measure chart container: {:?}", e),
    }
}

fn render_frame(frame: &Frame) -> Element {
    let style = &frame.style;
    let plot = frame.plot;

    rsx! {
        svg {
            width: frame.width,
            height: frame.height,
            view_box: "0 0 {frame.width} {frame.height}",
            style: "position: absolute; top: 0; left: 0;",
            rect {
                x: 0.0,
                y: 0.0,
                width: frame.width,
                height: frame.height,
                rx: 12.0,
                fill: style.background.as_str(),
            }
            text {
                x: frame.title.x,
                y: frame.title.y,
                fill: style.title_color.as_str(),
                font_size: style.title_font_size,
                font_weight: "bold",
                text_anchor: frame.title.anchor.as_svg(),
                "{frame.title.text}"
            }
            for line in frame.grid.iter() {
                line {
                    x1: line.x1,
                    y1: line.y1,
                    x2: line.x2,
                    y2: line.y2,
                    stroke: style.grid_color.as_str(),
                    stroke_width: 1.0,
                }
            }
            rect {
                x: plot.x,
                y: plot.y,
                width: plot.width,
                height: plot.height,
                fill: "none",
                stroke: style.border_color.as_str(),
                stroke_width: style.border_width,
            }
            for label in frame.x_labels.iter().chain(frame.y_labels.iter()) {
                text {
                    x: label.x,
                    y: label.y,
                    fill: style.tick_color.as_str(),
                    font_size: style.tick_font_size,
                    text_anchor: label.anchor.as_svg(),
                    "{label.text}"
                }
            }
            for glyph in frame.candles.iter() {
                g {
                    line {
                        x1: glyph.x,
                        y1: glyph.wick_top,
                        x2: glyph.x,
                        y2: glyph.wick_bottom,
                        stroke: style.candle_color(glyph.bullish),
                        stroke_width: 1.0,
                    }
                    rect {
                        x: glyph.body.x,
                        y: glyph.body.y,
                        width: glyph.body.width,
                        height: glyph.body.height,
                        fill: style.candle_color(glyph.bullish),
                    }
                }
            }
            if let Some(tooltip) = frame.tooltip.as_ref() {
                line {
                    x1: tooltip.crosshair_x,
                    y1: plot.y,
                    x2: tooltip.crosshair_x,
                    y2: plot.bottom(),
                    stroke: style.crosshair_color.as_str(),
                    stroke_width: 1.0,
                    stroke_dasharray: "4 4",
                }
                rect {
                    x: tooltip.frame.x,
                    y: tooltip.frame.y,
                    width: tooltip.frame.width,
                    height: tooltip.frame.height,
                    rx: 4.0,
                    fill: style.tooltip_background.as_str(),
                }
                text {
                    x: tooltip.frame.x + 8.0,
                    y: tooltip.frame.y + 16.0,
                    fill: style.tooltip_text.as_str(),
                    font_size: style.tick_font_size,
                    "{tooltip.title}"
                }
                text {
                    x: tooltip.frame.x + 8.0,
                    y: tooltip.frame.y + 32.0,
                    fill: style.tooltip_text.as_str(),
                    font_size: style.tick_font_size,
                    "{tooltip.label}"
                }
            }
        }
    }
}
