//! Frameless window with a custom title bar
//!
//! Run with `RUST_LOG=casement_decor=debug` to watch the decoration layer,
//! and `CASEMENT_DECORATION_MODE=none` to force the overlay fallback.

use casement_core::Rect;
use casement_decor::{DecorationConfig, LayoutDirection, Region, TitleBarSpots, WindowButtons};
use casement_platform::WindowConfig;
use casement_platform_desktop::{ControlFlow, DecoratedEventLoop, DesktopEvent, PointerKind};
use tracing_subscriber::EnvFilter;
use winit::event::MouseButton;

const TITLE_BAR_HEIGHT: f32 = 33.0;
const WIDTH: f32 = 960.0;

fn title_bar(width: f32) -> casement_decor::HitTestInfo {
    let button = |index: f32| Rect::new(width - 46.0 * index, 0.0, 46.0, TITLE_BAR_HEIGHT - 1.0);

    TitleBarSpots::new(TITLE_BAR_HEIGHT)
        .app_icon(Rect::new(8.0, 8.0, 16.0, 16.0))
        .menu_bar(
            Rect::new(32.0, 0.0, 320.0, TITLE_BAR_HEIGHT),
            Some(Rect::new(200.0, 0.0, 60.0, TITLE_BAR_HEIGHT)),
            LayoutDirection::LeftToRight,
        )
        .buttons(WindowButtons {
            minimize: Some(button(3.0)),
            maximize: Some(button(2.0)),
            close: Some(button(1.0)),
        })
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let decor_config = DecorationConfig::default().with_env_overrides()?;
    let window_config = WindowConfig {
        title: "Casement frameless demo".to_string(),
        width: WIDTH,
        ..WindowConfig::default()
    };

    let event_loop = DecoratedEventLoop::new(window_config, decor_config, title_bar(WIDTH))?;
    event_loop.run(|event, cx| {
        match event {
            DesktopEvent::Ready => {
                tracing::info!(mode = ?cx.decorations.mode(), "window ready");
            }
            DesktopEvent::Resized(size) => {
                if let Err(err) = cx.decorations.update_title_bar(cx.handle, title_bar(size.width)) {
                    tracing::warn!(%err, "title bar update failed");
                }
            }
            DesktopEvent::Pointer {
                kind: PointerKind::Released(MouseButton::Left),
                region,
                ..
            } => match region {
                Region::CloseButton => return ControlFlow::Exit,
                Region::MaximizeButton => {
                    let result = if cx.window.winit_window().is_maximized() {
                        cx.decorations.restore(cx.handle)
                    } else {
                        cx.decorations.maximize(cx.handle).map(|_| ())
                    };
                    if let Err(err) = result {
                        tracing::warn!(%err, "maximize toggle failed");
                    }
                }
                Region::MinimizeButton => cx.window.winit_window().set_minimized(true),
                _ => {}
            },
            DesktopEvent::AccentChanged => {
                if let Ok(color) = cx.decorations.border_color(cx.handle) {
                    tracing::info!(?color, "border color changed");
                }
            }
            DesktopEvent::CloseRequested => return ControlFlow::Exit,
            _ => {}
        }
        ControlFlow::Continue
    })?;

    Ok(())
}
