//! Provider behavior with overlay decorations (no native hook, no runtime
//! move/resize)

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use casement_core::{ClipShape, Color, CornerRadius, Insets, Point, Rect, Size};
use casement_decor::prelude::*;
use casement_decor::{
    BorderPainter, CornerMask, DecorError, MaximizedBounds, ResizeLifecycle, SystemAccent,
    WindowClip,
};
use casement_platform::{Cursor, MonitorInfo, ResizeDirection, Window, WindowState};
use common::{point, test_env, MockWindow};

fn overlay_provider() -> WindowDecorationProvider {
    WindowDecorationProvider::with_mode(DecorationConfig::default(), &test_env(), DecorationMode::None)
}

fn register(provider: &mut WindowDecorationProvider, window: &Arc<MockWindow>) -> DecorationHandle {
    let window: Arc<dyn Window> = window.clone();
    provider.register_window(window, 32.0, vec![Rect::new(700.0, 0.0, 100.0, 32.0)], None)
}

fn desktop_monitor() -> MonitorInfo {
    MonitorInfo::new(Point::ZERO, Size::new(1920.0, 1080.0), 1.0)
        .with_insets(Insets::new(0.0, 0.0, 40.0, 0.0))
}

#[derive(Default)]
struct Recorder {
    rects: Vec<(Rect, Color)>,
    masks: usize,
}

impl BorderPainter for Recorder {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push((rect, color));
    }

    fn fill_mask(&mut self, _origin: Point, _mask: &CornerMask, _color: Color) {
        self.masks += 1;
    }
}

#[test]
fn test_classify_title_bar() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)));
    let handle = register(&mut provider, &window);

    assert_eq!(provider.mode(), DecorationMode::None);
    assert_eq!(provider.classify(handle, point(750.0, 10.0), false).unwrap(), Region::Client);
    assert_eq!(provider.classify(handle, point(10.0, 10.0), false).unwrap(), Region::Caption);
    assert_eq!(provider.classify(handle, point(400.0, 600.0), true).unwrap(), Region::Resize);

    // moving the button spot away turns that area into caption
    provider.update_hit_test_spots(handle, Vec::new()).unwrap();
    assert_eq!(provider.classify(handle, point(750.0, 10.0), false).unwrap(), Region::Caption);
}

#[test]
fn test_register_twice_returns_same_handle() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)));

    let first = register(&mut provider, &window);
    let dyn_window: Arc<dyn Window> = window.clone();
    let second = provider.register_window(dyn_window, 48.0, Vec::new(), None);

    assert_eq!(first, second);
    assert_eq!(provider.handle_for(window.id()), Some(first));
    assert_eq!(provider.classify(first, point(750.0, 40.0), false).unwrap(), Region::Caption);
}

#[test]
fn test_hover_sets_resize_cursor() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)));
    let handle = register(&mut provider, &window);

    let outcome = provider.pointer_moved(handle, point(2.0, 300.0)).unwrap();
    assert_eq!(outcome, PointerOutcome::Passed(Region::Resize));
    assert_eq!(window.last_cursor(), Some(Cursor::ResizeEW));

    let outcome = provider.pointer_moved(handle, point(10.0, 10.0)).unwrap();
    assert_eq!(outcome, PointerOutcome::Passed(Region::Caption));
    assert_eq!(window.last_cursor(), Some(Cursor::Default));

    // unchanged cursor is not re-applied
    provider.pointer_moved(handle, point(20.0, 10.0)).unwrap();
    assert_eq!(window.cursors.lock().len(), 2);
}

#[test]
fn test_southeast_drag_clamps_to_fallback_minimum() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(100.0, 100.0, 200.0, 100.0)));
    let handle = register(&mut provider, &window);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    provider.on_resize(move |_, event| sink.borrow_mut().push(event));

    let outcome = provider.pointer_pressed(handle, point(199.0, 99.0)).unwrap();
    assert_eq!(outcome, PointerOutcome::Consumed);

    // pointer 100 left and 70 up: naive result would be 100x30
    provider.pointer_moved(handle, point(99.0, 29.0)).unwrap();
    assert_eq!(window.bounds(), Rect::new(100.0, 100.0, 150.0, 50.0));

    provider.pointer_moved(handle, point(99.0, 29.0)).unwrap();
    assert_eq!(window.bounds(), Rect::new(100.0, 100.0, 150.0, 50.0));

    provider.pointer_released(handle).unwrap();
    assert_eq!(
        *events.borrow(),
        vec![
            ResizeLifecycle::Started(ResizeDirection::SouthEast),
            ResizeLifecycle::Ended(ResizeDirection::SouthEast),
        ]
    );

    // shape followed the new size
    assert_eq!(
        window.last_shape(),
        Some(Some(ClipShape::RoundedRect {
            rect: Rect::new(0.0, 0.0, 150.0, 50.0),
            corner_radius: CornerRadius::uniform(7.0),
        }))
    );
}

#[test]
fn test_press_outside_handles_passes_region() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)));
    let handle = register(&mut provider, &window);

    assert_eq!(
        provider.pointer_pressed(handle, point(300.0, 10.0)).unwrap(),
        PointerOutcome::Passed(Region::Caption)
    );
    provider.pointer_released(handle).unwrap();
    assert_eq!(window.bounds(), Rect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn test_clip_follows_state() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)).with_scale(2.0));
    let handle = register(&mut provider, &window);

    assert_eq!(
        provider.clip(handle).unwrap(),
        WindowClip::Shaped(ClipShape::RoundedRect {
            rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            corner_radius: CornerRadius::uniform(15.0),
        })
    );

    window.set_state(WindowState::FULLSCREEN);
    provider.window_state_changed(handle).unwrap();
    assert_eq!(provider.clip(handle).unwrap(), WindowClip::NoClip);
    assert_eq!(window.last_shape(), Some(None));

    window.set_state(WindowState::NORMAL);
    provider.window_state_changed(handle).unwrap();
    assert!(provider.clip(handle).unwrap().is_clipped());
}

#[test]
fn test_unsupported_shaping_paints_square_border() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)).without_shaping());
    let handle = register(&mut provider, &window);

    assert_eq!(provider.clip(handle).unwrap(), WindowClip::NoClip);

    let mut recorder = Recorder::default();
    provider.paint_border(handle, &mut recorder).unwrap();
    assert_eq!(recorder.rects.len(), 4);
    assert_eq!(recorder.masks, 0);
}

#[test]
fn test_rounded_border_uses_border_color() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)));
    let handle = register(&mut provider, &window);

    let mut recorder = Recorder::default();
    provider.paint_border(handle, &mut recorder).unwrap();
    assert_eq!(recorder.masks, 4);
    assert!(recorder
        .rects
        .iter()
        .all(|(_, color)| *color == Color::from_hex(0x707070)));
}

#[test]
fn test_border_color_follows_focus_and_accent() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)));
    let handle = register(&mut provider, &window);

    assert_eq!(provider.border_color(handle).unwrap(), Color::from_hex(0x707070));

    provider.set_system_accent(Some(SystemAccent {
        affects_borders: true,
        colorization: Some(Color::from_hex(0x0078D4)),
        balance: 100,
    }));
    assert_eq!(provider.border_color(handle).unwrap(), Color::from_hex(0x0078D4));

    provider.focus_changed(handle, false).unwrap();
    assert_eq!(provider.border_color(handle).unwrap(), Color::from_hex(0xAAAAAA));
}

#[test]
fn test_maximize_resolves_work_area() {
    let mut provider = overlay_provider();
    let window = Arc::new(
        MockWindow::new(1, Rect::new(100.0, 100.0, 400.0, 300.0)).with_monitor(desktop_monitor()),
    );
    let handle = register(&mut provider, &window);

    let bounds = provider.maximize(handle).unwrap();
    assert_eq!(
        bounds,
        Some(MaximizedBounds {
            bounds: Rect::new(0.0, 0.0, 1920.0, 1040.0),
            monitor_origin: Point::ZERO,
        })
    );
    assert_eq!(*window.maximized_bounds.lock(), Some(Rect::new(0.0, 0.0, 1920.0, 1040.0)));
    assert_eq!(*window.maximize_calls.lock(), vec![true]);

    // already up to date: no toggle when the state change arrives
    provider.window_state_changed(handle).unwrap();
    assert_eq!(*window.maximize_calls.lock(), vec![true]);
    assert_eq!(window.last_shape(), Some(None));
}

#[test]
fn test_external_maximize_toggles_once() {
    let mut provider = overlay_provider();
    let window = Arc::new(
        MockWindow::new(1, Rect::new(100.0, 100.0, 400.0, 300.0)).with_monitor(desktop_monitor()),
    );
    let handle = register(&mut provider, &window);

    window.set_state(WindowState::MAXIMIZED);
    provider.window_state_changed(handle).unwrap();
    assert_eq!(*window.maximize_calls.lock(), vec![false, true]);
    assert_eq!(*window.maximized_bounds.lock(), Some(Rect::new(0.0, 0.0, 1920.0, 1040.0)));

    window.set_state(WindowState::NORMAL);
    provider.window_state_changed(handle).unwrap();

    // same monitor: bounds resolve identically, no second toggle
    window.set_state(WindowState::MAXIMIZED);
    provider.window_state_changed(handle).unwrap();
    assert_eq!(*window.maximize_calls.lock(), vec![false, true]);
}

#[test]
fn test_external_maximize_without_bounds_hint_keeps_state() {
    let mut provider = overlay_provider();
    let window = Arc::new(
        MockWindow::new(1, Rect::new(100.0, 100.0, 400.0, 300.0))
            .with_monitor(desktop_monitor())
            .without_bounds_hint(),
    );
    let handle = register(&mut provider, &window);

    window.set_state(WindowState::MAXIMIZED);
    provider.window_state_changed(handle).unwrap();

    // nothing for the window manager to re-read, so no restore flicker
    assert!(window.maximize_calls.lock().is_empty());
    assert_eq!(*window.maximized_bounds.lock(), None);

    // an explicit maximize still reports the resolved bounds
    window.set_state(WindowState::NORMAL);
    provider.window_state_changed(handle).unwrap();
    let bounds = provider.maximize(handle).unwrap();
    assert_eq!(bounds.map(|b| b.to_screen()), Some(Rect::new(0.0, 0.0, 1920.0, 1040.0)));
    assert_eq!(*window.maximize_calls.lock(), vec![true]);
}

#[test]
fn test_accent_burst_delivers_once() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)));
    register(&mut provider, &window);

    let deliveries = Rc::new(Cell::new(0));
    let counter = Rc::clone(&deliveries);
    provider.on_accent_changed(move |_| counter.set(counter.get() + 1));

    let notifier = provider.accent_notifier();
    let start = Instant::now();
    for i in 0..10 {
        notifier.notify(start + Duration::from_millis(20 * i));
    }

    let quiet_until = start + Duration::from_millis(180 + 300);
    assert_eq!(provider.poll_accent(quiet_until - Duration::from_millis(1)), Some(quiet_until));
    assert_eq!(deliveries.get(), 0);

    assert_eq!(provider.poll_accent(quiet_until), None);
    assert_eq!(deliveries.get(), 1);

    provider.poll_accent(quiet_until + Duration::from_secs(1));
    assert_eq!(deliveries.get(), 1);
    assert!(window.redraws.load(std::sync::atomic::Ordering::SeqCst) >= 1);
}

#[test]
fn test_unregister_forgets_window() {
    let mut provider = overlay_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 400.0, 300.0)));
    let handle = register(&mut provider, &window);

    provider.unregister_window(handle).unwrap();

    assert_eq!(provider.handle_for(window.id()), None);
    assert_eq!(window.last_shape(), Some(None));
    assert!(matches!(
        provider.classify(handle, point(10.0, 10.0), false),
        Err(DecorError::UnknownWindow)
    ));
    assert!(matches!(provider.unregister_window(handle), Err(DecorError::UnknownWindow)));
}
