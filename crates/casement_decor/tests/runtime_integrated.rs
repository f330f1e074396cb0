mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use casement_core::Rect;
use casement_decor::prelude::*;
use casement_decor::ResizeLifecycle;
use casement_platform::{ResizeDirection, Window};
use common::{point, test_env, MockWindow};

fn runtime_provider() -> WindowDecorationProvider {
    WindowDecorationProvider::with_mode(
        DecorationConfig::default(),
        &test_env(),
        DecorationMode::RuntimeIntegrated,
    )
}

fn register(provider: &mut WindowDecorationProvider, window: &Arc<MockWindow>) -> DecorationHandle {
    let window: Arc<dyn Window> = window.clone();
    provider.register_window(window, 32.0, vec![Rect::new(700.0, 0.0, 100.0, 32.0)], None)
}

#[test]
fn test_presses_hand_off_to_window_manager() {
    let mut provider = runtime_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)).with_runtime_moves());
    let handle = register(&mut provider, &window);

    assert_eq!(provider.mode(), DecorationMode::RuntimeIntegrated);

    assert_eq!(provider.pointer_pressed(handle, point(10.0, 10.0)).unwrap(), PointerOutcome::Consumed);
    assert_eq!(window.moves.load(Ordering::SeqCst), 1);

    assert_eq!(provider.pointer_pressed(handle, point(2.0, 300.0)).unwrap(), PointerOutcome::Consumed);
    assert_eq!(*window.resizes.lock(), vec![ResizeDirection::West]);

    assert_eq!(
        provider.pointer_pressed(handle, point(750.0, 10.0)).unwrap(),
        PointerOutcome::Passed(Region::Client)
    );
    assert_eq!(window.moves.load(Ordering::SeqCst), 1);
}

#[test]
fn test_refused_resize_falls_back_to_overlay() {
    let mut provider = runtime_provider();
    let window = Arc::new(MockWindow::new(1, Rect::new(0.0, 0.0, 800.0, 600.0)));
    let handle = register(&mut provider, &window);

    let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    provider.on_resize(move |_, event| sink.lock().push(event));

    assert_eq!(provider.pointer_pressed(handle, point(2.0, 300.0)).unwrap(), PointerOutcome::Consumed);
    provider.pointer_moved(handle, point(-48.0, 300.0)).unwrap();
    provider.pointer_released(handle).unwrap();

    assert_eq!(window.bounds(), Rect::new(-50.0, 0.0, 850.0, 600.0));
    assert_eq!(
        *events.lock(),
        vec![
            ResizeLifecycle::Started(ResizeDirection::West),
            ResizeLifecycle::Ended(ResizeDirection::West),
        ]
    );

    // a refused move leaves the caption press to the application
    assert_eq!(
        provider.pointer_pressed(handle, point(10.0, 10.0)).unwrap(),
        PointerOutcome::Passed(Region::Caption)
    );
}
