//! Scriptable window shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use casement_core::{ClipShape, Point, Rect, Size};
use casement_platform::{
    Cursor, MonitorInfo, OsFamily, PlatformError, ResizeDirection, Result, RuntimeEnvironment,
    RuntimeVersion, Window, WindowId, WindowState,
};
use parking_lot::Mutex;

pub fn test_env() -> RuntimeEnvironment {
    RuntimeEnvironment::new(OsFamily::Linux, RuntimeVersion::new("mock", [1, 0, 0]))
}

pub struct MockWindow {
    pub id: WindowId,
    pub bounds: Mutex<Rect>,
    pub state: Mutex<WindowState>,
    pub monitor: Mutex<Option<MonitorInfo>>,
    pub scale: f64,
    pub resizable: bool,
    pub shaping: bool,
    pub runtime_moves: bool,
    pub bounds_hint: bool,
    pub shapes: Mutex<Vec<Option<ClipShape>>>,
    pub maximize_calls: Mutex<Vec<bool>>,
    pub maximized_bounds: Mutex<Option<Rect>>,
    pub cursors: Mutex<Vec<Cursor>>,
    pub moves: AtomicUsize,
    pub resizes: Mutex<Vec<ResizeDirection>>,
    pub redraws: AtomicUsize,
}

impl MockWindow {
    pub fn new(id: u64, bounds: Rect) -> Self {
        Self {
            id: WindowId(id),
            bounds: Mutex::new(bounds),
            state: Mutex::new(WindowState::NORMAL),
            monitor: Mutex::new(None),
            scale: 1.0,
            resizable: true,
            shaping: true,
            runtime_moves: false,
            bounds_hint: true,
            shapes: Mutex::new(Vec::new()),
            maximize_calls: Mutex::new(Vec::new()),
            maximized_bounds: Mutex::new(None),
            cursors: Mutex::new(Vec::new()),
            moves: AtomicUsize::new(0),
            resizes: Mutex::new(Vec::new()),
            redraws: AtomicUsize::new(0),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_monitor(self, monitor: MonitorInfo) -> Self {
        *self.monitor.lock() = Some(monitor);
        self
    }

    pub fn without_shaping(mut self) -> Self {
        self.shaping = false;
        self
    }

    /// Back end that cannot pass maximized bounds to the window manager
    pub fn without_bounds_hint(mut self) -> Self {
        self.bounds_hint = false;
        self
    }

    pub fn with_runtime_moves(mut self) -> Self {
        self.runtime_moves = true;
        self
    }

    /// State change made behind the decoration layer's back
    pub fn set_state(&self, state: WindowState) {
        *self.state.lock() = state;
    }

    pub fn last_cursor(&self) -> Option<Cursor> {
        self.cursors.lock().last().copied()
    }

    pub fn last_shape(&self) -> Option<Option<ClipShape>> {
        self.shapes.lock().last().cloned()
    }
}

impl Window for MockWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
    }

    fn state(&self) -> WindowState {
        *self.state.lock()
    }

    fn set_maximized(&self, maximized: bool) {
        self.maximize_calls.lock().push(maximized);
        *self.state.lock() = if maximized {
            WindowState::MAXIMIZED
        } else {
            WindowState::NORMAL
        };
    }

    fn set_maximized_bounds(&self, bounds: Option<Rect>) -> Result<()> {
        if !self.bounds_hint {
            return Err(PlatformError::Unsupported("maximized bounds".into()));
        }
        *self.maximized_bounds.lock() = bounds;
        Ok(())
    }

    fn is_resizable(&self) -> bool {
        self.resizable
    }

    fn minimum_size(&self) -> Option<Size> {
        None
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn current_monitor(&self) -> Option<MonitorInfo> {
        self.monitor.lock().clone()
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.cursors.lock().push(cursor);
    }

    fn set_shape(&self, shape: Option<&ClipShape>) -> Result<()> {
        if !self.shaping {
            return Err(PlatformError::Unsupported("shaping".into()));
        }
        self.shapes.lock().push(shape.cloned());
        Ok(())
    }

    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn begin_move(&self) -> Result<()> {
        if !self.runtime_moves {
            return Err(PlatformError::Unsupported("move".into()));
        }
        self.moves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn begin_resize(&self, direction: ResizeDirection) -> Result<()> {
        if !self.runtime_moves {
            return Err(PlatformError::Unsupported("resize".into()));
        }
        self.resizes.lock().push(direction);
        Ok(())
    }
}

pub fn point(x: f32, y: f32) -> Point {
    Point::new(x, y)
}
