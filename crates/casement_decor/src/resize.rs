//! Overlay resize handles and the drag-resize state machine
//!
//! Used when no native hook drives resizing. Eight handles line the window
//! edge: four edge strips that stop short of the corners and four L-shaped
//! corner handles filling the corner zones. All coordinates here are logical
//! pixels; handle geometry is window-local, drag math is in screen space.

use casement_core::{Point, Rect, Size};
use casement_platform::{Cursor, ResizeDirection, Window, WindowState};
use smallvec::SmallVec;

/// Fallback minimum window size when the window's own minimum is not honored
pub const FALLBACK_MINIMUM_SIZE: Size = Size::new(150.0, 50.0);

/// Thickness of the edge strips and length of the corner zones
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleMetrics {
    pub thickness: f32,
    pub corner_width: f32,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            thickness: 5.0,
            corner_width: 16.0,
        }
    }
}

/// Which minimum size a drag is clamped to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimumSizePolicy {
    /// Use the window's own minimum size when it has one
    pub honor_window_minimum: bool,
    pub fallback: Size,
}

impl Default for MinimumSizePolicy {
    fn default() -> Self {
        Self {
            honor_window_minimum: false,
            fallback: FALLBACK_MINIMUM_SIZE,
        }
    }
}

impl MinimumSizePolicy {
    pub fn effective(&self, window: &dyn Window) -> Size {
        let own = window
            .minimum_size()
            .filter(|size| self.honor_window_minimum && size.width > 0.0 && size.height > 0.0);
        own.unwrap_or(self.fallback)
    }
}

/// Whether the handle for `direction` should be shown
pub fn is_handle_visible(direction: ResizeDirection, resizable: bool, state: WindowState) -> bool {
    if !resizable || state.fullscreen {
        return false;
    }
    let vertical = direction.moves_top() || direction.moves_bottom();
    let horizontal = direction.moves_left() || direction.moves_right();
    !(vertical && state.maximized_vertical) && !(horizontal && state.maximized_horizontal)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// One edge or corner handle
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeHandle {
    direction: ResizeDirection,
    /// One rect for edges, two arms for corners
    parts: SmallVec<[Rect; 2]>,
    visible: bool,
}

impl ResizeHandle {
    pub fn direction(&self) -> ResizeDirection {
        self.direction
    }

    pub fn parts(&self) -> &[Rect] {
        &self.parts
    }

    pub fn cursor(&self) -> Cursor {
        self.direction.cursor()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn contains(&self, point: Point) -> bool {
        self.parts.iter().any(|part| part.contains(point))
    }
}

/// The eight handles of one window
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeHandles {
    size: Size,
    thickness: f32,
    corner: f32,
    handles: SmallVec<[ResizeHandle; 8]>,
}

impl ResizeHandles {
    /// Lay out handles for a window of `size`
    ///
    /// Corner zones never exceed half the window's smaller dimension, and
    /// the strip thickness never exceeds the corner zone.
    pub fn layout(size: Size, metrics: HandleMetrics) -> Self {
        let half = (size.min_dimension() / 2.0).max(0.0);
        let c = metrics.corner_width.min(half).max(0.0);
        let t = metrics.thickness.min(c).max(0.0);
        let (w, h) = (size.width, size.height);

        let edge = |direction, rect| ResizeHandle {
            direction,
            parts: SmallVec::from_slice(&[rect]),
            visible: true,
        };
        let corner = |direction, horizontal_arm, vertical_arm| ResizeHandle {
            direction,
            parts: SmallVec::from_slice(&[horizontal_arm, vertical_arm]),
            visible: true,
        };

        let mut handles = SmallVec::new();
        handles.push(edge(ResizeDirection::North, Rect::new(c, 0.0, w - 2.0 * c, t)));
        handles.push(edge(ResizeDirection::South, Rect::new(c, h - t, w - 2.0 * c, t)));
        handles.push(edge(ResizeDirection::East, Rect::new(w - t, c, t, h - 2.0 * c)));
        handles.push(edge(ResizeDirection::West, Rect::new(0.0, c, t, h - 2.0 * c)));
        handles.push(corner(
            ResizeDirection::NorthEast,
            Rect::new(w - c, 0.0, c, t),
            Rect::new(w - t, 0.0, t, c),
        ));
        handles.push(corner(
            ResizeDirection::NorthWest,
            Rect::new(0.0, 0.0, c, t),
            Rect::new(0.0, 0.0, t, c),
        ));
        handles.push(corner(
            ResizeDirection::SouthEast,
            Rect::new(w - c, h - t, c, t),
            Rect::new(w - t, h - c, t, c),
        ));
        handles.push(corner(
            ResizeDirection::SouthWest,
            Rect::new(0.0, h - t, c, t),
            Rect::new(0.0, h - c, t, c),
        ));

        Self {
            size,
            thickness: t,
            corner: c,
            handles,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn corner_zone(&self) -> f32 {
        self.corner
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResizeHandle> {
        self.handles.iter()
    }

    pub fn handle(&self, direction: ResizeDirection) -> Option<&ResizeHandle> {
        self.handles.iter().find(|h| h.direction == direction)
    }

    pub fn update_visibility(&mut self, resizable: bool, state: WindowState) {
        for handle in &mut self.handles {
            handle.visible = is_handle_visible(handle.direction, resizable, state);
        }
    }

    fn is_visible(&self, direction: ResizeDirection) -> bool {
        self.handle(direction).is_some_and(|h| h.visible)
    }

    /// Direction of the visible handle under a window-local point
    ///
    /// Resolved from the position along the border, so a pointer within a
    /// corner zone of an edge strip reports the corner. When that corner is
    /// hidden the edge it lies on is used instead.
    pub fn direction_at(&self, point: Point) -> Option<ResizeDirection> {
        let (w, h, t, c) = (self.size.width, self.size.height, self.thickness, self.corner);
        if !self.size.to_rect().contains(point) || t <= 0.0 {
            return None;
        }

        let top = point.y < t;
        let bottom = point.y >= h - t;
        let left = point.x < t;
        let right = point.x >= w - t;
        if !(top || bottom || left || right) {
            return None;
        }

        let side = left || right;
        let cap = top || bottom;
        let north = top || (side && point.y < c);
        let south = !north && (bottom || (side && point.y >= h - c));
        let west = left || (cap && point.x < c);
        let east = !west && (right || (cap && point.x >= w - c));

        let vertical = if north {
            Some(ResizeDirection::North)
        } else if south {
            Some(ResizeDirection::South)
        } else {
            None
        };
        let horizontal = if west {
            Some(ResizeDirection::West)
        } else if east {
            Some(ResizeDirection::East)
        } else {
            None
        };

        let candidates: SmallVec<[ResizeDirection; 3]> = match (vertical, horizontal) {
            (Some(v), Some(hz)) => {
                let corner = combine(v, hz);
                // fall back to the strip the pointer is physically on
                let strip = if side { hz } else { v };
                SmallVec::from_slice(&[corner, strip])
            }
            (Some(v), None) => SmallVec::from_slice(&[v]),
            (None, Some(hz)) => SmallVec::from_slice(&[hz]),
            (None, None) => SmallVec::new(),
        };

        candidates.into_iter().find(|d| self.is_visible(*d))
    }
}

fn combine(vertical: ResizeDirection, horizontal: ResizeDirection) -> ResizeDirection {
    match (vertical, horizontal) {
        (ResizeDirection::North, ResizeDirection::East) => ResizeDirection::NorthEast,
        (ResizeDirection::North, _) => ResizeDirection::NorthWest,
        (_, ResizeDirection::East) => ResizeDirection::SouthEast,
        _ => ResizeDirection::SouthWest,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drag State Machine
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer-to-edge distances captured at press time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeOffsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeOffsets {
    fn measure(pointer: Point, bounds: Rect) -> Self {
        Self {
            left: pointer.x - bounds.left(),
            top: pointer.y - bounds.top(),
            right: pointer.x - bounds.right(),
            bottom: pointer.y - bounds.bottom(),
        }
    }
}

/// One press-drag-release gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub direction: ResizeDirection,
    pub offsets: EdgeOffsets,
    pub min_size: Size,
}

impl DragSession {
    /// Bounds for `pointer`, starting from the window's live bounds
    ///
    /// Edges the handle does not control stay where they are. A moving edge
    /// that would shrink the window below its minimum is pinned at the
    /// opposite edge plus the minimum.
    pub fn target_bounds(&self, live: Rect, pointer: Point) -> Rect {
        let d = self.direction;
        let mut left = live.left();
        let mut top = live.top();
        let mut right = live.right();
        let mut bottom = live.bottom();

        if d.moves_left() {
            left = pointer.x - self.offsets.left;
        }
        if d.moves_right() {
            right = pointer.x - self.offsets.right;
        }
        if d.moves_top() {
            top = pointer.y - self.offsets.top;
        }
        if d.moves_bottom() {
            bottom = pointer.y - self.offsets.bottom;
        }

        // only axes this handle moves are clamped
        if right - left < self.min_size.width {
            if d.moves_left() {
                left = right - self.min_size.width;
            } else if d.moves_right() {
                right = left + self.min_size.width;
            }
        }
        if bottom - top < self.min_size.height {
            if d.moves_top() {
                top = bottom - self.min_size.height;
            } else if d.moves_bottom() {
                bottom = top + self.min_size.height;
            }
        }

        Rect::from_edges(left, top, right, bottom)
    }
}

/// `Idle → Pressed → Dragging → Idle`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Pressed(DragSession),
    Dragging(DragSession),
}

impl DragState {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Pressed(session) | DragState::Dragging(session) => Some(session),
        }
    }
}

/// Resize gesture notifications for callers that defer relayout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeLifecycle {
    Started(ResizeDirection),
    Ended(ResizeDirection),
}

/// Overlay resizing for one window
#[derive(Debug)]
pub struct DragResizeEngine {
    metrics: HandleMetrics,
    min_size: MinimumSizePolicy,
    handles: ResizeHandles,
    state: DragState,
}

impl DragResizeEngine {
    pub fn new(metrics: HandleMetrics, min_size: MinimumSizePolicy) -> Self {
        Self {
            metrics,
            min_size,
            handles: ResizeHandles::layout(Size::ZERO, metrics),
            state: DragState::Idle,
        }
    }

    /// Re-lay out handles after a resize, DPI or state change
    pub fn layout(&mut self, size: Size, resizable: bool, state: WindowState) {
        self.handles = ResizeHandles::layout(size, self.metrics);
        self.handles.update_visibility(resizable, state);
    }

    pub fn handles(&self) -> &ResizeHandles {
        &self.handles
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Cursor for a hovered window-local point, `None` off the handles
    pub fn cursor_at(&self, local: Point) -> Option<Cursor> {
        if let Some(session) = self.state.session() {
            return Some(session.direction.cursor());
        }
        self.handles.direction_at(local).map(|d| d.cursor())
    }

    /// Button down at a screen-space pointer. Starts a session when the
    /// pointer is over a visible handle.
    pub fn press(&mut self, window: &dyn Window, pointer: Point) -> Option<ResizeLifecycle> {
        if self.is_active() || !window.is_resizable() {
            return None;
        }

        let bounds = window.bounds();
        let local = Point::new(pointer.x - bounds.x(), pointer.y - bounds.y());
        let direction = self.handles.direction_at(local)?;

        self.state = DragState::Pressed(DragSession {
            direction,
            offsets: EdgeOffsets::measure(pointer, bounds),
            min_size: self.min_size.effective(window),
        });
        tracing::trace!(?direction, "resize drag pressed");
        Some(ResizeLifecycle::Started(direction))
    }

    /// Pointer moved while pressed. Returns the bounds applied, if any.
    pub fn drag(&mut self, window: &dyn Window, pointer: Point) -> Option<Rect> {
        let session = *self.state.session()?;
        self.state = DragState::Dragging(session);

        if !window.is_resizable() {
            return None;
        }

        // re-read: the window manager may have moved edges mid-gesture
        let live = window.bounds();
        let next = session.target_bounds(live, pointer);
        if next == live {
            return None;
        }

        window.set_bounds(next);
        self.layout(next.size, true, window.state());
        Some(next)
    }

    /// Button up. Ends any session.
    pub fn release(&mut self) -> Option<ResizeLifecycle> {
        let session = *self.state.session()?;
        self.state = DragState::Idle;
        tracing::trace!(direction = ?session.direction, "resize drag released");
        Some(ResizeLifecycle::Ended(session.direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casement_platform::{MonitorInfo, WindowId};
    use parking_lot::Mutex;

    struct TestWindow {
        bounds: Mutex<Rect>,
        min: Option<Size>,
        resizable: bool,
    }

    impl TestWindow {
        fn new(bounds: Rect) -> Self {
            Self {
                bounds: Mutex::new(bounds),
                min: None,
                resizable: true,
            }
        }
    }

    impl Window for TestWindow {
        fn id(&self) -> WindowId {
            WindowId(1)
        }
        fn bounds(&self) -> Rect {
            *self.bounds.lock()
        }
        fn set_bounds(&self, bounds: Rect) {
            *self.bounds.lock() = bounds;
        }
        fn state(&self) -> WindowState {
            WindowState::NORMAL
        }
        fn set_maximized(&self, _maximized: bool) {}
        fn is_resizable(&self) -> bool {
            self.resizable
        }
        fn minimum_size(&self) -> Option<Size> {
            self.min
        }
        fn scale_factor(&self) -> f64 {
            1.0
        }
        fn current_monitor(&self) -> Option<MonitorInfo> {
            None
        }
        fn set_cursor(&self, _cursor: Cursor) {}
        fn request_redraw(&self) {}
    }

    fn engine_for(window: &TestWindow) -> DragResizeEngine {
        let mut engine = DragResizeEngine::new(HandleMetrics::default(), MinimumSizePolicy::default());
        engine.layout(window.bounds().size, true, WindowState::NORMAL);
        engine
    }

    #[test]
    fn test_layout_edges_stop_at_corner_zones() {
        let handles = ResizeHandles::layout(Size::new(800.0, 600.0), HandleMetrics::default());

        let north = handles.handle(ResizeDirection::North).expect("north handle");
        assert_eq!(north.parts(), &[Rect::new(16.0, 0.0, 768.0, 5.0)]);

        let se = handles.handle(ResizeDirection::SouthEast).expect("se handle");
        assert_eq!(
            se.parts(),
            &[Rect::new(784.0, 595.0, 16.0, 5.0), Rect::new(795.0, 584.0, 5.0, 16.0)]
        );
        assert_eq!(handles.iter().count(), 8);
    }

    #[test]
    fn test_corner_zone_clamped_to_half_min_dimension() {
        let handles = ResizeHandles::layout(Size::new(20.0, 10.0), HandleMetrics::default());
        assert_eq!(handles.corner_zone(), 5.0);

        let tiny = ResizeHandles::layout(Size::new(4.0, 4.0), HandleMetrics::default());
        assert_eq!(tiny.corner_zone(), 2.0);
    }

    #[test]
    fn test_direction_matches_handle_geometry() {
        let handles = ResizeHandles::layout(Size::new(800.0, 600.0), HandleMetrics::default());

        for y in (0..600).step_by(3) {
            for x in (0..800).step_by(3) {
                let p = Point::new(x as f32, y as f32);
                let owners: Vec<_> = handles
                    .iter()
                    .filter(|h| h.contains(p))
                    .map(|h| h.direction())
                    .collect();
                let expected = owners.first().copied();
                assert!(owners.len() <= 1, "overlapping handles at {p:?}");
                assert_eq!(handles.direction_at(p), expected, "at {p:?}");
            }
        }
    }

    #[test]
    fn test_corner_precedence_on_edge_strip() {
        let handles = ResizeHandles::layout(Size::new(800.0, 600.0), HandleMetrics::default());

        assert_eq!(handles.direction_at(Point::new(10.0, 1.0)), Some(ResizeDirection::NorthWest));
        assert_eq!(handles.direction_at(Point::new(400.0, 1.0)), Some(ResizeDirection::North));
        assert_eq!(handles.direction_at(Point::new(798.0, 590.0)), Some(ResizeDirection::SouthEast));
        assert_eq!(handles.direction_at(Point::new(798.0, 300.0)), Some(ResizeDirection::East));
        assert_eq!(handles.direction_at(Point::new(400.0, 300.0)), None);
    }

    #[test]
    fn test_visibility_policy() {
        let mut handles = ResizeHandles::layout(Size::new(800.0, 600.0), HandleMetrics::default());

        handles.update_visibility(false, WindowState::NORMAL);
        assert!(handles.iter().all(|h| !h.is_visible()));

        handles.update_visibility(true, WindowState::FULLSCREEN);
        assert!(handles.iter().all(|h| !h.is_visible()));

        let vertical = WindowState {
            maximized_vertical: true,
            ..WindowState::NORMAL
        };
        handles.update_visibility(true, vertical);
        let visible: Vec<_> = handles
            .iter()
            .filter(|h| h.is_visible())
            .map(|h| h.direction())
            .collect();
        assert_eq!(visible, vec![ResizeDirection::East, ResizeDirection::West]);

        // corner zone on the east strip falls back to the strip
        assert_eq!(handles.direction_at(Point::new(798.0, 5.0)), Some(ResizeDirection::East));
        assert_eq!(handles.direction_at(Point::new(400.0, 1.0)), None);
    }

    #[test]
    fn test_se_drag_clamps_to_minimum() {
        let window = TestWindow::new(Rect::new(100.0, 100.0, 200.0, 100.0));
        let mut engine = engine_for(&window);

        let started = engine.press(&window, Point::new(299.0, 199.0));
        assert_eq!(started, Some(ResizeLifecycle::Started(ResizeDirection::SouthEast)));

        // naive result would be 100x30
        let applied = engine.drag(&window, Point::new(199.0, 129.0));
        assert_eq!(applied, Some(Rect::new(100.0, 100.0, 150.0, 50.0)));
        assert_eq!(window.bounds(), Rect::new(100.0, 100.0, 150.0, 50.0));

        // same pointer again: no oscillation, nothing re-applied
        assert_eq!(engine.drag(&window, Point::new(199.0, 129.0)), None);
        assert_eq!(window.bounds(), Rect::new(100.0, 100.0, 150.0, 50.0));

        assert_eq!(engine.release(), Some(ResizeLifecycle::Ended(ResizeDirection::SouthEast)));
        assert_eq!(*engine.state(), DragState::Idle);
    }

    #[test]
    fn test_nw_drag_pins_moving_edges() {
        let window = TestWindow::new(Rect::new(100.0, 100.0, 200.0, 100.0));
        let mut engine = engine_for(&window);

        engine.press(&window, Point::new(101.0, 101.0));
        engine.drag(&window, Point::new(260.0, 190.0));

        // right/bottom stay at 300/200, left/top pinned at min distance
        assert_eq!(window.bounds(), Rect::new(150.0, 150.0, 150.0, 50.0));
    }

    #[test]
    fn test_drag_rereads_live_bounds() {
        let window = TestWindow::new(Rect::new(100.0, 100.0, 200.0, 100.0));
        let mut engine = engine_for(&window);

        engine.press(&window, Point::new(299.0, 150.0));
        assert_eq!(engine.handles().direction_at(Point::new(199.0, 50.0)), Some(ResizeDirection::East));

        // window manager snaps the window elsewhere mid-gesture
        window.set_bounds(Rect::new(0.0, 0.0, 200.0, 100.0));
        engine.drag(&window, Point::new(349.0, 150.0));

        // left edge kept from the live bounds, right edge follows the pointer
        assert_eq!(window.bounds(), Rect::new(0.0, 0.0, 350.0, 100.0));
    }

    #[test]
    fn test_edge_drag_leaves_other_axis_alone() {
        let window = TestWindow::new(Rect::new(100.0, 100.0, 200.0, 100.0));
        let mut engine = engine_for(&window);

        engine.press(&window, Point::new(299.0, 150.0));

        // window manager shrinks the height below the minimum mid-gesture
        window.set_bounds(Rect::new(100.0, 100.0, 200.0, 30.0));
        engine.drag(&window, Point::new(349.0, 110.0));

        // east only moves the right edge; the bottom edge stays at 130
        assert_eq!(window.bounds(), Rect::new(100.0, 100.0, 250.0, 30.0));
    }

    #[test]
    fn test_honors_window_minimum_when_enabled() {
        let mut window = TestWindow::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        window.min = Some(Size::new(300.0, 200.0));

        let policy = MinimumSizePolicy {
            honor_window_minimum: true,
            ..MinimumSizePolicy::default()
        };
        assert_eq!(policy.effective(&window), Size::new(300.0, 200.0));
        assert_eq!(MinimumSizePolicy::default().effective(&window), FALLBACK_MINIMUM_SIZE);
    }

    #[test]
    fn test_press_ignored_when_not_resizable() {
        let mut window = TestWindow::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        window.resizable = false;
        let mut engine = engine_for(&window);

        assert_eq!(engine.press(&window, Point::new(399.0, 299.0)), None);
        assert_eq!(engine.release(), None);
    }
}
