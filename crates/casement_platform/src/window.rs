//! Window contract implemented by every platform back end

use casement_core::{ClipShape, Rect, Size};
use raw_window_handle::RawWindowHandle;

use crate::error::{PlatformError, Result};
use crate::monitor::MonitorInfo;

/// Opaque, stable identity of a native window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Maximize / fullscreen / minimize state of a window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowState {
    pub maximized_horizontal: bool,
    pub maximized_vertical: bool,
    pub fullscreen: bool,
    pub minimized: bool,
}

impl WindowState {
    pub const NORMAL: WindowState = WindowState {
        maximized_horizontal: false,
        maximized_vertical: false,
        fullscreen: false,
        minimized: false,
    };

    pub const MAXIMIZED: WindowState = WindowState {
        maximized_horizontal: true,
        maximized_vertical: true,
        fullscreen: false,
        minimized: false,
    };

    pub const FULLSCREEN: WindowState = WindowState {
        maximized_horizontal: false,
        maximized_vertical: false,
        fullscreen: true,
        minimized: false,
    };

    pub fn is_maximized_both(&self) -> bool {
        self.maximized_horizontal && self.maximized_vertical
    }

    pub fn is_maximized_any(&self) -> bool {
        self.maximized_horizontal || self.maximized_vertical
    }
}

/// Edge or corner being dragged to resize a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::North,
        ResizeDirection::South,
        ResizeDirection::East,
        ResizeDirection::West,
        ResizeDirection::NorthEast,
        ResizeDirection::NorthWest,
        ResizeDirection::SouthEast,
        ResizeDirection::SouthWest,
    ];

    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            ResizeDirection::North | ResizeDirection::NorthEast | ResizeDirection::NorthWest
        )
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            ResizeDirection::South | ResizeDirection::SouthEast | ResizeDirection::SouthWest
        )
    }

    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            ResizeDirection::West | ResizeDirection::NorthWest | ResizeDirection::SouthWest
        )
    }

    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            ResizeDirection::East | ResizeDirection::NorthEast | ResizeDirection::SouthEast
        )
    }

    pub fn is_corner(&self) -> bool {
        (self.moves_top() || self.moves_bottom()) && (self.moves_left() || self.moves_right())
    }

    /// Cursor shown while hovering or dragging this handle
    pub fn cursor(&self) -> Cursor {
        match self {
            ResizeDirection::North | ResizeDirection::South => Cursor::ResizeNS,
            ResizeDirection::East | ResizeDirection::West => Cursor::ResizeEW,
            ResizeDirection::NorthEast | ResizeDirection::SouthWest => Cursor::ResizeNESW,
            ResizeDirection::NorthWest | ResizeDirection::SouthEast => Cursor::ResizeNWSE,
        }
    }
}

/// Mouse cursor types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Move,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
}

/// Window creation configuration
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub min_size: Option<Size>,
    pub resizable: bool,
    /// Native decorations. Custom-decorated windows set this to `false`.
    pub decorations: bool,
    pub transparent: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Casement".to_string(),
            width: 800.0,
            height: 600.0,
            min_size: None,
            resizable: true,
            decorations: false,
            transparent: false,
            fullscreen: false,
        }
    }
}

/// A top-level window the decoration layer can drive
///
/// Bounds are outer bounds in logical screen coordinates. Every method takes
/// `&self`; back ends use interior mutability the same way native window
/// handles do.
pub trait Window: Send + Sync {
    fn id(&self) -> WindowId;

    /// Native handle for back ends that hook window messages
    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        None
    }

    /// Live outer bounds. Never cached by callers across events.
    fn bounds(&self) -> Rect;

    fn set_bounds(&self, bounds: Rect);

    fn state(&self) -> WindowState;

    fn set_maximized(&self, maximized: bool);

    /// Bounds the window manager should use when maximizing, in logical
    /// screen coordinates. `None` restores the window manager's default.
    ///
    /// Back ends without such a hint return `Unsupported`.
    fn set_maximized_bounds(&self, _bounds: Option<Rect>) -> Result<()> {
        Err(PlatformError::Unsupported("maximized bounds hint".to_string()))
    }

    fn is_resizable(&self) -> bool;

    /// Minimum size requested by the application, if any
    fn minimum_size(&self) -> Option<Size>;

    fn scale_factor(&self) -> f64;

    /// Monitor the window is (mostly) on
    fn current_monitor(&self) -> Option<MonitorInfo>;

    /// Logical size of the whole screen, used when monitor metadata is missing
    fn screen_size(&self) -> Option<Size> {
        None
    }

    fn set_cursor(&self, cursor: Cursor);

    /// Clip the window to `shape`, given in device pixels relative to the
    /// window's top-left corner. `None` removes any clip.
    fn set_shape(&self, _shape: Option<&ClipShape>) -> Result<()> {
        Err(PlatformError::Unsupported("window shaping".to_string()))
    }

    fn request_redraw(&self);

    /// Hand an interactive move over to the window manager
    fn begin_move(&self) -> Result<()> {
        Err(PlatformError::Unsupported("interactive move".to_string()))
    }

    /// Hand an interactive resize over to the window manager
    fn begin_resize(&self, _direction: ResizeDirection) -> Result<()> {
        Err(PlatformError::Unsupported("interactive resize".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_edges() {
        assert!(ResizeDirection::SouthEast.moves_bottom());
        assert!(ResizeDirection::SouthEast.moves_right());
        assert!(!ResizeDirection::SouthEast.moves_left());
        assert!(ResizeDirection::SouthEast.is_corner());
        assert!(!ResizeDirection::North.is_corner());

        let corners = ResizeDirection::ALL.iter().filter(|d| d.is_corner()).count();
        assert_eq!(corners, 4);
    }

    #[test]
    fn test_direction_cursor() {
        assert_eq!(ResizeDirection::North.cursor(), Cursor::ResizeNS);
        assert_eq!(ResizeDirection::West.cursor(), Cursor::ResizeEW);
        assert_eq!(ResizeDirection::SouthWest.cursor(), Cursor::ResizeNESW);
        assert_eq!(ResizeDirection::NorthWest.cursor(), Cursor::ResizeNWSE);
    }

    #[test]
    fn test_window_state() {
        assert!(WindowState::MAXIMIZED.is_maximized_both());
        let vertical = WindowState {
            maximized_vertical: true,
            ..WindowState::NORMAL
        };
        assert!(!vertical.is_maximized_both());
        assert!(vertical.is_maximized_any());
    }
}
