//! Casement Core
//!
//! Plain value types shared by every Casement crate:
//!
//! - **Geometry**: logical `Point`/`Size`/`Rect`/`Insets` and device-pixel `DevicePoint`
//! - **Colors**: `Color` with hex parsing for configuration files
//! - **Shapes**: `CornerRadius` and `ClipShape` for window shaping

pub mod color;
pub mod geometry;

pub use color::Color;
pub use geometry::{ClipShape, CornerRadius, DevicePoint, Insets, Point, Rect, Size};
