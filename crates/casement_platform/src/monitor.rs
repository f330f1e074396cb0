//! Monitors, scale transforms and the runtime environment
//!
//! Back ends report monitor geometry exactly as their windowing runtime
//! hands it over. Whether those numbers are device or logical pixels differs
//! between runtimes, so `MonitorInfo` makes no promise about units. The
//! decoration layer normalizes them with its quirk table.

use casement_core::{DevicePoint, Insets, Point, Size};

/// Monitor geometry as reported by the windowing runtime
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorInfo {
    /// Runtime-provided monitor name, if any
    pub name: Option<String>,
    /// Top-left corner of the monitor in desktop coordinates
    pub origin: Point,
    /// Full monitor size
    pub size: Size,
    /// Task bar / dock reservations
    pub insets: Insets,
    /// Scale factor of this monitor
    pub scale_factor: f64,
    /// Scale factor of the primary monitor
    pub primary_scale_factor: f64,
}

impl MonitorInfo {
    pub fn new(origin: Point, size: Size, scale_factor: f64) -> Self {
        Self {
            name: None,
            origin,
            size,
            insets: Insets::ZERO,
            scale_factor,
            primary_scale_factor: scale_factor,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn with_primary_scale_factor(mut self, scale_factor: f64) -> Self {
        self.primary_scale_factor = scale_factor;
        self
    }

    /// Per-axis transform for this monitor
    pub fn transform(&self) -> ScaleTransform {
        ScaleTransform::uniform(self.scale_factor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scale Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Device ↔ logical pixel transform of one monitor
///
/// Scaling down rounds with `ceil(v / scale - 0.5)` which matches how the
/// toolkit rounds its own layout, so a device pixel on a component edge maps
/// to the same logical pixel the component was laid out at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScaleTransform {
    pub const IDENTITY: ScaleTransform = ScaleTransform {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub const fn new(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y }
    }

    pub const fn uniform(scale: f64) -> Self {
        Self::new(scale, scale)
    }

    pub fn is_identity(&self) -> bool {
        self.scale_x == 1.0 && self.scale_y == 1.0
    }

    /// Device pixels → logical pixels
    pub fn to_logical(&self, point: DevicePoint) -> Point {
        if self.is_identity() {
            return Point::new(point.x as f32, point.y as f32);
        }
        Point::new(
            clip_round(point.x as f64 / self.scale_x),
            clip_round(point.y as f64 / self.scale_y),
        )
    }

    /// Logical pixels → device pixels
    pub fn to_device(&self, point: Point) -> DevicePoint {
        DevicePoint::new(
            (point.x as f64 * self.scale_x).round() as i32,
            (point.y as f64 * self.scale_y).round() as i32,
        )
    }
}

impl Default for ScaleTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clip_round(value: f64) -> f32 {
    (value - 0.5).ceil() as f32
}

// ─────────────────────────────────────────────────────────────────────────────
// Environment
// ─────────────────────────────────────────────────────────────────────────────

/// Operating system family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl OsFamily {
    /// The OS this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else if cfg!(target_os = "linux") {
            OsFamily::Linux
        } else {
            OsFamily::Other
        }
    }
}

/// Windowing runtime name and version, e.g. `winit 0.30.5`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuntimeVersion {
    pub name: String,
    pub version: [u32; 3],
}

impl RuntimeVersion {
    pub fn new(name: impl Into<String>, version: [u32; 3]) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Everything the decoration layer keys environment-specific behavior on
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuntimeEnvironment {
    pub os: OsFamily,
    pub runtime: RuntimeVersion,
}

impl RuntimeEnvironment {
    pub fn new(os: OsFamily, runtime: RuntimeVersion) -> Self {
        Self { os, runtime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_logical_rounds_half_down() {
        let t = ScaleTransform::uniform(1.5);

        // 15 / 1.5 = 10.0 exactly
        assert_eq!(t.to_logical(DevicePoint::new(15, 15)), Point::new(10.0, 10.0));
        // 16 / 1.5 = 10.67 -> 11
        assert_eq!(t.to_logical(DevicePoint::new(16, 0)).x, 11.0);
        // 3 / 2 = 1.5 -> ceil(1.0) = 1
        assert_eq!(ScaleTransform::uniform(2.0).to_logical(DevicePoint::new(3, 0)).x, 1.0);
    }

    #[test]
    fn test_per_axis_transform() {
        let t = ScaleTransform::new(2.0, 1.0);
        assert_eq!(t.to_logical(DevicePoint::new(100, 100)), Point::new(50.0, 100.0));
        assert_eq!(t.to_device(Point::new(50.0, 100.0)), DevicePoint::new(100, 100));
    }

    #[test]
    fn test_identity_passthrough() {
        let t = ScaleTransform::default();
        assert!(t.is_identity());
        assert_eq!(t.to_logical(DevicePoint::new(-7, 3)), Point::new(-7.0, 3.0));
    }
}
