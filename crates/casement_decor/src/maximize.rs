//! Maximized bounds
//!
//! Runtimes disagree about the units of monitor geometry: some report
//! device pixels, some logical pixels, some scale multi-monitor origins by
//! the primary monitor instead of the target monitor. A [`QuirkTable`] maps
//! the running environment to a list of pure [`BoundsCorrection`]s once at
//! startup; the resolver applies them to bring every report into logical,
//! monitor-relative form before subtracting the reserved insets.
//!
//! The table is data. Deployments that hit an environment not covered here
//! override it from config instead of patching code.

use std::hash::{Hash, Hasher};

use casement_core::{Insets, Point, Rect, Size};
use casement_platform::{MonitorInfo, OsFamily, RuntimeEnvironment, Window, WindowId};
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─────────────────────────────────────────────────────────────────────────────
// Quirk Table
// ─────────────────────────────────────────────────────────────────────────────

/// One normalization step applied to raw monitor geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsCorrection {
    /// Origin is in the monitor's device pixels
    DeviceOrigin,
    /// Size is in the monitor's device pixels
    DeviceSize,
    /// Insets are in the monitor's device pixels
    DeviceInsets,
    /// Origin is scaled by the primary monitor's factor
    PrimaryScaledOrigin,
}

impl BoundsCorrection {
    fn apply(self, monitor: &mut LogicalMonitor, raw: &MonitorInfo) {
        let scale = positive(raw.scale_factor) as f32;
        match self {
            BoundsCorrection::DeviceOrigin => {
                monitor.origin = Point::new(raw.origin.x / scale, raw.origin.y / scale);
            }
            BoundsCorrection::DeviceSize => {
                monitor.size = raw.size.scale(1.0 / scale);
            }
            BoundsCorrection::DeviceInsets => {
                monitor.insets = raw.insets.scale(1.0 / scale);
            }
            BoundsCorrection::PrimaryScaledOrigin => {
                let primary = positive(raw.primary_scale_factor) as f32;
                monitor.origin = Point::new(raw.origin.x / primary, raw.origin.y / primary);
            }
        }
    }
}

fn positive(scale: f64) -> f64 {
    if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        1.0
    }
}

/// Environment selector of a quirk rule. Versions are inclusive-exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuirkRule {
    /// `None` matches every OS
    #[serde(default)]
    pub os: Option<QuirkOs>,
    pub runtime: String,
    #[serde(default)]
    pub min_version: Option<[u32; 3]>,
    #[serde(default)]
    pub max_version: Option<[u32; 3]>,
    #[serde(default)]
    pub corrections: SmallVec<[BoundsCorrection; 4]>,
}

/// Serializable mirror of [`OsFamily`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuirkOs {
    Windows,
    Macos,
    Linux,
}

impl QuirkOs {
    fn matches(self, os: OsFamily) -> bool {
        matches!(
            (self, os),
            (QuirkOs::Windows, OsFamily::Windows)
                | (QuirkOs::Macos, OsFamily::MacOs)
                | (QuirkOs::Linux, OsFamily::Linux)
        )
    }
}

impl QuirkRule {
    pub fn new(runtime: impl Into<String>, corrections: &[BoundsCorrection]) -> Self {
        Self {
            os: None,
            runtime: runtime.into(),
            min_version: None,
            max_version: None,
            corrections: SmallVec::from_slice(corrections),
        }
    }

    pub fn on(mut self, os: QuirkOs) -> Self {
        self.os = Some(os);
        self
    }

    pub fn versions(mut self, min: Option<[u32; 3]>, max: Option<[u32; 3]>) -> Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    pub fn matches(&self, env: &RuntimeEnvironment) -> bool {
        let version = env.runtime.version;
        self.runtime == env.runtime.name
            && self.os.map_or(true, |os| os.matches(env.os))
            && self.min_version.map_or(true, |min| version >= min)
            && self.max_version.map_or(true, |max| version < max)
    }
}

/// Ordered quirk rules; the first match wins
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuirkTable {
    rules: Vec<QuirkRule>,
}

impl QuirkTable {
    pub fn new(rules: Vec<QuirkRule>) -> Self {
        Self { rules }
    }

    /// Rules for the runtimes Casement ships back ends for
    ///
    /// winit reports monitor position and size in physical pixels; the
    /// Windows back end reads work-area insets from the OS in device pixels
    /// too. Everything else is assumed logical.
    pub fn builtin() -> Self {
        use BoundsCorrection::*;
        Self::new(vec![
            QuirkRule::new("winit", &[DeviceOrigin, DeviceSize, DeviceInsets])
                .on(QuirkOs::Windows)
                .versions(Some([0, 30, 0]), Some([0, 31, 0])),
            QuirkRule::new("winit", &[DeviceOrigin, DeviceSize]).versions(Some([0, 30, 0]), Some([0, 31, 0])),
        ])
    }

    pub fn rules(&self) -> &[QuirkRule] {
        &self.rules
    }

    /// Corrections for `env`. Empty when no rule matches.
    pub fn resolve(&self, env: &RuntimeEnvironment) -> SmallVec<[BoundsCorrection; 4]> {
        match self.rules.iter().find(|rule| rule.matches(env)) {
            Some(rule) => {
                tracing::debug!(runtime = %env.runtime.name, corrections = ?rule.corrections, "maximized bounds quirks");
                rule.corrections.clone()
            }
            None => SmallVec::new(),
        }
    }
}

impl Default for QuirkTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Monitor geometry in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalMonitor {
    pub origin: Point,
    pub size: Size,
    pub insets: Insets,
}

impl LogicalMonitor {
    pub fn normalize(raw: &MonitorInfo, corrections: &[BoundsCorrection]) -> Self {
        let mut monitor = LogicalMonitor {
            origin: raw.origin,
            size: raw.size,
            insets: raw.insets,
        };
        for correction in corrections {
            correction.apply(&mut monitor, raw);
        }
        monitor
    }

    /// The monitor's area minus reservations, relative to the monitor
    pub fn work_area(&self) -> Rect {
        self.size.to_rect().inset_by(self.insets)
    }
}

/// Where a maximized window goes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaximizedBounds {
    /// Logical bounds relative to the monitor's top-left corner
    pub bounds: Rect,
    /// Logical origin of the monitor in desktop coordinates
    pub monitor_origin: Point,
}

impl MaximizedBounds {
    /// Bounds in logical desktop coordinates
    pub fn to_screen(&self) -> Rect {
        self.bounds.offset(self.monitor_origin.x, self.monitor_origin.y)
    }
}

/// Outcome of one [`MaximizedBoundsResolver::resolve`] call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub bounds: MaximizedBounds,
    /// Bounds differ from the cached value for this window
    pub changed: bool,
    /// Caller should toggle maximize off and on so the window manager picks
    /// the new bounds up
    pub toggle_maximize: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    fingerprint: u64,
    bounds: MaximizedBounds,
}

/// Resolves and caches maximized bounds per window
#[derive(Debug)]
pub struct MaximizedBoundsResolver {
    corrections: SmallVec<[BoundsCorrection; 4]>,
    native_decorations: bool,
    cache: FxHashMap<WindowId, CacheEntry>,
}

impl MaximizedBoundsResolver {
    /// Resolve the quirk table for `env` once
    ///
    /// With native decorations the OS maximizes correctly on its own, so the
    /// resolver never asks for a maximize toggle.
    pub fn new(table: &QuirkTable, env: &RuntimeEnvironment, native_decorations: bool) -> Self {
        Self {
            corrections: table.resolve(env),
            native_decorations,
            cache: FxHashMap::default(),
        }
    }

    pub fn corrections(&self) -> &[BoundsCorrection] {
        &self.corrections
    }

    pub fn resolve(&mut self, window: &dyn Window) -> Resolution {
        let (fingerprint, bounds) = match window.current_monitor() {
            Some(raw) => {
                let monitor = LogicalMonitor::normalize(&raw, &self.corrections);
                let bounds = MaximizedBounds {
                    bounds: monitor.work_area(),
                    monitor_origin: monitor.origin,
                };
                (monitor_fingerprint(&raw), bounds)
            }
            None => {
                let size = window.screen_size().unwrap_or_else(|| window.bounds().size);
                tracing::debug!(?size, "no monitor metadata, maximizing to screen size");
                let bounds = MaximizedBounds {
                    bounds: size.to_rect(),
                    monitor_origin: Point::ZERO,
                };
                (size_fingerprint(size), bounds)
            }
        };

        let id = window.id();
        if let Some(entry) = self.cache.get(&id) {
            if entry.fingerprint == fingerprint && entry.bounds == bounds {
                return Resolution {
                    bounds: entry.bounds,
                    changed: false,
                    toggle_maximize: false,
                };
            }
        }

        self.cache.insert(id, CacheEntry { fingerprint, bounds });
        Resolution {
            bounds,
            changed: true,
            toggle_maximize: !self.native_decorations,
        }
    }

    /// Cached bounds for a window, if resolved before
    pub fn cached(&self, id: WindowId) -> Option<MaximizedBounds> {
        self.cache.get(&id).map(|entry| entry.bounds)
    }

    /// Drop one window's entry (window closed)
    pub fn forget(&mut self, id: WindowId) {
        self.cache.remove(&id);
    }

    /// Monitor configuration changed
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }
}

fn monitor_fingerprint(raw: &MonitorInfo) -> u64 {
    let mut hasher = FxHasher::default();
    raw.name.hash(&mut hasher);
    for v in [
        raw.origin.x,
        raw.origin.y,
        raw.size.width,
        raw.size.height,
        raw.insets.top,
        raw.insets.left,
        raw.insets.bottom,
        raw.insets.right,
    ] {
        v.to_bits().hash(&mut hasher);
    }
    raw.scale_factor.to_bits().hash(&mut hasher);
    raw.primary_scale_factor.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn size_fingerprint(size: Size) -> u64 {
    let mut hasher = FxHasher::default();
    size.width.to_bits().hash(&mut hasher);
    size.height.to_bits().hash(&mut hasher);
    hasher.finish()
}
