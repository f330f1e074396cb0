//! Window shape and border painting
//!
//! A restored custom-decorated window is clipped to a rounded rectangle and
//! gets a thin border painted along its edge: four straight strips plus four
//! corner tiles. The corner arc is rasterized once per scale factor for the
//! top-left corner; the other three tiles are rotations of it.
//!
//! Clip geometry is in device pixels relative to the window's top-left corner.

use std::sync::Arc;

use casement_core::{ClipShape, Color, CornerRadius, Point, Rect, Size};
use casement_platform::{Window, WindowState};

/// Amount the clip radius is shrunk so the anti-aliased border edge stays
/// outside the hard clip
pub const SHAPE_EPSILON: f32 = 1.0;

/// Clip state of a window
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WindowClip {
    #[default]
    NoClip,
    Shaped(ClipShape),
}

impl WindowClip {
    pub fn is_clipped(&self) -> bool {
        matches!(self, WindowClip::Shaped(_))
    }

    pub fn shape(&self) -> Option<&ClipShape> {
        match self {
            WindowClip::NoClip => None,
            WindowClip::Shaped(shape) => Some(shape),
        }
    }
}

/// Whether a window in `state` keeps square, unclipped edges
pub fn is_unshaped_state(state: WindowState) -> bool {
    state.is_maximized_both() || state.fullscreen
}

/// Clip for a window of logical `size` on a monitor with `scale`
pub fn compute_clip(size: Size, state: WindowState, scale: f64, corner_radius: f32) -> WindowClip {
    if is_unshaped_state(state) {
        return WindowClip::NoClip;
    }

    let scale = scale as f32;
    let rect = Rect::new(
        0.0,
        0.0,
        (size.width * scale).round(),
        (size.height * scale).round(),
    );
    let radius = corner_radius * scale - SHAPE_EPSILON;
    if radius <= 0.0 {
        return WindowClip::Shaped(ClipShape::Rect(rect));
    }

    WindowClip::Shaped(ClipShape::RoundedRect {
        rect,
        corner_radius: CornerRadius::uniform(radius),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Corner Mask
// ─────────────────────────────────────────────────────────────────────────────

const SUPERSAMPLE: u32 = 4;

/// Clockwise rotation of a corner tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R0,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R180,
            Rotation::R270 => Rotation::R90,
        }
    }
}

/// Window corner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Rotation that turns the top-left tile into this corner's tile
    pub fn rotation(self) -> Rotation {
        match self {
            Corner::TopLeft => Rotation::R0,
            Corner::TopRight => Rotation::R90,
            Corner::BottomRight => Rotation::R180,
            Corner::BottomLeft => Rotation::R270,
        }
    }
}

/// Square coverage mask (0..=255) of one border corner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CornerMask {
    size: u32,
    coverage: Vec<u8>,
}

impl CornerMask {
    /// Rasterize the top-left corner of a rounded border ring
    ///
    /// The ring is the outer rounded rectangle (radius `radius`) minus the
    /// same rectangle inset by `line_width`, cut to a `size` square.
    pub fn rasterize(radius: f32, line_width: f32, size: u32) -> Self {
        let r = radius.max(0.0);
        let lw = line_width.max(0.0);
        let inner_r = (r - lw).max(0.0);
        let samples = SUPERSAMPLE * SUPERSAMPLE;

        let in_outer = |x: f32, y: f32| {
            if x < r && y < r {
                (x - r).hypot(y - r) <= r
            } else {
                x >= 0.0 && y >= 0.0
            }
        };
        let in_inner = |x: f32, y: f32| {
            if x < lw || y < lw {
                false
            } else if x < r && y < r {
                (x - r).hypot(y - r) <= inner_r
            } else {
                true
            }
        };

        let mut coverage = Vec::with_capacity((size * size) as usize);
        for py in 0..size {
            for px in 0..size {
                let mut hits = 0;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let x = px as f32 + (sx as f32 + 0.5) / SUPERSAMPLE as f32;
                        let y = py as f32 + (sy as f32 + 0.5) / SUPERSAMPLE as f32;
                        if in_outer(x, y) && !in_inner(x, y) {
                            hits += 1;
                        }
                    }
                }
                coverage.push((hits * 255 / samples) as u8);
            }
        }

        Self { size, coverage }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.size + x) as usize]
    }

    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// Copy rotated clockwise
    pub fn rotated(&self, rotation: Rotation) -> CornerMask {
        let n = self.size;
        let last = n.saturating_sub(1);
        let mut coverage = Vec::with_capacity(self.coverage.len());
        for y in 0..n {
            for x in 0..n {
                let value = match rotation {
                    Rotation::R0 => self.at(x, y),
                    Rotation::R90 => self.at(y, last - x),
                    Rotation::R180 => self.at(last - x, last - y),
                    Rotation::R270 => self.at(last - y, x),
                };
                coverage.push(value);
            }
        }
        CornerMask { size: n, coverage }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Border Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Placement of one corner tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerTile {
    pub corner: Corner,
    pub origin: Point,
    pub rotation: Rotation,
}

/// Edge strips and corner tiles around a window, in device pixels
#[derive(Clone, Debug, PartialEq)]
pub struct BorderLayout {
    /// Top, bottom, left, right
    pub edges: [Rect; 4],
    pub corners: [CornerTile; 4],
    pub corner_size: f32,
}

impl BorderLayout {
    pub fn compute(size: Size, corner_size: f32, line_width: f32) -> Self {
        let (w, h) = (size.width, size.height);
        let cs = corner_size.min(size.min_dimension() / 2.0).max(0.0);
        let lw = line_width;

        let tile = |corner: Corner, x: f32, y: f32| CornerTile {
            corner,
            origin: Point::new(x, y),
            rotation: corner.rotation(),
        };

        Self {
            edges: [
                Rect::new(cs, 0.0, w - 2.0 * cs, lw),
                Rect::new(cs, h - lw, w - 2.0 * cs, lw),
                Rect::new(0.0, cs, lw, h - 2.0 * cs),
                Rect::new(w - lw, cs, lw, h - 2.0 * cs),
            ],
            corners: [
                tile(Corner::TopLeft, 0.0, 0.0),
                tile(Corner::TopRight, w - cs, 0.0),
                tile(Corner::BottomRight, w - cs, h - cs),
                tile(Corner::BottomLeft, 0.0, h - cs),
            ],
            corner_size: cs,
        }
    }
}

/// Paint sink for window borders
pub trait BorderPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill `mask`'s coverage with `color`, mask top-left at `origin`
    fn fill_mask(&mut self, origin: Point, mask: &CornerMask, color: Color);
}

#[derive(Debug)]
struct MaskCache {
    scale: f64,
    size: u32,
    /// Indexed like [`Corner::ALL`]
    tiles: [Arc<CornerMask>; 4],
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps one window's clip and border in sync with its state
#[derive(Debug)]
pub struct WindowShapeManager {
    corner_radius: f32,
    border_width: f32,
    clip: WindowClip,
    shaping_supported: bool,
    masks: Option<MaskCache>,
}

impl WindowShapeManager {
    pub fn new(corner_radius: f32, border_width: f32) -> Self {
        Self {
            corner_radius: corner_radius.max(0.0),
            border_width: border_width.max(0.0),
            clip: WindowClip::NoClip,
            shaping_supported: true,
            masks: None,
        }
    }

    pub fn clip(&self) -> &WindowClip {
        &self.clip
    }

    pub fn is_shaping_supported(&self) -> bool {
        self.shaping_supported
    }

    /// Recompute the clip from the window's live size, state and scale and
    /// apply it when it differs from the current one
    pub fn update(&mut self, window: &dyn Window) -> &WindowClip {
        if !self.shaping_supported {
            return &self.clip;
        }

        let target = compute_clip(
            window.bounds().size,
            window.state(),
            window.scale_factor(),
            self.corner_radius,
        );
        if target == self.clip {
            return &self.clip;
        }

        match window.set_shape(target.shape()) {
            Ok(()) => self.clip = target,
            Err(err) => {
                tracing::debug!(%err, "window shaping unavailable, using square corners");
                self.shaping_supported = false;
                self.clip = WindowClip::NoClip;
            }
        }
        &self.clip
    }

    /// Drop the clip, e.g. when decorations are uninstalled
    pub fn clear(&mut self, window: &dyn Window) {
        if self.clip.is_clipped() {
            if let Err(err) = window.set_shape(None) {
                tracing::debug!(%err, "failed to remove window shape");
            }
        }
        self.clip = WindowClip::NoClip;
    }

    /// Corner tiles for `scale`, no larger than `max_size` device pixels
    fn corner_masks(&mut self, scale: f64, max_size: f32) -> [Arc<CornerMask>; 4] {
        let radius = (self.corner_radius * scale as f32).min(max_size.floor()).max(0.0);
        let size = radius.ceil() as u32;
        if let Some(cache) = self
            .masks
            .as_ref()
            .filter(|c| c.scale == scale && c.size == size)
        {
            return cache.tiles.clone();
        }

        let line_width = self.border_width * scale as f32;
        let base = CornerMask::rasterize(radius, line_width, size);
        let tiles = Corner::ALL.map(|corner| Arc::new(base.rotated(corner.rotation())));

        self.masks = Some(MaskCache {
            scale,
            size,
            tiles: tiles.clone(),
        });
        tiles
    }

    /// Paint the border of a window with logical `size`
    ///
    /// Nothing is painted while maximized or fullscreen. Corners are rounded
    /// only when `rounded` is set and the window supports shaping.
    pub fn paint_border(
        &mut self,
        size: Size,
        state: WindowState,
        scale: f64,
        color: Color,
        rounded: bool,
        painter: &mut dyn BorderPainter,
    ) {
        if is_unshaped_state(state) || self.border_width <= 0.0 {
            return;
        }

        let device = size.scale(scale as f32);
        let line_width = (self.border_width * scale as f32).max(1.0);
        let rounded = rounded && self.shaping_supported && self.corner_radius > 0.0;

        if !rounded {
            let layout = BorderLayout::compute(device, 0.0, line_width);
            for edge in layout.edges {
                painter.fill_rect(edge, color);
            }
            return;
        }

        // tiles never reach past the middle of the window
        let masks = self.corner_masks(scale, device.min_dimension() / 2.0);
        let corner_size = masks[0].size() as f32;
        let layout = BorderLayout::compute(device, corner_size, line_width);

        for edge in layout.edges {
            painter.fill_rect(edge, color);
        }
        for (tile, mask) in layout.corners.iter().zip(masks.iter()) {
            painter.fill_mask(tile.origin, mask, color);
        }
    }
}
