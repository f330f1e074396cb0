//! Helpers for building a title bar's [`HitTestInfo`]
//!
//! The title bar widget itself lives outside this crate. After each layout
//! pass it describes its interactive children with [`TitleBarSpots`] and
//! publishes the result through the provider.

use casement_core::Rect;
use smallvec::SmallVec;

use crate::hit_test::{HitTestInfo, WindowButtons};

/// Spots are grown by this much so components still receive exit events
/// before the OS takes over the pointer as caption.
pub const HIT_TEST_SPOT_GROW: f32 = 2.0;

/// Reading direction of the title bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Grow a component's bounds into a hit-test spot. Empty components yield
/// no spot.
pub fn hit_test_spot(bounds: Rect) -> Option<Rect> {
    if bounds.is_empty() {
        return None;
    }
    Some(bounds.grow(HIT_TEST_SPOT_GROW, HIT_TEST_SPOT_GROW))
}

/// Title bar height reported to the router: one pixel short of the widget so
/// the widget still sees the pointer leave through its bottom edge.
pub fn reported_title_bar_height(widget_height: f32) -> f32 {
    if widget_height > 0.0 {
        widget_height - 1.0
    } else {
        0.0
    }
}

/// Split an embedded menu bar around its flexible spacer
///
/// The spacer is left out of the result so pointers over it classify as
/// caption and drag the window. Spots come back in reading order.
pub fn menu_bar_spots(
    menu_bar: Rect,
    spacer: Option<Rect>,
    direction: LayoutDirection,
) -> SmallVec<[Rect; 2]> {
    let mut spots = SmallVec::new();

    let Some(spacer) = spacer.filter(|s| !s.is_empty()) else {
        spots.extend(hit_test_spot(menu_bar));
        return spots;
    };

    let left = Rect::from_edges(
        menu_bar.left(),
        menu_bar.top(),
        spacer.left().max(menu_bar.left()),
        menu_bar.bottom(),
    );
    let right = Rect::from_edges(
        spacer.right().min(menu_bar.right()),
        menu_bar.top(),
        menu_bar.right(),
        menu_bar.bottom(),
    );

    let (first, second) = match direction {
        LayoutDirection::LeftToRight => (left, right),
        LayoutDirection::RightToLeft => (right, left),
    };
    spots.extend(hit_test_spot(first));
    spots.extend(hit_test_spot(second));
    spots
}

/// Builder collecting a title bar's interactive areas
#[derive(Clone, Debug, Default)]
pub struct TitleBarSpots {
    title_bar_height: f32,
    spots: Vec<Rect>,
    app_icon: Option<Rect>,
    buttons: WindowButtons,
}

impl TitleBarSpots {
    /// Start from the title bar widget's height
    pub fn new(widget_height: f32) -> Self {
        Self {
            title_bar_height: reported_title_bar_height(widget_height),
            ..Self::default()
        }
    }

    /// Add an interactive component (button panel, search field, ...)
    pub fn component(mut self, bounds: Rect) -> Self {
        self.spots.extend(hit_test_spot(bounds));
        self
    }

    /// Add an embedded menu bar, optionally split around a flexible spacer
    pub fn menu_bar(mut self, bounds: Rect, spacer: Option<Rect>, direction: LayoutDirection) -> Self {
        self.spots.extend(menu_bar_spots(bounds, spacer, direction));
        self
    }

    /// Application icon; classifies as system menu
    pub fn app_icon(mut self, bounds: Rect) -> Self {
        if !bounds.is_empty() {
            self.app_icon = Some(bounds);
        }
        self
    }

    pub fn buttons(mut self, buttons: WindowButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn build(self) -> HitTestInfo {
        HitTestInfo::new(self.title_bar_height, self.spots)
            .with_app_icon(self.app_icon)
            .with_buttons(self.buttons)
    }
}
