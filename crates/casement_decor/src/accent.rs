//! Accent-colored window borders
//!
//! Border color either comes from config or follows the OS accent
//! (colorization) color. OS notifications about accent changes arrive in
//! bursts from a platform thread; [`AccentNotifier`] coalesces them into one
//! notification delivered on the UI thread after a quiet period.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use casement_core::Color;
use parking_lot::Mutex;

/// Quiet period after the last accent change before listeners hear of it
pub const ACCENT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Neutral border the colorization color is mixed with
pub const NEUTRAL_BORDER: u32 = 0xD9D9D9;

/// Where the border color comes from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AccentColorSource {
    Explicit(Color),
    System,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

/// OS accent settings relevant to window borders
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SystemAccent {
    /// The user enabled "show accent color on title bars and borders"
    pub affects_borders: bool,
    pub colorization: Option<Color>,
    /// 0..=100; out-of-range values mean 100
    pub balance: i32,
}

/// Mix the colorization color with the neutral border by `balance` percent
pub fn blend_colorization(color: Color, balance: i32) -> Color {
    let balance = if (0..=100).contains(&balance) { balance } else { 100 };
    match balance {
        0 => Color::from_hex(NEUTRAL_BORDER),
        100 => color,
        _ => {
            let alpha = balance as f32 / 100.0;
            let neutral = (NEUTRAL_BORDER & 0xFF) as f32;
            let [r, g, b] = color.to_rgb8();
            let mix = |c: u8| (c as f32 * alpha + neutral * (1.0 - alpha)).round().clamp(0.0, 255.0) as u32;
            Color::from_hex(mix(r) << 16 | mix(g) << 8 | mix(b))
        }
    }
}

/// Active border color the OS would draw, if it colors borders at all
pub fn system_active_border(accent: &SystemAccent) -> Option<Color> {
    if !accent.affects_borders {
        return None;
    }
    accent.colorization.map(|color| blend_colorization(color, accent.balance))
}

/// Default border colors when neither config nor the OS provides one
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderColors {
    pub active: Color,
    pub inactive: Color,
}

impl BorderColors {
    pub fn defaults(theme: ThemeVariant) -> Self {
        match theme {
            ThemeVariant::Light => Self {
                active: Color::from_hex(0x707070),
                inactive: Color::from_hex(0xAAAAAA),
            },
            ThemeVariant::Dark => Self {
                active: Color::from_hex(0x2D2E2F),
                inactive: Color::from_hex(0x494A4B),
            },
        }
    }
}

/// Resolve the border color for a window
pub fn border_color(
    source: AccentColorSource,
    system: Option<&SystemAccent>,
    theme: ThemeVariant,
    active: bool,
) -> Color {
    if let AccentColorSource::Explicit(color) = source {
        return color;
    }

    let defaults = BorderColors::defaults(theme);
    if !active {
        return defaults.inactive;
    }
    system
        .and_then(system_active_border)
        .unwrap_or(defaults.active)
}

// ─────────────────────────────────────────────────────────────────────────────
// Debounced change channel
// ─────────────────────────────────────────────────────────────────────────────

fn should_deliver(pending: bool, deadline: Option<Instant>, now: Instant) -> bool {
    pending && deadline.is_some_and(|deadline| now >= deadline)
}

fn rearmed_deadline(now: Instant, delay: Duration) -> Instant {
    now + delay
}

type Waker = Arc<dyn Fn() + Send + Sync>;

struct DebounceState {
    pending: bool,
    deadline: Option<Instant>,
    waker: Option<Waker>,
}

/// Cross-thread accent change notifier
///
/// Platform threads call [`notify`](Self::notify); every call re-arms the
/// deadline. The UI thread calls [`poll`](Self::poll) from its event loop
/// and gets `true` exactly once per burst, after the last event plus the
/// debounce delay. Clones share state, waker included.
#[derive(Clone)]
pub struct AccentNotifier {
    state: Arc<Mutex<DebounceState>>,
    delay: Duration,
}

impl AccentNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(DebounceState {
                pending: false,
                deadline: None,
                waker: None,
            })),
            delay,
        }
    }

    pub fn with_waker(self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_waker(waker);
        self
    }

    /// Called after each `notify` so a sleeping event loop re-evaluates its
    /// deadline
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.state.lock().waker = Some(Arc::new(waker));
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an accent change observed at `now`
    pub fn notify(&self, now: Instant) {
        let waker = {
            let mut state = self.state.lock();
            state.pending = true;
            state.deadline = Some(rearmed_deadline(now, self.delay));
            state.waker.clone()
        };
        if let Some(waker) = waker {
            waker();
        }
    }

    /// Deliver a pending notification whose quiet period has passed
    pub fn poll(&self, now: Instant) -> bool {
        let mut state = self.state.lock();
        if !should_deliver(state.pending, state.deadline, now) {
            return false;
        }
        state.pending = false;
        state.deadline = None;
        true
    }

    /// When the event loop should poll next
    pub fn next_deadline(&self) -> Option<Instant> {
        let state = self.state.lock();
        state.deadline.filter(|_| state.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }
}

impl Default for AccentNotifier {
    fn default() -> Self {
        Self::new(ACCENT_DEBOUNCE)
    }
}

impl fmt::Debug for AccentNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccentNotifier")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
