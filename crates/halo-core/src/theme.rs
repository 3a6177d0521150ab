//! # Theming and locals
//!
//! Halo uses thread‑local "composition locals" for the parameters that
//! round-display widgets read at construction time:
//!
//! - `ArcScrollBarTheme`: arc bar widths, angles, reserved heights, colors,
//!   transition timings.
//! - `ArcListTheme`: default item size, item spacing, scale curve, fling
//!   physics.
//! - `Density`: dp→px scale factor.
//! - `TextDirection`: LTR or RTL; RTL mirrors the arc bar to the left edge.
//!
//! Override any of them for a subtree of work:
//!
//! ```rust
//! use halo_core::*;
//!
//! let narrow = ArcScrollBarTheme {
//!     normal_width: 3.0,
//!     ..ArcScrollBarTheme::default()
//! };
//!
//! with_arc_scroll_bar_theme(narrow, || {
//!     assert_eq!(arc_scroll_bar_theme().normal_width, 3.0);
//! });
//! assert_eq!(arc_scroll_bar_theme().normal_width, 4.0);
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use web_time::Duration;

use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        let mut st = st.borrow_mut();
        if let Some(top) = st.last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.push(m);
        }
    });
}

/// Runs `f` with `value` provided for its type.
pub fn with_local<T: Copy + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Innermost provided value of type `T`, or its default.
pub fn local<T: Copy + Default + 'static>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

/// Dimensions, angles and timings of the round scroll bar.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArcScrollBarTheme {
    /// Thumb stroke width at rest.
    pub normal_width: f32,
    /// Thumb stroke width while hovered or pressed.
    pub active_width: f32,
    pub normal_background_width: f32,
    pub active_background_width: f32,
    /// Stroke width of the touch-tolerant arc used for hit testing.
    pub hot_zone_width: f32,
    /// Angular length of the whole track, degrees.
    pub max_offset_angle: f32,
    /// Smallest thumb sweep, degrees.
    pub min_angle: f32,
    pub start_reserved_height: f32,
    pub end_reserved_height: f32,
    pub foreground_color: Color,
    pub background_color: Color,
    pub grow_duration_ms: u64,
    pub shrink_duration_ms: u64,
    pub adapt_duration_ms: u64,
    pub appear_duration_ms: u64,
    pub disappear_duration_ms: u64,
    /// Idle time before an `Auto` bar fades out.
    pub disappear_delay_ms: u64,
}

impl Default for ArcScrollBarTheme {
    fn default() -> Self {
        Self {
            normal_width: 4.0,
            active_width: 8.0,
            normal_background_width: 4.0,
            active_background_width: 8.0,
            hot_zone_width: 24.0,
            max_offset_angle: 60.0,
            min_angle: 6.0,
            start_reserved_height: 0.0,
            end_reserved_height: 0.0,
            foreground_color: Color(0xFF, 0xFF, 0xFF, 0x99),
            background_color: Color(0xFF, 0xFF, 0xFF, 0x26),
            grow_duration_ms: 150,
            shrink_duration_ms: 250,
            adapt_duration_ms: 400,
            appear_duration_ms: 100,
            disappear_duration_ms: 300,
            disappear_delay_ms: 2000,
        }
    }
}

impl ArcScrollBarTheme {
    pub fn grow_duration(&self) -> Duration {
        Duration::from_millis(self.grow_duration_ms)
    }
    pub fn shrink_duration(&self) -> Duration {
        Duration::from_millis(self.shrink_duration_ms)
    }
    pub fn adapt_duration(&self) -> Duration {
        Duration::from_millis(self.adapt_duration_ms)
    }
    pub fn appear_duration(&self) -> Duration {
        Duration::from_millis(self.appear_duration_ms)
    }
    pub fn disappear_duration(&self) -> Duration {
        Duration::from_millis(self.disappear_duration_ms)
    }
}

/// Item metrics and scroll physics of the round list.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArcListTheme {
    /// Main size assumed for items that have not been measured yet.
    pub default_item_size: f32,
    pub space_width: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Width of the scale falloff in item sizes along the arc.
    pub scale_spread: f32,
    pub scale_exponent: f32,
    /// px/s².
    pub fling_deceleration: f32,
    /// px/s. Flings faster than this advance the snap target by one item.
    pub snap_velocity_threshold: f32,
    pub settle_duration_ms: u64,
    /// Maximum rubber-band overscroll, as a fraction of the viewport.
    pub overscroll_fraction: f32,
}

impl Default for ArcListTheme {
    fn default() -> Self {
        Self {
            default_item_size: 60.0,
            space_width: 0.0,
            min_scale: 0.78,
            max_scale: 1.08,
            scale_spread: 8.0,
            scale_exponent: 1.85,
            fling_deceleration: 2000.0,
            snap_velocity_threshold: 780.0,
            settle_duration_ms: 350,
            overscroll_fraction: 0.25,
        }
    }
}

impl ArcListTheme {
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub scale: f32, // dp→px multiplier
}
impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn with_arc_scroll_bar_theme<R>(theme: ArcScrollBarTheme, f: impl FnOnce() -> R) -> R {
    with_local(theme, f)
}

pub fn with_arc_list_theme<R>(theme: ArcListTheme, f: impl FnOnce() -> R) -> R {
    with_local(theme, f)
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_local(density, f)
}

pub fn with_text_direction<R>(dir: TextDirection, f: impl FnOnce() -> R) -> R {
    with_local(dir, f)
}

pub fn arc_scroll_bar_theme() -> ArcScrollBarTheme {
    local()
}

pub fn arc_list_theme() -> ArcListTheme {
    local()
}

pub fn density() -> Density {
    local()
}

pub fn text_direction() -> TextDirection {
    local()
}

/// Converts a dp scalar into px using the current density.
pub fn dp_to_px(dp: f32) -> f32 {
    dp * density().scale
}
