//! # Halo core
//!
//! Value types and ambient services shared by Halo's round-display widgets.
//!
//! - Geometry: `Vec2`, `Size`, `Rect`, the `near_*` float comparisons and
//!   `ArcRound`, an annular sector with a hit test.
//! - `Color` and the `ArcCanvas` drawing trait a render backend implements.
//! - Animation: `AnimatedValue<T>` driven by a per-thread replaceable clock.
//! - `Signal<T>`: a shared observable cell.
//! - Theme locals: `ArcScrollBarTheme`, `ArcListTheme`, `Density`,
//!   `TextDirection`.
//! - `NodeArena`: the list's node tree, addressed by `NodeKey`.
//!
//! ```rust
//! use halo_core::*;
//!
//! let offset = signal(0.0f32);
//! offset.update(|v| *v += 12.5);
//! assert_eq!(offset.get(), 12.5);
//!
//! let thumb = ArcRound::new(Vec2::new(120.0, 120.0), 116.0, -30.0, 20.0, 4.0);
//! assert!(thumb.is_valid());
//! ```
//!
//! Everything here is single-threaded: state lives behind `Rc<RefCell<_>>`
//! and thread-locals, and is only touched from the UI thread.

pub mod animation;
pub mod arc;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod node;
pub mod render_api;
pub mod signal;
pub mod theme;

pub use animation::{
    AnimatedValue, AnimationSpec, Clock, Easing, Interpolate, ManualClock, SystemClock,
    reset_clock, set_clock,
};
pub use arc::*;
pub use color::*;
pub use error::{HaloError, Result};
pub use geometry::*;
pub use input::*;
pub use node::*;
pub use render_api::*;
pub use signal::*;
pub use theme::*;

/// Current time on the animation clock.
pub fn now() -> web_time::Instant {
    animation::now()
}
