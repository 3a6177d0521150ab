//! Round-display scroll widgets: the arc scroll bar, its animated overlay
//! and the arc list layout engine.
//!
//! `ArcListState` is the entry point for hosts. The lower-level pieces are
//! public for hosts that bring their own scroll container:
//!
//! - `scroll_bar` / `arc_scroll_bar`: bar state and arc geometry,
//! - `overlay`: animated paint properties of the arc bar,
//! - `arc_list_layout` / `position_map`: windowed layout, scale and snap,
//! - `scroll`: offset, fling prediction and settle,
//! - `gestures`: drag recognition,
//! - `canvas`: a recording `ArcCanvas`.

pub mod arc_list;
pub mod arc_list_layout;
pub mod arc_scroll_bar;
pub mod canvas;
pub mod gestures;
pub mod overlay;
pub mod position_map;
pub mod scroll;
pub mod scroll_bar;
pub mod tests;

pub use arc_list::ArcListState;
pub use arc_list_layout::{
    ArcListLayoutAlgorithm, ArcScaleCurve, HeaderLayoutState, ItemPosition, ScrollSnapAlign,
    UNSET_SNAP_END_POS,
};
pub use arc_scroll_bar::ArcBar;
pub use canvas::{DrawCommand, DrawScope};
pub use gestures::{DragEvent, DragRecognizer};
pub use overlay::{ArcProperty, ArcScrollBarOverlayModifier};
pub use position_map::{ArcListPositionMap, PositionInfo};
pub use scroll::{AnimationState, EdgeEffect, ScrollableState};
pub use scroll_bar::{
    DisplayMode, DragPhase, HoverAnimationType, LinearBar, OpacityAnimationType, ScrollBar,
    ScrollBarCapabilities, ScrollBarKind, ScrollBarState,
};
