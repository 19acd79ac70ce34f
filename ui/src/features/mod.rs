//! Page-scoped enhancements. Each module owns the DOM logic of one feature;
//! event wiring lives in `crate::web`.

pub mod hero;
pub mod menu;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod seo;
pub mod theme;
pub mod toast;
pub mod transitions;
