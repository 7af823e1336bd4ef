//! Presentation state consumed by the screens.
//!
//! Rendering itself happens elsewhere; this layer provides the state a screen
//! binds to.
//!
//! # Modules
//!
//! - [`viewmodel`]: Filterable, selectable record collections
//! - [`theme`]: Theme mode and light/dark color palettes

pub mod theme;
pub mod viewmodel;

pub use theme::{Palette, PaletteColors, PaletteSet, ThemeMode};
pub use viewmodel::{FilterableCollection, Predicate, MATCH_ALL};
