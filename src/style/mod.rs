//! Immutable descriptions of how content is measured and drawn. Styles are
//! cheap to clone and meant to be built once and shared between many cells.

mod border;
mod cell;
mod line;
mod text;

pub use border::*;
pub use cell::*;
pub use line::*;
pub use text::*;
