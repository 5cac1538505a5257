mod cell;
mod image;
mod margins;
mod renderable;
mod table;
mod text;

pub use cell::*;
pub use self::image::*;
pub use margins::*;
pub use renderable::*;
pub use table::*;
pub use text::*;
