//! Pagination.
//!
//! A [`LayoutManager`] owns the physical pages of one document. Content is
//! drawn through a [`PageGrouping`], which flows it down a logical page and
//! allocates physical pages as the content reaches them. Every page buffers
//! its primitives in paint order until the grouping is committed, at which
//! point the pages are handed to a [`DocumentWriter`](crate::writer::DocumentWriter).

mod grouping;
mod item;
mod manager;
mod single;
mod target;

pub use grouping::PageGrouping;
pub use item::*;
pub use manager::*;
pub use single::*;
pub use target::*;
