//! A page-flow layout engine. Styled text, images, cells and tables are
//! measured against a width, wrapped, and flowed down a logical page that
//! spills onto as many physical pages as it needs. Lines, rectangles and cells
//! that straddle a page break are split so they continue on the next page.
//!
//! ```
//! use pdf_flow::layout::{Cell, Text};
//! use pdf_flow::page::LayoutManager;
//! use pdf_flow::pagesize::{Orientation, LETTER};
//! use pdf_flow::style::{CellStyle, TextStyle};
//! use pdf_flow::writer::PdfDocument;
//! use pdf_flow::{colours, BuiltinFont, Font, Pt};
//! use std::rc::Rc;
//!
//! let font = Rc::new(Font::builtin(BuiltinFont::Courier));
//! let style = TextStyle::new(font, Pt(11.0), colours::BLACK)?;
//!
//! let mut mgr = LayoutManager::new(PdfDocument::default(), LETTER);
//! let mut lp = mgr.logical_page_start(Orientation::Portrait)?;
//! let cell = Cell::builder(CellStyle::default(), Pt(200.0))
//!     .add_text(Text::new(style, "Hello, paginated world!"))
//!     .build()?;
//! let top = lp.body_top();
//! lp.draw_cell(Pt(40.0), top, &cell)?;
//! lp.commit()?;
//!
//! let mut pdf: Vec<u8> = Vec::new();
//! mgr.save(&mut pdf)?;
//! assert!(pdf.starts_with(b"%PDF"));
//! # Ok::<(), pdf_flow::LayoutError>(())
//! ```

mod colour;
pub use colour::*;

mod coord;
pub use coord::*;

mod dim;
pub use dim::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

/// Measuring and drawing content: text, images, cells and tables
pub mod layout;

mod padding;
pub use padding::*;

pub mod page;

pub mod pagesize;

pub(crate) mod refs;

pub mod style;
pub use style::{BorderStyle, LineStyle, NO_BORDERS};

mod units;
pub use units::*;

pub mod winansi;

/// Backends that turn committed pages into a document
pub mod writer;

/// Re-export PDF-writer functionality
pub use pdf_writer;
