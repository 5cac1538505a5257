use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A width or height was negative
    #[error("dimensions must be non-negative, got {width} x {height}")]
    NegativeDimension { width: f32, height: f32 },

    /// One of the four padding components was negative
    #[error("padding must be non-negative, got ({top}, {right}, {bottom}, {left})")]
    NegativePadding {
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
    },

    #[error("line width must be positive, got {0}")]
    InvalidLineWidth(f32),

    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),

    #[error("image dimensions must be positive, got {width} x {height}")]
    InvalidImageSize { width: f32, height: f32 },

    #[error("cell width must be non-negative, got {0}")]
    NegativeCellWidth(f32),

    #[error("cannot meaningfully wrap text with non-positive width {0}")]
    InvalidWrapWidth(f32),

    /// Lines are always drawn from top to bottom
    #[error("y1 param ({y1}) must be >= y2 param ({y2})")]
    InvertedLine { y1: f32, y2: f32 },

    #[error("rectangle top ({top}) must be >= its bottom ({bottom})")]
    InvertedRect { top: f32, bottom: f32 },

    /// The page body must have room for content
    #[error("page body must have a positive height and width, got {width} x {height}")]
    InvalidBody { width: f32, height: f32 },

    #[error("logical page accessed after commit")]
    GroupingCommitted,

    #[error("previous logical page has {0} uncommitted page(s)")]
    GroupingStillOpen(usize),

    #[error("page {0} has already been committed")]
    PageCommitted(usize),

    #[error("page index {0} has not been allocated")]
    NoSuchPage(usize),

    /// NaN and the infinities have no page
    #[error("y coordinate {0} is not a finite number")]
    NonFiniteCoordinate(f32),

    #[error("y coordinate {y} is {pages} pages below the body, more than the limit of {limit}")]
    PageLimitExceeded { y: f32, pages: f32, limit: usize },

    #[error("tried to add more cells than you set sizes for ({0} columns)")]
    TooManyCells(usize),

    #[error("text cells require a text style on the table, part or row")]
    MissingTextStyle,

    #[error("a cell has already been added to column {0}")]
    CellSlotOccupied(usize),

    #[error("cannot build a row while column {0} is reserved but unfilled")]
    UnfinishedCell(usize),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),
}
