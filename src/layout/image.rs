use super::{BlockRenderator, FixedItem, Renderable, Renderator};
use crate::{page::RenderTarget, Coord, Dim, ImageSource, LayoutError, Pt};
use std::rc::Rc;

/// Images are assumed to be 300 DPI unless given an explicit size
pub const IMAGE_SCALE: f32 = 72.0 / 300.0;

/// An image with the size it is drawn at on the page
#[derive(Debug, Clone)]
pub struct ScaledImage {
    source: Rc<ImageSource>,
    dim: Dim,
}

impl ScaledImage {
    /// Sized from the pixel dimensions at 300 DPI
    pub fn new(source: Rc<ImageSource>) -> Result<ScaledImage, LayoutError> {
        let dim = Dim::new(
            Pt(source.width_px() as f32 * IMAGE_SCALE),
            Pt(source.height_px() as f32 * IMAGE_SCALE),
        )?;
        ScaledImage::with_dim(source, dim)
    }

    pub fn with_dim(source: Rc<ImageSource>, dim: Dim) -> Result<ScaledImage, LayoutError> {
        if !(dim.width() > Pt::ZERO && dim.height() > Pt::ZERO) {
            return Err(LayoutError::InvalidImageSize {
                width: dim.width().0,
                height: dim.height().0,
            });
        }
        Ok(ScaledImage { source, dim })
    }

    pub fn source(&self) -> &Rc<ImageSource> {
        &self.source
    }

    pub fn dim(&self) -> Dim {
        self.dim
    }
}

impl FixedItem for ScaledImage {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn ascent(&self) -> Pt {
        self.dim.height()
    }

    fn descent_and_leading(&self) -> Pt {
        Pt::ZERO
    }

    fn render_at(&self, target: &mut dyn RenderTarget, top_left: Coord) -> Result<Coord, LayoutError> {
        let bottom_left = top_left.with_y(top_left.y - self.dim.height());
        let y = target.draw_image(bottom_left, self)?;
        Ok(Coord::new(top_left.x + self.dim.width(), y))
    }
}

impl Renderable for ScaledImage {
    /// Images don't shrink to fit
    fn calc_dimensions(&self, _max_width: Pt) -> Result<Dim, LayoutError> {
        Ok(self.dim)
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        _outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        self.render_at(target, top_left)
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        Box::new(BlockRenderator::new(self, self.dim.width()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn source(w: u32, h: u32) -> Rc<ImageSource> {
        Rc::new(ImageSource::from_image(DynamicImage::ImageRgb8(RgbImage::new(w, h))))
    }

    #[test]
    fn scales_pixels_at_300_dpi() {
        let image = ScaledImage::new(source(300, 150)).unwrap();
        assert!((image.dim().width() - Pt(72.0)).abs() < Pt(1e-4));
        assert!((image.dim().height() - Pt(36.0)).abs() < Pt(1e-4));
        assert_eq!(image.calc_dimensions(Pt(10.0)).unwrap(), image.dim());
    }

    #[test]
    fn rejects_empty_sizes() {
        assert!(matches!(
            ScaledImage::new(source(0, 10)),
            Err(LayoutError::InvalidImageSize { .. })
        ));
        let dim = Dim::new(Pt(10.0), Pt(0.0)).unwrap();
        assert!(ScaledImage::with_dim(source(10, 10), dim).is_err());
    }
}
