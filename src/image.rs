use crate::{
    refs::{ObjectReferences, RefType},
    LayoutError,
};
use image::{ColorType, DynamicImage, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

enum RasterData {
    /// RGB JPEG data that PDF readers decode themselves
    DirectlyEmbeddableJpeg(Vec<u8>),
    Image(DynamicImage),
}

/// A decoded raster image. Share it through an `Rc`: the
/// [`LayoutManager`](crate::page::LayoutManager) embeds each distinct `Rc` once per
/// document, no matter how many times it is placed.
pub struct ImageSource {
    data: RasterData,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl ImageSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImageSource, LayoutError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let is_tga = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("tga"))
            .unwrap_or(false);
        if is_tga {
            let image = image::load_from_memory_with_format(&data, ImageFormat::Tga)?;
            return Ok(ImageSource::from_image(image));
        }
        ImageSource::from_bytes(data)
    }

    /// Decode an encoded image (PNG, JPEG, GIF, ...). RGB JPEGs keep their original
    /// bytes so they can be embedded without re-encoding.
    pub fn from_bytes(data: Vec<u8>) -> Result<ImageSource, LayoutError> {
        let format = image::guess_format(&data)?;
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(ImageSource {
                width: image.width(),
                height: image.height(),
                data: RasterData::DirectlyEmbeddableJpeg(data),
            }),
            _ => Ok(ImageSource::from_image(image)),
        }
    }

    pub fn from_image(image: DynamicImage) -> ImageSource {
        ImageSource {
            width: image.width(),
            height: image.height(),
            data: RasterData::Image(image),
        }
    }

    /// Intrinsic width in pixels
    pub fn width_px(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels
    pub fn height_px(&self) -> u32 {
        self.height
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            RasterData::DirectlyEmbeddableJpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            RasterData::Image(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes: compress_to_vec_zlib(image.to_rgb8().as_raw(), level),
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // the transparency mask, if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn reports_pixel_size() {
        let img = ImageSource::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            30,
            12,
            Rgba([10, 20, 30, 128]),
        )));
        assert_eq!(img.width_px(), 30);
        assert_eq!(img.height_px(), 12);
        let encoded = img.encode();
        assert_eq!(encoded.filter, Filter::FlateDecode);
        assert!(encoded.mask.is_some());
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(ImageSource::from_bytes(b"definitely not an image".to_vec()).is_err());
    }
}
