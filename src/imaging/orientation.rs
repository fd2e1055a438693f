//! EXIF orientation handling.
//!
//! Cameras store pixels in sensor order and record how the device was held
//! in tag `0x0112`. Only the three pure rotations are undone here:
//!
//! | Tag | Correction (counter-clockwise) |
//! |-----|-------------------------------|
//! | 3   | 180° |
//! | 6   | 270° |
//! | 8   | 90°  |
//!
//! Every other value, including the mirrored variants 2, 4, 5 and 7, is left
//! as stored. Missing or unreadable metadata counts as tag 1.

use super::backend::Dimensions;
use image::DynamicImage;
use std::io::Cursor;

/// Value assumed when a file carries no usable orientation tag.
pub const IDENTITY_ORIENTATION: u32 = 1;

/// Counter-clockwise rotation needed to bring stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    pub fn from_exif(tag: u32) -> Self {
        match tag {
            3 => Self::Ccw180,
            6 => Self::Ccw270,
            8 => Self::Ccw90,
            _ => Self::None,
        }
    }

    /// Whether the rotation exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Ccw90 | Self::Ccw270)
    }

    /// Dimensions of a `dims`-sized buffer after this rotation.
    pub fn apply_dimensions(self, dims: Dimensions) -> Dimensions {
        if self.swaps_axes() {
            dims.transposed()
        } else {
            dims
        }
    }

    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        // image's rotate90/rotate270 turn clockwise
        match self {
            Self::None => image,
            Self::Ccw90 => image.rotate270(),
            Self::Ccw180 => image.rotate180(),
            Self::Ccw270 => image.rotate90(),
        }
    }
}

/// Read the orientation tag from raw file bytes, defaulting to 1.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
        return IDENTITY_ORIENTATION;
    };
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(IDENTITY_ORIENTATION)
}

/// Rotate a decoded buffer upright according to the metadata in `raw`.
pub fn correct_orientation(image: DynamicImage, raw: &[u8]) -> DynamicImage {
    Rotation::from_exif(read_orientation(raw)).apply(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, with_exif_orientation};
    use image::{GenericImageView, Rgb, RgbImage};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    /// 2x1 strip: red on the left, blue on the right.
    fn strip() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, BLUE);
        DynamicImage::ImageRgb8(img)
    }

    fn rgb_at(img: &DynamicImage, x: u32, y: u32) -> [u8; 3] {
        let p = img.get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    }

    #[test]
    fn orientation_table() {
        assert_eq!(Rotation::from_exif(1), Rotation::None);
        assert_eq!(Rotation::from_exif(3), Rotation::Ccw180);
        assert_eq!(Rotation::from_exif(6), Rotation::Ccw270);
        assert_eq!(Rotation::from_exif(8), Rotation::Ccw90);
    }

    #[test]
    fn mirrored_and_out_of_range_tags_are_identity() {
        for tag in [0, 2, 4, 5, 7, 9, 42] {
            assert_eq!(Rotation::from_exif(tag), Rotation::None, "tag {tag}");
        }
    }

    #[test]
    fn ccw270_puts_left_edge_on_top() {
        // tag 6: the top of the scene is on the stored left edge
        let out = Rotation::Ccw270.apply(strip());
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(rgb_at(&out, 0, 0), RED.0);
        assert_eq!(rgb_at(&out, 0, 1), BLUE.0);
    }

    #[test]
    fn ccw90_puts_right_edge_on_top() {
        let out = Rotation::Ccw90.apply(strip());
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(rgb_at(&out, 0, 0), BLUE.0);
        assert_eq!(rgb_at(&out, 0, 1), RED.0);
    }

    #[test]
    fn ccw180_reverses_strip() {
        let out = Rotation::Ccw180.apply(strip());
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(rgb_at(&out, 0, 0), BLUE.0);
    }

    #[test]
    fn apply_dimensions_swaps_only_quarter_turns() {
        let dims = Dimensions::new(400, 300);
        assert_eq!(Rotation::Ccw90.apply_dimensions(dims), dims.transposed());
        assert_eq!(Rotation::Ccw270.apply_dimensions(dims), dims.transposed());
        assert_eq!(Rotation::Ccw180.apply_dimensions(dims), dims);
        assert_eq!(Rotation::None.apply_dimensions(dims), dims);
    }

    #[test]
    fn reads_tag_from_jpeg() {
        let bytes = with_exif_orientation(jpeg_bytes(8, 4), 6);
        assert_eq!(read_orientation(&bytes), 6);
    }

    #[test]
    fn missing_metadata_is_identity() {
        assert_eq!(read_orientation(&jpeg_bytes(8, 4)), IDENTITY_ORIENTATION);
    }

    #[test]
    fn garbage_is_identity() {
        assert_eq!(read_orientation(b"not an image"), IDENTITY_ORIENTATION);
        assert_eq!(read_orientation(&[]), IDENTITY_ORIENTATION);
    }

    #[test]
    fn correct_orientation_rotates_decoded_buffer() {
        let raw = with_exif_orientation(jpeg_bytes(8, 4), 8);
        let decoded = image::load_from_memory(&raw).unwrap();
        let upright = correct_orientation(decoded, &raw);
        assert_eq!(upright.dimensions(), (4, 8));
    }
}
