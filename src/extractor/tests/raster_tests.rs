//! Tests for rasters, regions and cutout sizes

use std::str::FromStr;

use crate::extractor::{Croppable, CutoutSize, ImageData, Raster, Region};
use crate::fits::errors::FitsError;

#[test]
fn test_raster_rejects_bad_buffers() {
    assert!(matches!(Raster::new(2, 3, vec![0u8; 5]), Err(FitsError::InvalidRaster(_))));
    assert!(matches!(Raster::<u8>::new(0, 3, Vec::new()), Err(FitsError::InvalidRaster(_))));
}

#[test]
fn test_raster_accessors() {
    let raster = Raster::new(2, 3, vec![1i16, 2, 3, 4, 5, 6]).unwrap();

    assert_eq!(raster.shape(), (2, 3));
    assert_eq!(raster.get(1, 0), Some(4));
    assert_eq!(raster.get(2, 0), None);
    assert_eq!(raster.get(0, 3), None);
    assert_eq!(raster.row(1), Some(&[4i16, 5, 6][..]));
    assert_eq!(raster.rows().count(), 2);
    assert_eq!(raster.min_max(), Some((1.0, 6.0)));
}

#[test]
fn test_crop_requires_region_inside() {
    let raster = Raster::from_fn(4, 4, |r, c| (r * 4 + c) as u8).unwrap();

    let cropped = raster.crop(&Region::new(1, 2, 2, 2)).unwrap();
    assert_eq!(cropped.to_nested(), vec![vec![6, 7], vec![10, 11]]);

    assert!(raster.crop(&Region::new(3, 3, 2, 2)).is_err());
    assert!(raster.crop(&Region::new(-1, 0, 2, 2)).is_err());
}

#[test]
fn test_min_max_skips_nan() {
    let raster = Raster::new(1, 3, vec![f64::NAN, -2.5, 7.0]).unwrap();
    assert_eq!(raster.min_max(), Some((-2.5, 7.0)));

    let all_nan = Raster::new(1, 2, vec![f32::NAN, f32::NAN]).unwrap();
    assert_eq!(all_nan.min_max(), None);
}

#[test]
fn test_image_data_properties() {
    let data = ImageData::from(Raster::new(2, 2, vec![1i64, 2, 3, 4]).unwrap());

    assert_eq!(data.bitpix(), 64);
    assert_eq!(data.npy_descr(), ">i8");
    assert_eq!(data.byte_len(), 32);
    assert_eq!(data.get_string(1, 1).as_deref(), Some("4"));

    let mut bytes = Vec::new();
    data.write_be(&mut bytes).unwrap();
    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_region_geometry() {
    let region = Region::centered_on(5, 5, 4, 3);
    assert_eq!(region, Region::new(3, 4, 4, 3));
    assert_eq!((region.end_row(), region.end_col()), (7, 7));
    assert_eq!(region.area(), 12);
    assert!(region.contains(3, 4));
    assert!(!region.contains(7, 4));

    let other = Region::new(5, 6, 10, 10);
    assert_eq!(region.intersect(&other), Some(Region::new(5, 6, 2, 1)));
    assert_eq!(region.intersect(&Region::new(7, 7, 1, 1)), None);

    assert_eq!(Region::new(-2, 8, 5, 5).clip_to(10, 10), Some(Region::new(0, 8, 3, 2)));
    assert_eq!(region.translate(3, 4), Region::new(0, 0, 4, 3));
    assert_eq!(region.to_string(), "rows [3, 7) x cols [4, 7)");
}

#[test]
fn test_cutout_size_parsing() {
    assert_eq!(CutoutSize::from_str("5").unwrap(), CutoutSize::square(5));
    assert_eq!(CutoutSize::from_str("3,4").unwrap(), CutoutSize::new(3, 4));
    assert_eq!(CutoutSize::from_str(" 3 x 4 ").unwrap(), CutoutSize::new(3, 4));
    assert_eq!(CutoutSize::from_str("3X4").unwrap().to_string(), "3x4");

    // Non-positive values parse; validation rejects them
    let zero = CutoutSize::from_str("0").unwrap();
    assert!(matches!(zero.validate(), Err(FitsError::InvalidSize { height: 0, width: 0 })));

    assert!(matches!(CutoutSize::from_str("abc"), Err(FitsError::InvalidArgument(_))));
    assert!(matches!(CutoutSize::from_str("3,4,5"), Err(FitsError::InvalidArgument(_))));
    assert!(matches!(CutoutSize::from_str("2.5"), Err(FitsError::InvalidArgument(_))));
}
