//! Tests for cutout extraction

use crate::coordinate::{CoordinateMap, LinearTransform, PixelPosition, Wcs};
use crate::extractor::{Croppable, CutoutExtractor, CutoutSize, ImageData, Raster, Region};
use crate::fits::errors::FitsError;

/// 10x10 raster whose value at (r, c) is r * 10 + c
fn grid() -> Raster<i32> {
    Raster::from_fn(10, 10, |r, c| (r * 10 + c) as i32).unwrap()
}

fn tan_wcs() -> Wcs {
    let angle = 30f64.to_radians();
    let scale = 1e-3;
    Wcs::tan(
        [5.5, 4.5],
        [150.0, 30.0],
        [
            [-scale * angle.cos(), scale * angle.sin()],
            [scale * angle.sin(), scale * angle.cos()],
        ],
    )
}

#[test]
fn test_odd_size_is_centered() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, 4.0), CutoutSize::square(3)).unwrap();

    assert_eq!(cutout.data().to_nested(), vec![vec![33, 34, 35], vec![43, 44, 45], vec![53, 54, 55]]);
    assert_eq!(cutout.origin(), (3, 3));
    assert_eq!(cutout.shape(), (3, 3));
    assert!(cutout.coordinate_map().is_none());
}

#[test]
fn test_corner_request_is_clipped() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(0.0, 0.0), CutoutSize::square(4)).unwrap();

    // Even sizes extend toward lower indices: rows [-2, 2) clip to [0, 2)
    assert_eq!(cutout.data().to_nested(), vec![vec![0, 1], vec![10, 11]]);
    assert_eq!(cutout.origin(), (0, 0));
    assert_eq!(cutout.requested_region(), Region::new(-2, -2, 4, 4));
    assert_eq!(cutout.bbox_original(), Region::new(0, 0, 2, 2));
}

#[test]
fn test_request_outside_raster_fails() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(20.0, 20.0), CutoutSize::square(3));

    match result {
        Err(FitsError::OutOfBounds { row0, col0, raster_height, raster_width, .. }) => {
            assert_eq!((row0, col0), (19, 19));
            assert_eq!((raster_height, raster_width), (10, 10));
        },
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_even_size_puts_extra_pixel_low() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(5.0, 5.0), CutoutSize::square(4)).unwrap();

    assert_eq!(cutout.origin(), (3, 3));
    assert_eq!(cutout.shape(), (4, 4));
    assert_eq!(cutout.data().get(0, 0), Some(33));
    assert_eq!(cutout.data().get(3, 3), Some(66));
}

#[test]
fn test_center_rounds_half_to_even() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.5, 5.5), CutoutSize::square(1)).unwrap();

    assert_eq!(cutout.origin(), (4, 6));
    assert_eq!(cutout.data().to_nested(), vec![vec![46]]);
}

#[test]
fn test_rectangular_size() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(5.0, 5.0), CutoutSize::new(1, 3)).unwrap();

    assert_eq!(cutout.shape(), (1, 3));
    assert_eq!(cutout.data().to_nested(), vec![vec![54, 55, 56]]);
}

#[test]
fn test_invalid_size() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, 4.0), CutoutSize::new(3, 0));
    assert!(matches!(result, Err(FitsError::InvalidSize { height: 3, width: 0 })));

    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, 4.0), CutoutSize::square(-2));
    assert!(matches!(result, Err(FitsError::InvalidSize { .. })));
}

#[test]
fn test_invalid_center() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(f64::NAN, 4.0), CutoutSize::square(3));
    assert!(matches!(result, Err(FitsError::InvalidCenter { .. })));

    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, f64::INFINITY), CutoutSize::square(3));
    assert!(matches!(result, Err(FitsError::InvalidCenter { .. })));
}

#[test]
fn test_size_is_validated_before_center() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(f64::NAN, 4.0), CutoutSize::square(0));
    assert!(matches!(result, Err(FitsError::InvalidSize { .. })));
}

#[test]
fn test_singular_map_is_degenerate() {
    let wcs = Wcs::new([1.0, 1.0], [0.0, 0.0], LinearTransform::Cd([[0.0, 0.0], [0.0, 0.0]]));
    let result = CutoutExtractor::extract(&grid(), Some(&wcs), PixelPosition::new(4.0, 4.0), CutoutSize::square(3));

    assert!(matches!(result, Err(FitsError::DegenerateMap(_))));
}

#[test]
fn test_partial_overlap_at_far_edge() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(9.0, 9.0), CutoutSize::square(5)).unwrap();

    assert_eq!(cutout.origin(), (7, 7));
    assert_eq!(cutout.shape(), (3, 3));
    assert_eq!(cutout.data().get(2, 2), Some(99));
    assert_eq!(cutout.requested_region(), Region::new(7, 7, 5, 5));
    assert_eq!(cutout.bbox_cutout(), Region::new(0, 0, 5, 5));
    assert_eq!(cutout.center_cutout(), PixelPosition::new(2.0, 2.0));
}

#[test]
fn test_negative_center_keeps_requested_box() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(-1.0, -1.0), CutoutSize::square(3)).unwrap();

    assert_eq!(cutout.data().to_nested(), vec![vec![0]]);
    assert_eq!(cutout.bbox_cutout(), Region::new(-2, -2, 3, 3));
    assert_eq!(cutout.center_cutout(), PixelPosition::new(-1.0, -1.0));
}

#[test]
fn test_position_conversions() {
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, 6.0), CutoutSize::square(3)).unwrap();

    let inside = PixelPosition::new(1.0, 2.0);
    let original = cutout.to_original_position(inside);
    assert_eq!(original, PixelPosition::new(4.0, 7.0));
    assert_eq!(cutout.to_cutout_position(original), inside);

    let (r, c) = (original.row as usize, original.col as usize);
    assert_eq!(cutout.data().get(1, 2), grid().get(r, c));
}

#[test]
fn test_reference_pixel_is_shifted() {
    let wcs = Wcs::new([5.0, 6.0], [10.0, 20.0], LinearTransform::Cd([[1.0, 0.0], [0.0, 1.0]]));
    let cutout = CutoutExtractor::extract(&grid(), Some(&wcs), PixelPosition::new(4.0, 4.0), CutoutSize::square(3)).unwrap();

    let map = cutout.coordinate_map().unwrap();
    assert_eq!(map.crpix(), [2.0, 3.0]);
    assert_eq!(map.crval(), [10.0, 20.0]);
    assert_eq!(map.linear(), wcs.linear());
}

#[test]
fn test_cutout_map_agrees_with_source_map() {
    let wcs = tan_wcs();
    let cutout = CutoutExtractor::extract(&grid(), Some(&wcs), PixelPosition::new(6.0, 3.0), CutoutSize::new(3, 5)).unwrap();
    let map = cutout.coordinate_map().unwrap();

    for row in 0..3 {
        for col in 0..5 {
            let local = PixelPosition::new(row as f64, col as f64);
            let expected = wcs.pixel_to_world(cutout.to_original_position(local)).unwrap();
            let actual = map.pixel_to_world(local).unwrap();
            assert!((expected.lon - actual.lon).abs() < 1e-10, "lon at {}", local);
            assert!((expected.lat - actual.lat).abs() < 1e-10, "lat at {}", local);
        }
    }
}

#[test]
fn test_inputs_are_not_modified() {
    let data = grid();
    let wcs = tan_wcs();
    let (data_before, wcs_before) = (data.clone(), wcs.clone());

    let _ = CutoutExtractor::extract(&data, Some(&wcs), PixelPosition::new(4.0, 4.0), CutoutSize::square(3)).unwrap();

    assert_eq!(data, data_before);
    assert_eq!(wcs, wcs_before);
}

#[test]
fn test_image_data_keeps_sample_type() {
    let raster = Raster::from_fn(4, 4, |r, c| (r * 4 + c) as f32 * 0.5).unwrap();
    let data = ImageData::from(raster);

    let cutout = CutoutExtractor::extract_data(&data, PixelPosition::new(1.0, 1.0), CutoutSize::square(3)).unwrap();

    assert_eq!(cutout.data().bitpix(), -32);
    assert_eq!(cutout.data().shape(), (3, 3));
    assert_eq!(cutout.data().get_f64(0, 0), Some(0.0));
    assert_eq!(cutout.data().get_f64(2, 2), Some(5.0));
}

#[test]
fn test_extract_at_world() {
    let wcs = tan_wcs();
    let world = wcs.pixel_to_world(PixelPosition::new(4.0, 4.0)).unwrap();

    let cutout = CutoutExtractor::extract_at_world(&grid(), &wcs, world, CutoutSize::square(3)).unwrap();

    assert_eq!(cutout.origin(), (3, 3));
    assert_eq!(cutout.data().get(1, 1), Some(44));
}

#[test]
fn test_world_behind_projection_is_out_of_bounds() {
    let wcs = tan_wcs();
    let antipode = crate::coordinate::WorldPoint::new(330.0, -30.0);

    let result = CutoutExtractor::extract_at_world(&grid(), &wcs, antipode, CutoutSize::square(3));

    match result {
        Err(err @ FitsError::WorldOutOfBounds { .. }) => {
            assert_eq!(err.exit_code(), 3);
            assert!(err.to_string().contains("cannot be placed on the pixel grid"));
        },
        other => panic!("expected WorldOutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_huge_center_is_out_of_bounds() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(1e300, 4.0), CutoutSize::square(3));
    let err = result.unwrap_err();
    assert!(matches!(err, FitsError::OutOfBounds { .. }));
    assert!(!err.to_string().is_empty());

    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, -1e300), CutoutSize::square(3));
    assert!(matches!(result, Err(FitsError::OutOfBounds { .. })));
}

#[test]
fn test_huge_size_does_not_overflow() {
    let result = CutoutExtractor::extract_data(&grid(), PixelPosition::new(5e18, 4.0), CutoutSize::square(i64::MAX));
    let err = result.unwrap_err();
    assert!(matches!(err, FitsError::OutOfBounds { .. }));
    assert!(err.to_string().contains("does not overlap"));

    // A box covering the whole raster clips to the raster
    let cutout = CutoutExtractor::extract_data(&grid(), PixelPosition::new(4.0, 4.0), CutoutSize::square(i64::MAX))
        .unwrap();
    assert_eq!(cutout.shape(), (10, 10));
    assert_eq!(cutout.origin(), (0, 0));
}

#[test]
fn test_repeated_extraction_is_identical() {
    let data = ImageData::from(Raster::from_fn(10, 10, |r, c| (r as f64).sin() * 1e3 + c as f64 / 7.0).unwrap());
    let wcs = tan_wcs();
    let center = PixelPosition::new(6.4, 2.5);
    let size = CutoutSize::new(4, 5);

    let first = CutoutExtractor::extract(&data, Some(&wcs), center, size).unwrap();
    let second = CutoutExtractor::extract(&data, Some(&wcs), center, size).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.data(), second.data());
    assert_eq!(first.origin(), second.origin());
    assert_eq!(first.coordinate_map(), second.coordinate_map());
}

#[test]
fn test_plan_matches_extraction() {
    let (requested, clipped) = CutoutExtractor::plan((10, 10), PixelPosition::new(0.0, 9.0), CutoutSize::square(3)).unwrap();

    assert_eq!(requested, Region::new(-1, 8, 3, 3));
    assert_eq!(clipped, Region::new(0, 8, 2, 2));
}
