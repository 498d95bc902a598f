//! Cutout extraction with coordinate map propagation
//!
//! [`CutoutExtractor`] crops an axis-aligned box around a center from any
//! [`Croppable`] data and re-references an optional [`CoordinateMap`] so it
//! describes the cutout's own pixel grid. Extraction is pure: inputs are
//! never modified and nothing is logged.

use crate::coordinate::{CoordinateMap, PixelPosition, Wcs, WorldPoint};
use crate::extractor::raster::Croppable;
use crate::extractor::region::Region;
use crate::extractor::size::CutoutSize;
use crate::fits::errors::{FitsError, FitsResult};

/// A sub-raster cut from a larger one, with its re-referenced coordinate map
#[derive(Debug, Clone, PartialEq)]
pub struct Cutout<D, M = Wcs> {
    data: D,
    coordinate_map: Option<M>,
    /// Clipped box in source pixel coordinates
    bbox: Region,
    /// Box before clipping
    requested: Region,
    /// Center as requested, source pixel coordinates
    center: PixelPosition,
}

impl<D: Croppable, M> Cutout<D, M> {
    /// Shape of the cutout data as (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }
}

impl<D, M> Cutout<D, M> {
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Coordinate map valid for the cutout pixel grid, if the source had one
    pub fn coordinate_map(&self) -> Option<&M> {
        self.coordinate_map.as_ref()
    }

    /// Position of the cutout's first pixel in the source, `(row0, col0)`
    pub fn origin(&self) -> (i64, i64) {
        (self.bbox.row, self.bbox.col)
    }

    /// Clipped box in source pixel coordinates
    pub fn bbox_original(&self) -> Region {
        self.bbox
    }

    /// Requested box before clipping, in source pixel coordinates
    pub fn requested_region(&self) -> Region {
        self.requested
    }

    /// Requested box in cutout pixel coordinates
    ///
    /// Extends past the cutout edges when the request was clipped.
    pub fn bbox_cutout(&self) -> Region {
        self.requested.translate(self.bbox.row, self.bbox.col)
    }

    /// Requested center in source pixel coordinates
    pub fn center_original(&self) -> PixelPosition {
        self.center
    }

    /// Requested center in cutout pixel coordinates
    pub fn center_cutout(&self) -> PixelPosition {
        self.to_cutout_position(self.center)
    }

    /// Convert a cutout pixel position to the source pixel grid
    pub fn to_original_position(&self, position: PixelPosition) -> PixelPosition {
        position + self.origin_position()
    }

    /// Convert a source pixel position to the cutout pixel grid
    pub fn to_cutout_position(&self, position: PixelPosition) -> PixelPosition {
        position - self.origin_position()
    }

    /// Split the cutout into its data and coordinate map
    pub fn into_parts(self) -> (D, Option<M>) {
        (self.data, self.coordinate_map)
    }

    fn origin_position(&self) -> PixelPosition {
        PixelPosition::new(self.bbox.row as f64, self.bbox.col as f64)
    }
}

/// Stateless cutout extractor
pub struct CutoutExtractor;

impl CutoutExtractor {
    /// Compute the requested and clipped boxes without copying any data
    ///
    /// # Arguments
    /// * `shape` - Source shape as (height, width)
    /// * `center` - Requested center in source pixel coordinates
    /// * `size` - Requested cutout size
    ///
    /// # Returns
    /// `(requested, clipped)` regions, `InvalidSize`, `InvalidCenter` or
    /// `OutOfBounds`
    pub fn plan(shape: (usize, usize), center: PixelPosition, size: CutoutSize) -> FitsResult<(Region, Region)> {
        size.validate()?;
        if !center.is_finite() {
            return Err(FitsError::InvalidCenter { row: center.row, col: center.col });
        }

        let (row_c, col_c) = center.round_ties_even();
        let requested = Region::centered_on(row_c, col_c, size.height, size.width);

        let (height, width) = shape;
        let clipped = requested.clip_to(height, width).ok_or(FitsError::OutOfBounds {
            row0: requested.row,
            col0: requested.col,
            height: requested.height,
            width: requested.width,
            raster_height: height,
            raster_width: width,
        })?;

        Ok((requested, clipped))
    }

    /// Extract a cutout centered on a pixel position
    ///
    /// The center is rounded half-to-even to the nearest pixel. Odd sizes are
    /// centered exactly; even sizes extend one pixel further toward lower
    /// indices. The box is clipped to the source, so a cutout at the edge is
    /// smaller than requested; a box entirely outside is `OutOfBounds`.
    ///
    /// # Arguments
    /// * `data` - Source data
    /// * `coordinate_map` - Optional map for the source pixel grid
    /// * `center` - Requested center in source pixel coordinates
    /// * `size` - Requested cutout size
    ///
    /// # Returns
    /// The cutout, whose map (when given) has its origin moved to the
    /// cutout's first pixel
    pub fn extract<D, M>(
        data: &D,
        coordinate_map: Option<&M>,
        center: PixelPosition,
        size: CutoutSize,
    ) -> FitsResult<Cutout<D, M>>
    where
        D: Croppable,
        M: CoordinateMap + Clone,
    {
        size.validate()?;
        if !center.is_finite() {
            return Err(FitsError::InvalidCenter { row: center.row, col: center.col });
        }
        if let Some(map) = coordinate_map {
            map.validate()?;
        }

        let (requested, bbox) = Self::plan(data.shape(), center, size)?;
        let cropped = data.crop(&bbox)?;

        let coordinate_map = coordinate_map.map(|map| {
            let mut map = map.clone();
            map.shift_origin(bbox.row as f64, bbox.col as f64);
            map
        });

        Ok(Cutout {
            data: cropped,
            coordinate_map,
            bbox,
            requested,
            center,
        })
    }

    /// Extract a cutout from data without a coordinate map
    pub fn extract_data<D: Croppable>(data: &D, center: PixelPosition, size: CutoutSize) -> FitsResult<Cutout<D, Wcs>> {
        Self::extract::<D, Wcs>(data, None, center, size)
    }

    /// Extract a cutout centered on a world coordinate
    ///
    /// The world point is converted with the map first; a point the map
    /// cannot place on the pixel grid is `WorldOutOfBounds`, and a box that
    /// misses the raster is `OutOfBounds`.
    pub fn extract_at_world<D, M>(
        data: &D,
        coordinate_map: &M,
        world: WorldPoint,
        size: CutoutSize,
    ) -> FitsResult<Cutout<D, M>>
    where
        D: Croppable,
        M: CoordinateMap + Clone,
    {
        size.validate()?;
        coordinate_map.validate()?;

        let center = coordinate_map.world_to_pixel(world).ok_or(FitsError::WorldOutOfBounds {
            lon: world.lon,
            lat: world.lat,
        })?;

        Self::extract(data, Some(coordinate_map), center, size)
    }
}
