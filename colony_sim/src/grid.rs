// Grid coordinate mapping and tile rectangles.
//
// `GridMapper` converts between world (pixel) coordinates reported by the
// host engine and discrete tile coordinates. Both directions are pure, total
// functions: a pointer left of or above the map simply yields a negative
// tile, which the validator later rejects as out of bounds.
//
// `TileRect` is the inclusive rectangle every multi-tile operation works
// with. A drag gesture produces one via `TileRect::from_corners`, which
// normalizes the two corners per axis so that dragging "backwards" covers
// the same tiles as dragging forwards.
//
// See also: `session.rs` which maps the pointer every poll, `occupancy.rs`
// and `validator.rs` which consume `TileRect`s.

use crate::types::{Footprint, TileCoord};
use serde::{Deserialize, Serialize};

/// Converts between world pixels and tiles for a fixed tile edge length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMapper {
    tile_size: u32,
}

impl GridMapper {
    /// Create a mapper. A zero tile size is treated as 1 pixel.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// The tile containing the given world point (floor division per axis).
    pub fn to_tile(&self, world_x: f32, world_y: f32) -> TileCoord {
        let size = self.tile_size as f32;
        TileCoord::new(
            (world_x / size).floor() as i32,
            (world_y / size).floor() as i32,
        )
    }

    /// Pixel center of a tile.
    pub fn to_world_center(&self, tile: TileCoord) -> (f32, f32) {
        let size = self.tile_size as f32;
        (
            (tile.col as f32 + 0.5) * size,
            (tile.row as f32 + 0.5) * size,
        )
    }

    /// Pixel bounds `(x, y, width, height)` of a rect, for preview overlays.
    pub fn rect_to_world(&self, rect: TileRect) -> (f32, f32, f32, f32) {
        let size = self.tile_size as f32;
        (
            rect.origin.col as f32 * size,
            rect.origin.row as f32 * size,
            rect.width as f32 * size,
            rect.height as f32 * size,
        )
    }
}

/// An inclusive, axis-aligned rectangle of tiles. Never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Min corner (smallest col and row).
    pub origin: TileCoord,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(origin: TileCoord, footprint: Footprint) -> Self {
        Self {
            origin,
            width: footprint.width,
            height: footprint.height,
        }
    }

    pub fn single(tile: TileCoord) -> Self {
        Self::new(tile, Footprint::SINGLE)
    }

    /// The normalized bounding box of two corner tiles, both included.
    ///
    /// Corners at opposite ends of the `i32` range give a side of
    /// `u32::MAX` rather than overflowing.
    pub fn from_corners(a: TileCoord, b: TileCoord) -> Self {
        Self {
            origin: TileCoord::new(a.col.min(b.col), a.row.min(b.row)),
            width: a.col.abs_diff(b.col).saturating_add(1),
            height: a.row.abs_diff(b.row).saturating_add(1),
        }
    }

    /// Bounding box of an arbitrary tile set, or `None` if it is empty.
    pub fn bounding(tiles: &[TileCoord]) -> Option<Self> {
        let (first, rest) = tiles.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for t in rest {
            min = TileCoord::new(min.col.min(t.col), min.row.min(t.row));
            max = TileCoord::new(max.col.max(t.col), max.row.max(t.row));
        }
        Some(Self::from_corners(min, max))
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.width, self.height)
    }

    /// Max corner, inclusive. Clamped to the `i32` range.
    pub fn max(&self) -> TileCoord {
        self.tile_at(self.width.saturating_sub(1), self.height.saturating_sub(1))
    }

    /// The tile `dc` columns and `dr` rows from the origin, computed wide.
    fn tile_at(&self, dc: u32, dr: u32) -> TileCoord {
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        TileCoord::new(
            clamp(self.origin.col as i64 + dc as i64),
            clamp(self.origin.row as i64 + dr as i64),
        )
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        let max = self.max();
        tile.col >= self.origin.col
            && tile.row >= self.origin.row
            && tile.col <= max.col
            && tile.row <= max.row
    }

    /// Every covered tile, row by row.
    pub fn tiles(self) -> impl Iterator<Item = TileCoord> {
        (0..self.height).flat_map(move |dr| (0..self.width).map(move |dc| self.tile_at(dc, dr)))
    }

    /// Center of the rect in doubled tile units, so odd and even sizes stay
    /// integral. A 1x1 rect at (c, r) has center (2c, 2r).
    pub fn center_doubled(&self) -> (i64, i64) {
        (
            2 * self.origin.col as i64 + self.width as i64 - 1,
            2 * self.origin.row as i64 + self.height as i64 - 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_tile_floors_per_axis() {
        let grid = GridMapper::new(64);
        assert_eq!(grid.to_tile(0.0, 0.0), TileCoord::new(0, 0));
        assert_eq!(grid.to_tile(63.9, 64.0), TileCoord::new(0, 1));
        assert_eq!(grid.to_tile(200.0, 230.5), TileCoord::new(3, 3));
    }

    #[test]
    fn to_tile_negative_world_yields_negative_tile() {
        let grid = GridMapper::new(64);
        assert_eq!(grid.to_tile(-1.0, -64.0), TileCoord::new(-1, -1));
        assert_eq!(grid.to_tile(-64.5, 10.0), TileCoord::new(-2, 0));
    }

    #[test]
    fn world_center_maps_back_to_same_tile() {
        let grid = GridMapper::new(64);
        let tile = TileCoord::new(3, 7);
        let (x, y) = grid.to_world_center(tile);
        assert_eq!((x, y), (224.0, 480.0));
        assert_eq!(grid.to_tile(x, y), tile);
    }

    #[test]
    fn zero_tile_size_is_clamped() {
        let grid = GridMapper::new(0);
        assert_eq!(grid.tile_size(), 1);
        assert_eq!(grid.to_tile(5.5, 2.0), TileCoord::new(5, 2));
    }

    #[test]
    fn from_corners_normalizes_drag_direction() {
        let forward = TileRect::from_corners(TileCoord::new(1, 1), TileCoord::new(2, 3));
        let backward = TileRect::from_corners(TileCoord::new(2, 3), TileCoord::new(1, 1));
        let mixed = TileRect::from_corners(TileCoord::new(2, 1), TileCoord::new(1, 3));
        assert_eq!(forward, backward);
        assert_eq!(forward, mixed);
        assert_eq!(forward.origin, TileCoord::new(1, 1));
        assert_eq!((forward.width, forward.height), (2, 3));
        assert_eq!(forward.area(), 6);
    }

    #[test]
    fn tiles_cover_rect_exactly_once() {
        let rect = TileRect::from_corners(TileCoord::new(1, 1), TileCoord::new(2, 3));
        let tiles: Vec<_> = rect.tiles().collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], TileCoord::new(1, 1));
        assert_eq!(tiles[5], TileCoord::new(2, 3));
        assert!(tiles.iter().all(|t| rect.contains(*t)));
        assert!(!rect.contains(TileCoord::new(3, 1)));
        assert!(!rect.contains(TileCoord::new(0, 2)));
    }

    #[test]
    fn corners_at_the_ends_of_the_coordinate_range() {
        let low = TileCoord::new(i32::MIN, 0);
        let high = TileCoord::new(i32::MAX, 0);
        let rect = TileRect::from_corners(high, low);
        assert_eq!(rect.origin, low);
        assert_eq!(rect.width, u32::MAX);
        assert_eq!(rect.height, 1);
        assert!(rect.contains(TileCoord::new(0, 0)));
        assert!(rect.max().col < i32::MAX);

        let corner = TileCoord::new(i32::MAX, i32::MAX);
        let edge = TileRect::from_corners(TileCoord::new(i32::MAX - 1, i32::MAX), corner);
        assert_eq!(edge.max(), corner);
        let tiles: Vec<_> = edge.tiles().collect();
        assert_eq!(tiles, vec![TileCoord::new(i32::MAX - 1, i32::MAX), corner]);
    }

    #[test]
    fn far_pointer_maps_to_saturated_tile() {
        let grid = GridMapper::new(64);
        assert_eq!(grid.to_tile(3.0e12, -3.0e12), TileCoord::new(i32::MAX, i32::MIN));
        let corner = TileCoord::new(i32::MAX, i32::MIN);
        assert_eq!(corner.offset(1, -1), corner);
    }

    #[test]
    fn bounding_of_scattered_tiles() {
        let rect = TileRect::bounding(&[
            TileCoord::new(4, 2),
            TileCoord::new(1, 5),
            TileCoord::new(3, 3),
        ])
        .unwrap();
        assert_eq!(rect.origin, TileCoord::new(1, 2));
        assert_eq!(rect.max(), TileCoord::new(4, 5));
        assert!(TileRect::bounding(&[]).is_none());
    }

    #[test]
    fn center_doubled_handles_odd_and_even_sizes() {
        assert_eq!(TileRect::single(TileCoord::new(3, 4)).center_doubled(), (6, 8));
        let two_by_two = TileRect::new(TileCoord::new(0, 0), Footprint::new(2, 2));
        // Center sits on the shared corner at (0.5, 0.5).
        assert_eq!(two_by_two.center_doubled(), (1, 1));
    }

    #[test]
    fn rect_to_world_scales_by_tile_size() {
        let grid = GridMapper::new(32);
        let rect = TileRect::new(TileCoord::new(2, 1), Footprint::new(3, 2));
        assert_eq!(grid.rect_to_world(rect), (64.0, 32.0, 96.0, 64.0));
    }
}
