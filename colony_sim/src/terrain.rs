// Dense 2D terrain grid for the colony map.
//
// The map is stored as a flat `Vec<u8>` of feature bitmasks indexed by
// `col + row * width`, giving O(1) read/write access. Each bit marks one
// `TerrainFeature` (ice deposit, ore deposit, fertile soil). Out-of-bounds
// reads return "no features"; out-of-bounds writes are no-ops.
//
// The terrain map is also the authority on map bounds: the validator asks
// `in_bounds()` before anything else.
//
// The map is built from the config's deposit patches (`ColonyState::new()`)
// and is serialized with the rest of the colony state.
//
// See also: `config.rs` for `DepositPatch`, `validator.rs` for the terrain
// precondition check, `colony.rs` which owns the `TerrainMap`.

use crate::grid::TileRect;
use crate::types::{TerrainFeature, TileCoord};
use serde::{Deserialize, Serialize};

/// Dense 2D grid of per-tile terrain feature masks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    /// Flat storage: index = col + row * width.
    tiles: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TerrainMap {
    /// Create a featureless map.
    pub fn new(width: u32, height: u32) -> Self {
        let total = (width as usize) * (height as usize);
        Self {
            tiles: vec![0; total],
            width,
            height,
        }
    }

    /// Check whether a tile is within the map.
    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.col >= 0
            && tile.row >= 0
            && (tile.col as u32) < self.width
            && (tile.row as u32) < self.height
    }

    /// Convert a tile to a flat index. Returns `None` if out of bounds.
    fn index(&self, tile: TileCoord) -> Option<usize> {
        if self.in_bounds(tile) {
            Some(tile.col as usize + tile.row as usize * self.width as usize)
        } else {
            None
        }
    }

    /// Whether the tile carries the given feature. `false` out of bounds.
    pub fn has_feature(&self, tile: TileCoord, feature: TerrainFeature) -> bool {
        self.index(tile)
            .is_some_and(|i| self.tiles[i] & feature.bit() != 0)
    }

    /// Add a feature to a tile. No-op out of bounds.
    pub fn add_feature(&mut self, tile: TileCoord, feature: TerrainFeature) {
        if let Some(i) = self.index(tile) {
            self.tiles[i] |= feature.bit();
        }
    }

    /// Remove a feature from a tile. No-op out of bounds.
    pub fn clear_feature(&mut self, tile: TileCoord, feature: TerrainFeature) {
        if let Some(i) = self.index(tile) {
            self.tiles[i] &= !feature.bit();
        }
    }

    /// Paint a feature over every in-bounds tile of a rect. Tiles falling
    /// off the map edge are skipped.
    pub fn paint(&mut self, rect: TileRect, feature: TerrainFeature) {
        for tile in rect.tiles() {
            self.add_feature(tile, feature);
        }
    }

    /// Number of in-bounds tiles carrying a feature.
    pub fn count_feature(&self, feature: TerrainFeature) -> usize {
        self.tiles.iter().filter(|&&m| m & feature.bit() != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Footprint;

    #[test]
    fn new_map_is_featureless() {
        let map = TerrainMap::new(10, 10);
        assert_eq!(map.count_feature(TerrainFeature::IceDeposit), 0);
        assert_eq!(map.count_feature(TerrainFeature::FertileSoil), 0);
        assert!(!map.has_feature(TileCoord::new(5, 5), TerrainFeature::OreDeposit));
    }

    #[test]
    fn bounds_checks_both_axes() {
        let map = TerrainMap::new(10, 4);
        assert!(map.in_bounds(TileCoord::new(0, 0)));
        assert!(map.in_bounds(TileCoord::new(9, 3)));
        assert!(!map.in_bounds(TileCoord::new(10, 0)));
        assert!(!map.in_bounds(TileCoord::new(0, 4)));
        assert!(!map.in_bounds(TileCoord::new(-1, 2)));
    }

    #[test]
    fn features_stack_and_clear_independently() {
        let mut map = TerrainMap::new(5, 5);
        let t = TileCoord::new(2, 2);
        map.add_feature(t, TerrainFeature::IceDeposit);
        map.add_feature(t, TerrainFeature::FertileSoil);
        assert!(map.has_feature(t, TerrainFeature::IceDeposit));
        assert!(map.has_feature(t, TerrainFeature::FertileSoil));
        assert!(!map.has_feature(t, TerrainFeature::OreDeposit));
        map.clear_feature(t, TerrainFeature::IceDeposit);
        assert!(!map.has_feature(t, TerrainFeature::IceDeposit));
        assert!(map.has_feature(t, TerrainFeature::FertileSoil));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut map = TerrainMap::new(3, 3);
        map.add_feature(TileCoord::new(-1, 0), TerrainFeature::OreDeposit);
        map.add_feature(TileCoord::new(3, 3), TerrainFeature::OreDeposit);
        assert_eq!(map.count_feature(TerrainFeature::OreDeposit), 0);
        assert!(!map.has_feature(TileCoord::new(-1, 0), TerrainFeature::OreDeposit));
    }

    #[test]
    fn paint_clips_to_map_edge() {
        let mut map = TerrainMap::new(4, 4);
        let rect = TileRect::new(TileCoord::new(2, 2), Footprint::new(5, 5));
        map.paint(rect, TerrainFeature::IceDeposit);
        // Only the 2x2 corner lies on the map.
        assert_eq!(map.count_feature(TerrainFeature::IceDeposit), 4);
        assert!(map.has_feature(TileCoord::new(3, 3), TerrainFeature::IceDeposit));
    }
}
