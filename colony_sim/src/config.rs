// Data-driven game configuration.
//
// All tunable placement parameters live here in `GameConfig`, loaded from
// JSON at startup: tile edge length, map size, the input settle window,
// demolition refund rate, starting stockpile, terrain deposits, and the
// structure catalog. The core never uses magic numbers for these; it reads
// them from the config. Missing fields fall back to `GameConfig::default()`,
// so a host config only has to list what it changes.
//
// Terrain is described as a list of rectangular `DepositPatch`es that
// `build_terrain()` paints onto a fresh `TerrainMap`.
//
// See also: `colony.rs` which owns the `GameConfig`, `structure.rs` for
// `StructureDefinition` and the stock catalog, `terrain.rs` for the map the
// deposits are painted on.

use crate::grid::{GridMapper, TileRect};
use crate::ledger::Costs;
use crate::structure::{StructureCatalog, StructureDefinition, stock_catalog};
use crate::terrain::TerrainMap;
use crate::types::{Footprint, ResourceKind, StructureKind, TerrainFeature, TileCoord};
use serde::{Deserialize, Serialize};

/// A rectangle of one terrain feature painted at map creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositPatch {
    pub feature: TerrainFeature,
    pub origin: TileCoord,
    pub width: u32,
    pub height: u32,
}

impl DepositPatch {
    pub fn rect(&self) -> TileRect {
        TileRect::new(self.origin, Footprint::new(self.width, self.height))
    }
}

/// Top-level game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile edge length in world pixels.
    pub tile_size: u32,

    /// Map size in tiles, (width, height).
    pub map_size: (u32, u32),

    /// Polls after arming a placement during which presses are ignored, so
    /// the click that picked the structure is not read as a placement.
    pub settle_polls: u32,

    /// Percentage of a structure's cost returned on demolition (floored).
    pub demolish_refund_percent: u32,

    /// Inventory at the start of a new colony.
    pub starting_resources: Costs,

    /// Terrain feature rectangles painted onto the map.
    pub deposits: Vec<DepositPatch>,

    /// Every placeable structure, keyed by kind.
    pub structures: StructureCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        let deposits = vec![
            DepositPatch {
                feature: TerrainFeature::IceDeposit,
                origin: TileCoord::new(8, 40),
                width: 6,
                height: 4,
            },
            DepositPatch {
                feature: TerrainFeature::OreDeposit,
                origin: TileCoord::new(36, 10),
                width: 12,
                height: 8,
            },
            DepositPatch {
                feature: TerrainFeature::FertileSoil,
                origin: TileCoord::new(20, 24),
                width: 10,
                height: 10,
            },
        ];

        let starting_resources = Costs::from([
            (ResourceKind::Iron, 500),
            (ResourceKind::Copper, 200),
            (ResourceKind::Silicon, 100),
            (ResourceKind::Water, 100),
        ]);

        Self {
            tile_size: 64,
            map_size: (64, 64),
            settle_polls: 12,
            demolish_refund_percent: 50,
            starting_resources,
            deposits,
            structures: stock_catalog(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn grid(&self) -> GridMapper {
        GridMapper::new(self.tile_size)
    }

    pub fn definition(&self, kind: StructureKind) -> Option<&StructureDefinition> {
        self.structures.get(&kind)
    }

    /// A terrain map of `map_size` with every deposit painted on it.
    pub fn build_terrain(&self) -> TerrainMap {
        let (width, height) = self.map_size;
        let mut terrain = TerrainMap::new(width, height);
        for patch in &self.deposits {
            terrain.paint(patch.rect(), patch.feature);
        }
        terrain
    }
}
