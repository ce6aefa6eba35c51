// Core types shared across the placement core.
//
// Defines tile coordinates (`TileCoord`), footprints, compact entity
// identifiers, and the data-driven enums (structure kinds, terrain features,
// resources, worker units). All types derive `Serialize` and `Deserialize`
// for save/load and for the JSON game config.
//
// Tile lookups are keyed by the `TileCoord` value itself (structural
// equality and hashing), never by formatted strings.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position on the tile grid.
///
/// - col: east (positive) / west (negative)
/// - row: south (positive) / north (negative)
///
/// Components are signed so that the grid mapper can represent pointer
/// positions left of or above the map. Those coordinates are never valid
/// placement targets; the validator rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Shift by a delta. Saturates at the `i32` range instead of wrapping.
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self::new(self.col.saturating_add(dcol), self.row.saturating_add(drow))
    }

    /// The four edge-sharing neighbors, in N, E, S, W order.
    pub fn edge_neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Size of a structure in tiles. Both sides are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const SINGLE: Footprint = Footprint::new(1, 1);

    /// Create a footprint. Zero sides are clamped to 1.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Compact IDs: monotonically allocated by their owning registry.
// ---------------------------------------------------------------------------

macro_rules! compact_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

compact_id!(/// Identifier of a placed structure in the occupancy index.
EntryId);
compact_id!(/// Identifier of a job on the job board.
JobId);

// ---------------------------------------------------------------------------
// Data-driven enums
// ---------------------------------------------------------------------------

/// Every kind of structure the player can place. Behavior differences live
/// in `StructureDefinition` data, not in per-kind code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    SolarPanel,
    Habitat,
    Farm,
    MiningStation,
    WaterExtractor,
    Warehouse,
    LandingPad,
    RobotFactory,
    DroneHub,
}

impl StructureKind {
    pub const ALL: [StructureKind; 9] = [
        StructureKind::SolarPanel,
        StructureKind::Habitat,
        StructureKind::Farm,
        StructureKind::MiningStation,
        StructureKind::WaterExtractor,
        StructureKind::Warehouse,
        StructureKind::LandingPad,
        StructureKind::RobotFactory,
        StructureKind::DroneHub,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StructureKind::SolarPanel => "solar-panel",
            StructureKind::Habitat => "habitat",
            StructureKind::Farm => "farm",
            StructureKind::MiningStation => "mining-station",
            StructureKind::WaterExtractor => "water-extractor",
            StructureKind::Warehouse => "warehouse",
            StructureKind::LandingPad => "landing-pad",
            StructureKind::RobotFactory => "robot-factory",
            StructureKind::DroneHub => "drone-hub",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tile-level terrain features that some structures require underneath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerrainFeature {
    IceDeposit,
    OreDeposit,
    FertileSoil,
}

impl TerrainFeature {
    /// Bit used for this feature in the terrain map's per-tile mask.
    pub(crate) const fn bit(self) -> u8 {
        match self {
            TerrainFeature::IceDeposit => 1 << 0,
            TerrainFeature::OreDeposit => 1 << 1,
            TerrainFeature::FertileSoil => 1 << 2,
        }
    }
}

impl fmt::Display for TerrainFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TerrainFeature::IceDeposit => "ice-deposit",
            TerrainFeature::OreDeposit => "ore-deposit",
            TerrainFeature::FertileSoil => "fertile-soil",
        })
    }
}

/// Stockpiled resources that structures cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Iron,
    Copper,
    Silicon,
    Water,
    Food,
    Energy,
}

/// Autonomous worker units that pull jobs from the job board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Robot,
    Drone,
    Starship,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_neighbors_are_north_east_south_west() {
        let t = TileCoord::new(3, 3);
        assert_eq!(
            t.edge_neighbors(),
            [
                TileCoord::new(3, 2),
                TileCoord::new(4, 3),
                TileCoord::new(3, 4),
                TileCoord::new(2, 3),
            ]
        );
    }

    #[test]
    fn footprint_clamps_zero_sides() {
        let fp = Footprint::new(0, 3);
        assert_eq!(fp.width, 1);
        assert_eq!(fp.height, 3);
        assert_eq!(fp.area(), 3);
    }

    #[test]
    fn tile_coord_usable_as_hash_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TileCoord::new(1, 2), "a");
        assert_eq!(map.get(&TileCoord::new(1, 2)), Some(&"a"));
        assert_eq!(map.get(&TileCoord::new(2, 1)), None);
    }

    #[test]
    fn structure_kind_serializes_as_kebab_name() {
        for kind in StructureKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn compact_id_serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&EntryId(7)).unwrap(), "7");
        assert_eq!(EntryId(7).to_string(), "EntryId(7)");
    }

    #[test]
    fn terrain_feature_bits_are_distinct() {
        let bits = [
            TerrainFeature::IceDeposit.bit(),
            TerrainFeature::OreDeposit.bit(),
            TerrainFeature::FertileSoil.bit(),
        ];
        assert_eq!(bits[0] & bits[1], 0);
        assert_eq!(bits[1] & bits[2], 0);
        assert_eq!(bits[0] & bits[2], 0);
    }
}
