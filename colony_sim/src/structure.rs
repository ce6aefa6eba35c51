// Structure definitions: data-driven building configuration.
//
// Every placeable building is described by one `StructureDefinition`
// record, keyed by `StructureKind` in the game config's catalog. The
// validator, occupancy index and session treat all kinds alike and read the
// per-kind differences (footprint, cost, placement mode, terrain
// precondition, exclusion zone, jobs to post) from this data. There is no
// per-kind code path.
//
// ## Placement modes
//
// - `SingleTile`: the footprint is anchored at the hovered tile and placed
//   with a single press.
// - `RangeSelect`: the player drags a rectangle. The footprint is the
//   minimum selection size and the cost is charged per covered tile.
//
// ## Exclusion zones
//
// Area-effect structures (mining stations) list an exclusion radius and the
// kinds it applies to. The zone is checked against existing entries'
// centers independently of tile overlap; see `validator.rs` for the exact
// boundary rule.
//
// See also: `config.rs` where the catalog lives, `validator.rs` for how a
// `PlacementRequirement` is enforced, `job.rs` for `JobKind`.

use crate::grid::TileRect;
use crate::job::JobKind;
use crate::ledger::{Costs, scale_costs};
use crate::types::{Footprint, ResourceKind, StructureKind, TerrainFeature, TileCoord, UnitKind};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// The structure catalog. BTreeMap for stable iteration and JSON output.
pub type StructureCatalog = BTreeMap<StructureKind, StructureDefinition>;

/// How the player chooses where a structure goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementMode {
    SingleTile,
    RangeSelect,
}

/// No entry of the listed kinds may have its center within `radius` tiles
/// of the candidate's center.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionZone {
    pub radius: u32,
    pub kinds: Vec<StructureKind>,
}

impl ExclusionZone {
    pub fn applies_to(&self, kind: StructureKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Predicates a candidate location must satisfy beyond being on the map
/// and unoccupied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequirement {
    /// Every covered tile must carry this feature.
    #[serde(default)]
    pub terrain: Option<TerrainFeature>,
    #[serde(default)]
    pub exclusion: Option<ExclusionZone>,
}

impl PlacementRequirement {
    pub fn none() -> Self {
        Self::default()
    }
}

/// A job posted when the structure is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTemplate {
    pub kind: JobKind,
    #[serde(default)]
    pub unit: Option<UnitKind>,
}

/// Everything the placement core needs to know about one structure kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDefinition {
    pub kind: StructureKind,
    pub footprint: Footprint,
    /// Cost per placement (`SingleTile`) or per covered tile (`RangeSelect`).
    pub cost: Costs,
    pub placement: PlacementMode,
    #[serde(default)]
    pub requirement: PlacementRequirement,
    #[serde(default)]
    pub jobs: SmallVec<[JobTemplate; 2]>,
}

impl StructureDefinition {
    /// A free, unconstrained definition. Chain the `with_*` helpers to fill
    /// it in.
    pub fn new(kind: StructureKind, footprint: Footprint, placement: PlacementMode) -> Self {
        Self {
            kind,
            footprint,
            cost: Costs::new(),
            placement,
            requirement: PlacementRequirement::none(),
            jobs: SmallVec::new(),
        }
    }

    pub fn with_cost(mut self, resource: ResourceKind, amount: u64) -> Self {
        self.cost.insert(resource, amount);
        self
    }

    pub fn with_terrain(mut self, feature: TerrainFeature) -> Self {
        self.requirement.terrain = Some(feature);
        self
    }

    pub fn with_exclusion(mut self, radius: u32, kinds: &[StructureKind]) -> Self {
        self.requirement.exclusion = Some(ExclusionZone {
            radius,
            kinds: kinds.to_vec(),
        });
        self
    }

    pub fn with_job(mut self, kind: JobKind, unit: Option<UnitKind>) -> Self {
        self.jobs.push(JobTemplate { kind, unit });
        self
    }

    pub fn is_range_select(&self) -> bool {
        self.placement == PlacementMode::RangeSelect
    }

    /// The footprint anchored at a hovered tile.
    pub fn rect_at(&self, tile: TileCoord) -> TileRect {
        TileRect::new(tile, self.footprint)
    }

    /// Whether a dragged rect meets the minimum footprint.
    pub fn fits_minimum(&self, rect: TileRect) -> bool {
        rect.width >= self.footprint.width && rect.height >= self.footprint.height
    }

    /// What placing this structure over `rect` costs.
    pub fn cost_for(&self, rect: TileRect) -> Costs {
        match self.placement {
            PlacementMode::SingleTile => self.cost.clone(),
            PlacementMode::RangeSelect => scale_costs(&self.cost, rect.area()),
        }
    }
}

/// The catalog shipped with the game.
pub fn stock_catalog() -> StructureCatalog {
    use PlacementMode::{RangeSelect, SingleTile};
    use ResourceKind::*;

    let defs = [
        StructureDefinition::new(StructureKind::SolarPanel, Footprint::SINGLE, SingleTile)
            .with_cost(Iron, 10)
            .with_job(JobKind::Construct, Some(UnitKind::Robot)),
        StructureDefinition::new(StructureKind::Habitat, Footprint::SINGLE, RangeSelect)
            .with_cost(Iron, 5)
            .with_cost(Silicon, 2)
            .with_job(JobKind::Construct, Some(UnitKind::Robot)),
        StructureDefinition::new(StructureKind::Farm, Footprint::SINGLE, RangeSelect)
            .with_cost(Water, 2)
            .with_cost(Iron, 1)
            .with_terrain(TerrainFeature::FertileSoil)
            .with_job(JobKind::TendFarm, Some(UnitKind::Robot)),
        StructureDefinition::new(StructureKind::MiningStation, Footprint::SINGLE, SingleTile)
            .with_cost(Iron, 25)
            .with_cost(Copper, 10)
            .with_terrain(TerrainFeature::OreDeposit)
            .with_exclusion(3, &[StructureKind::MiningStation])
            .with_job(JobKind::Construct, Some(UnitKind::Robot))
            .with_job(JobKind::MineOre, Some(UnitKind::Robot)),
        StructureDefinition::new(StructureKind::WaterExtractor, Footprint::SINGLE, SingleTile)
            .with_cost(Iron, 15)
            .with_cost(Copper, 5)
            .with_terrain(TerrainFeature::IceDeposit)
            .with_job(JobKind::ExtractWater, Some(UnitKind::Drone)),
        StructureDefinition::new(StructureKind::Warehouse, Footprint::new(2, 2), SingleTile)
            .with_cost(Iron, 40)
            .with_job(JobKind::Construct, Some(UnitKind::Robot))
            .with_job(JobKind::HaulCargo, Some(UnitKind::Drone)),
        StructureDefinition::new(StructureKind::LandingPad, Footprint::new(3, 3), SingleTile)
            .with_cost(Iron, 60)
            .with_cost(Silicon, 10)
            .with_job(JobKind::Construct, Some(UnitKind::Robot))
            .with_job(JobKind::HaulCargo, Some(UnitKind::Starship)),
        StructureDefinition::new(StructureKind::RobotFactory, Footprint::new(2, 2), SingleTile)
            .with_cost(Iron, 50)
            .with_cost(Copper, 20)
            .with_cost(Silicon, 20)
            .with_job(JobKind::Construct, None),
        StructureDefinition::new(StructureKind::DroneHub, Footprint::new(2, 2), SingleTile)
            .with_cost(Iron, 30)
            .with_cost(Copper, 15)
            .with_cost(Silicon, 10)
            .with_job(JobKind::Construct, None),
    ];

    defs.into_iter().map(|d| (d.kind, d)).collect()
}
