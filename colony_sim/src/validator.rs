// Placement validation.
//
// `PlacementValidator` borrows the terrain map and the occupancy index and
// answers one question: may a structure with this `PlacementRequirement`
// cover exactly these tiles? It runs every poll while a placement is armed,
// so it is side-effect free and cheap.
//
// The checks run in a fixed order and the first failure wins:
//
//   1. The candidate must not be empty.
//   2. Every tile must be on the map.
//   3. No tile may be occupied.
//   4. If a terrain feature is required, every tile must carry it.
//   5. If an exclusion zone is set, no existing entry of an excluded kind
//      may have its center closer than `radius` tiles to the candidate's
//      center.
//
// Validation is a pure conjunction: one bad tile invalidates a whole
// dragged rectangle.
//
// ## Exclusion boundary
//
// Distances are Euclidean between footprint centers, computed exactly in
// doubled integer tile units (`TileRect::center_doubled`). A placement is
// rejected only when the distance is strictly less than the radius, so two
// mining stations with radius 3 may sit exactly 3 tiles apart: their zones
// touch but do not overlap. Tile adjacency alone never trips the zone check
// unless the centers are actually within the radius.
//
// See also: `structure.rs` for `PlacementRequirement`, `session.rs` which
// calls the validator every poll and again at commit.

use crate::error::PlacementError;
use crate::grid::TileRect;
use crate::occupancy::OccupancyIndex;
use crate::structure::{ExclusionZone, PlacementRequirement};
use crate::terrain::TerrainMap;
use crate::types::TileCoord;

/// Read-only view over the state a placement is checked against.
#[derive(Clone, Copy, Debug)]
pub struct PlacementValidator<'a> {
    terrain: &'a TerrainMap,
    occupancy: &'a OccupancyIndex,
}

impl<'a> PlacementValidator<'a> {
    pub fn new(terrain: &'a TerrainMap, occupancy: &'a OccupancyIndex) -> Self {
        Self { terrain, occupancy }
    }

    /// Check a candidate tile set, reporting the first failed rule.
    pub fn check(
        &self,
        tiles: &[TileCoord],
        requirement: &PlacementRequirement,
    ) -> Result<(), PlacementError> {
        let bounds = TileRect::bounding(tiles).ok_or(PlacementError::EmptyCandidate)?;

        if let Some(&tile) = tiles.iter().find(|&&t| !self.terrain.in_bounds(t)) {
            return Err(PlacementError::OutOfBounds { tile });
        }

        self.check_on_map(bounds, || tiles.iter().copied(), requirement)
    }

    pub fn is_valid(&self, tiles: &[TileCoord], requirement: &PlacementRequirement) -> bool {
        self.check(tiles, requirement).is_ok()
    }

    /// Check every tile of a rect. Same result as `check` over
    /// `rect.tiles()`, but the bounds rule looks only at the corners, so a
    /// rect reaching far off the map is rejected without visiting its tiles.
    pub fn check_rect(
        &self,
        rect: TileRect,
        requirement: &PlacementRequirement,
    ) -> Result<(), PlacementError> {
        if let Some(tile) = self.first_off_map(rect) {
            return Err(PlacementError::OutOfBounds { tile });
        }
        self.check_on_map(rect, || rect.tiles(), requirement)
    }

    pub fn is_valid_rect(&self, rect: TileRect, requirement: &PlacementRequirement) -> bool {
        self.check_rect(rect, requirement).is_ok()
    }

    /// The first tile of `rect` in row order that lies off the map.
    fn first_off_map(&self, rect: TileRect) -> Option<TileCoord> {
        let origin = rect.origin;
        if !self.terrain.in_bounds(origin) {
            return Some(origin);
        }
        // The origin is on the map, so both limits fit in an i32 here.
        let max = rect.max();
        if max.col as i64 >= self.terrain.width as i64 {
            return Some(TileCoord::new(self.terrain.width as i32, origin.row));
        }
        if max.row as i64 >= self.terrain.height as i64 {
            return Some(TileCoord::new(origin.col, self.terrain.height as i32));
        }
        None
    }

    /// Rules 3 to 5 for tiles already known to be on the map. `tiles` is
    /// called once per rule so the candidate is never collected.
    fn check_on_map<I>(
        &self,
        bounds: TileRect,
        tiles: impl Fn() -> I,
        requirement: &PlacementRequirement,
    ) -> Result<(), PlacementError>
    where
        I: Iterator<Item = TileCoord>,
    {
        for tile in tiles() {
            if let Some(entry) = self.occupancy.query(tile) {
                return Err(PlacementError::TileOccupied {
                    tile,
                    occupant: entry.id,
                });
            }
        }

        if let Some(feature) = requirement.terrain {
            if let Some(tile) = tiles().find(|&t| !self.terrain.has_feature(t, feature)) {
                return Err(PlacementError::MissingTerrain { tile, feature });
            }
        }

        if let Some(zone) = &requirement.exclusion {
            self.check_exclusion(bounds, zone)?;
        }

        Ok(())
    }

    fn check_exclusion(&self, candidate: TileRect, zone: &ExclusionZone) -> Result<(), PlacementError> {
        let (cx, cy) = candidate.center_doubled();
        let limit = 2 * zone.radius as i64;
        let limit_sq = limit * limit;

        for entry in self.occupancy.entries() {
            if !zone.applies_to(entry.kind) {
                continue;
            }
            let (ex, ey) = entry.rect().center_doubled();
            let (dx, dy) = (ex - cx, ey - cy);
            if dx * dx + dy * dy < limit_sq {
                return Err(PlacementError::ExclusionZone {
                    entry: entry.id,
                    kind: entry.kind,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Footprint, StructureKind, TerrainFeature};

    fn mining_zone(radius: u32) -> PlacementRequirement {
        PlacementRequirement {
            terrain: None,
            exclusion: Some(ExclusionZone {
                radius,
                kinds: vec![StructureKind::MiningStation],
            }),
        }
    }

    fn station_at(index: &mut OccupancyIndex, col: i32, row: i32) {
        index
            .insert(
                StructureKind::MiningStation,
                TileRect::single(TileCoord::new(col, row)),
                0,
            )
            .unwrap();
    }

    #[test]
    fn free_in_bounds_tile_is_valid() {
        let terrain = TerrainMap::new(10, 10);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        assert!(v.is_valid(&[TileCoord::new(3, 3)], &PlacementRequirement::none()));
    }

    #[test]
    fn occupied_tile_is_invalid_for_any_requirement() {
        let mut terrain = TerrainMap::new(10, 10);
        terrain.add_feature(TileCoord::new(4, 4), TerrainFeature::IceDeposit);
        let mut index = OccupancyIndex::new();
        index
            .insert(StructureKind::SolarPanel, TileRect::single(TileCoord::new(4, 4)), 0)
            .unwrap();
        let v = PlacementValidator::new(&terrain, &index);
        let t = [TileCoord::new(4, 4)];
        assert!(!v.is_valid(&t, &PlacementRequirement::none()));
        assert!(!v.is_valid(
            &t,
            &PlacementRequirement {
                terrain: Some(TerrainFeature::IceDeposit),
                exclusion: None,
            }
        ));
        assert!(!v.is_valid(&t, &mining_zone(0)));
    }

    #[test]
    fn out_of_bounds_wins_over_other_failures() {
        let terrain = TerrainMap::new(10, 10);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        let req = PlacementRequirement {
            terrain: Some(TerrainFeature::OreDeposit),
            exclusion: None,
        };
        assert_eq!(
            v.check(&[TileCoord::new(9, 9), TileCoord::new(10, 9)], &req),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(10, 9)
            })
        );
        assert_eq!(
            v.check(&[TileCoord::new(-1, 0)], &PlacementRequirement::none()),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(-1, 0)
            })
        );
    }

    #[test]
    fn rect_reaching_far_off_map_fails_at_its_origin() {
        let terrain = TerrainMap::new(10, 10);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        let huge = TileRect::from_corners(TileCoord::new(-4999, -4999), TileCoord::new(0, 0));
        assert_eq!(
            v.check_rect(huge, &PlacementRequirement::none()),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(-4999, -4999)
            })
        );

        let whole_range =
            TileRect::from_corners(TileCoord::new(3, 3), TileCoord::new(i32::MAX, i32::MIN));
        assert_eq!(
            v.check_rect(whole_range, &PlacementRequirement::none()),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(3, i32::MIN)
            })
        );
    }

    #[test]
    fn rect_bounds_failure_matches_the_tile_by_tile_check() {
        let terrain = TerrainMap::new(10, 10);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        let req = PlacementRequirement::none();
        let rects = [
            // Past the right edge.
            TileRect::new(TileCoord::new(8, 2), Footprint::new(4, 3)),
            // Past the bottom edge.
            TileRect::new(TileCoord::new(2, 8), Footprint::new(3, 4)),
            // Both.
            TileRect::new(TileCoord::new(9, 9), Footprint::new(2, 2)),
            TileRect::new(TileCoord::new(0, 0), Footprint::new(10, 10)),
        ];
        for rect in rects {
            let tiles: Vec<TileCoord> = rect.tiles().collect();
            assert_eq!(v.check_rect(rect, &req), v.check(&tiles, &req), "{rect:?}");
        }
        assert_eq!(
            v.check_rect(rects[0], &req),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(10, 2)
            })
        );
        assert_eq!(
            v.check_rect(rects[1], &req),
            Err(PlacementError::OutOfBounds {
                tile: TileCoord::new(2, 10)
            })
        );
        assert!(v.is_valid_rect(rects[3], &req));
    }

    #[test]
    fn empty_candidate_is_invalid() {
        let terrain = TerrainMap::new(10, 10);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        assert_eq!(
            v.check(&[], &PlacementRequirement::none()),
            Err(PlacementError::EmptyCandidate)
        );
    }

    #[test]
    fn terrain_precondition_must_hold_on_every_tile() {
        let mut terrain = TerrainMap::new(10, 10);
        let rect = TileRect::new(TileCoord::new(2, 2), Footprint::new(2, 2));
        terrain.paint(rect, TerrainFeature::FertileSoil);
        terrain.clear_feature(TileCoord::new(3, 3), TerrainFeature::FertileSoil);
        let index = OccupancyIndex::new();
        let v = PlacementValidator::new(&terrain, &index);
        let req = PlacementRequirement {
            terrain: Some(TerrainFeature::FertileSoil),
            exclusion: None,
        };
        assert_eq!(
            v.check_rect(rect, &req),
            Err(PlacementError::MissingTerrain {
                tile: TileCoord::new(3, 3),
                feature: TerrainFeature::FertileSoil,
            })
        );
        assert!(v.is_valid_rect(TileRect::new(TileCoord::new(2, 2), Footprint::new(2, 1)), &req));
    }

    #[test]
    fn exclusion_zone_rejects_strictly_inside_radius() {
        let terrain = TerrainMap::new(20, 20);
        let mut index = OccupancyIndex::new();
        station_at(&mut index, 5, 5);
        let v = PlacementValidator::new(&terrain, &index);
        let req = mining_zone(3);

        // Two tiles away: inside the zone even though no tile overlaps.
        assert!(matches!(
            v.check(&[TileCoord::new(7, 5)], &req),
            Err(PlacementError::ExclusionZone { .. })
        ));
        // Diagonal (2,2) is ~2.83 tiles away.
        assert!(!v.is_valid(&[TileCoord::new(7, 7)], &req));
        // Exactly on the radius is allowed.
        assert!(v.is_valid(&[TileCoord::new(8, 5)], &req));
        // (3,1) is ~3.16 tiles away.
        assert!(v.is_valid(&[TileCoord::new(8, 6)], &req));
        assert!(v.is_valid(&[TileCoord::new(9, 5)], &req));
    }

    #[test]
    fn exclusion_zone_ignores_other_kinds() {
        let terrain = TerrainMap::new(20, 20);
        let mut index = OccupancyIndex::new();
        index
            .insert(StructureKind::Habitat, TileRect::single(TileCoord::new(5, 5)), 0)
            .unwrap();
        let v = PlacementValidator::new(&terrain, &index);
        // Adjacent to a habitat is fine for a mining station.
        assert!(v.is_valid(&[TileCoord::new(6, 5)], &mining_zone(3)));
    }

    #[test]
    fn exclusion_uses_footprint_centers() {
        let terrain = TerrainMap::new(20, 20);
        let mut index = OccupancyIndex::new();
        // 2x2 station centered at (5.5, 5.5).
        index
            .insert(
                StructureKind::MiningStation,
                TileRect::new(TileCoord::new(5, 5), Footprint::new(2, 2)),
                0,
            )
            .unwrap();
        let v = PlacementValidator::new(&terrain, &index);
        let req = mining_zone(2);
        // 2x2 candidate at (7,5) is centered at (7.5, 5.5): exactly 2 away.
        let touching = TileRect::new(TileCoord::new(7, 5), Footprint::new(2, 2));
        assert!(v.is_valid_rect(touching, &req));
        // Single tile at (7,5) is centered 1.58 away.
        assert!(!v.is_valid(&[TileCoord::new(7, 5)], &req));
    }
}
