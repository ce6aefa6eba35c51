// Occupancy index: which placed structure owns which tile.
//
// The index has two halves:
//
// - `entries`: every placed structure (`OccupancyEntry`), keyed by a
//   monotonically allocated `EntryId`. BTreeMap, so iteration order is the
//   placement order. This is the serialized truth.
// - `tiles`: a hash map from each covered `TileCoord` to the owning
//   `EntryId`, giving O(1) point queries. It is derived data, skipped by
//   serde and rebuilt with `rebuild_tile_map()` after loading.
//
// ## Invariants
//
// - At most one entry claims any tile.
// - `insert()` checks every covered tile before touching either map, so an
//   insert either registers the whole footprint or nothing at all.
// - `remove()` frees every tile of the owning entry, not just the one asked
//   about. Removing a free tile is a no-op.
//
// Exclusion zones are not enforced here; they are a validator concern. The
// index only guarantees tile exclusivity.
//
// See also: `validator.rs` which reads the index, `session.rs` whose commit
// step is the only writer during play, `colony.rs` for demolition.

use crate::error::PlacementError;
use crate::grid::TileRect;
use crate::types::{EntryId, Footprint, StructureKind, TileCoord};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A placed structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyEntry {
    pub id: EntryId,
    pub kind: StructureKind,
    /// Min corner of the covered rectangle.
    pub origin: TileCoord,
    pub footprint: Footprint,
    /// Poll count at which the placement was committed.
    pub created_tick: u64,
}

impl OccupancyEntry {
    pub fn rect(&self) -> TileRect {
        TileRect::new(self.origin, self.footprint)
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Tile -> structure map with point, range and adjacency queries.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OccupancyIndex {
    entries: BTreeMap<EntryId, OccupancyEntry>,
    next_id: u64,
    /// Derived from `entries`. Rebuilt after deserialization.
    #[serde(skip)]
    tiles: FxHashMap<TileCoord, EntryId>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry covering a tile, if any.
    pub fn query(&self, tile: TileCoord) -> Option<&OccupancyEntry> {
        self.tiles.get(&tile).and_then(|id| self.entries.get(id))
    }

    pub fn is_occupied(&self, tile: TileCoord) -> bool {
        self.tiles.contains_key(&tile)
    }

    /// Whether any tile of the rect is occupied.
    pub fn query_range(&self, rect: TileRect) -> bool {
        self.first_conflict(rect).is_some()
    }

    /// The first occupied tile of the rect (row-major) and its owner.
    pub fn first_conflict(&self, rect: TileRect) -> Option<(TileCoord, EntryId)> {
        rect.tiles()
            .find_map(|tile| self.tiles.get(&tile).map(|&id| (tile, id)))
    }

    /// Register a new structure over `rect`.
    ///
    /// Fails with `TileOccupied` naming the first conflicting tile if any
    /// covered tile is taken; in that case the index is left untouched.
    pub fn insert(
        &mut self,
        kind: StructureKind,
        rect: TileRect,
        created_tick: u64,
    ) -> Result<OccupancyEntry, PlacementError> {
        if let Some((tile, occupant)) = self.first_conflict(rect) {
            return Err(PlacementError::TileOccupied { tile, occupant });
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        let entry = OccupancyEntry {
            id,
            kind,
            origin: rect.origin,
            footprint: rect.footprint(),
            created_tick,
        };
        for tile in rect.tiles() {
            self.tiles.insert(tile, id);
        }
        self.entries.insert(id, entry);
        Ok(entry)
    }

    /// Remove the entry covering `tile` and free all of its tiles.
    /// Returns `None` (and does nothing) if the tile is free.
    pub fn remove(&mut self, tile: TileCoord) -> Option<OccupancyEntry> {
        let id = *self.tiles.get(&tile)?;
        self.remove_entry(id)
    }

    /// Remove an entry by id and free all of its tiles.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<OccupancyEntry> {
        let entry = self.entries.remove(&id)?;
        for tile in entry.rect().tiles() {
            self.tiles.remove(&tile);
        }
        Some(entry)
    }

    /// An entry of `kind` sharing an edge with `tile`, checking neighbors in
    /// N, E, S, W order. The entry covering `tile` itself is never returned.
    pub fn find_adjacent(&self, tile: TileCoord, kind: StructureKind) -> Option<&OccupancyEntry> {
        let own = self.tiles.get(&tile).copied();
        tile.edge_neighbors().into_iter().find_map(|n| {
            self.query(n)
                .filter(|e| e.kind == kind && Some(e.id) != own)
        })
    }

    /// An entry of `kind` sharing an edge with any border tile of `rect`.
    /// Tiles inside the rect are ignored, so a candidate never finds itself.
    pub fn find_adjacent_to_rect(
        &self,
        rect: TileRect,
        kind: StructureKind,
    ) -> Option<&OccupancyEntry> {
        rect.tiles().find_map(|tile| {
            tile.edge_neighbors()
                .into_iter()
                .filter(|n| !rect.contains(*n))
                .find_map(|n| self.query(n).filter(|e| e.kind == kind))
        })
    }

    pub fn get(&self, id: EntryId) -> Option<&OccupancyEntry> {
        self.entries.get(&id)
    }

    /// All entries in placement order.
    pub fn entries(&self) -> impl Iterator<Item = &OccupancyEntry> {
        self.entries.values()
    }

    pub fn entries_of_kind(&self, kind: StructureKind) -> impl Iterator<Item = &OccupancyEntry> {
        self.entries.values().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tiles currently claimed.
    pub fn occupied_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Recompute the tile map from the entries (after deserialization).
    pub fn rebuild_tile_map(&mut self) {
        self.tiles.clear();
        for entry in self.entries.values() {
            for tile in entry.rect().tiles() {
                self.tiles.insert(tile, entry.id);
            }
        }
    }
}
