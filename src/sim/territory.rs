use std::collections::BTreeMap;

/// Who owns a tile. Tribes and countries share one ownership space so
/// disjointness can be enforced in a single place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Owner {
    Tribe(u64),
    Country(u64),
}

/// The central tile-ownership index.
///
/// Every territory mutation in the simulation goes through here, which is
/// what makes the disjointness invariant checkable at the write site: a
/// claim of an owned tile or a release by a non-owner is a logic bug and
/// panics immediately rather than corrupting the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryIndex {
    owners: BTreeMap<(u32, u32), Owner>,
}

impl TerritoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_of(&self, tile: (u32, u32)) -> Option<Owner> {
        self.owners.get(&tile).copied()
    }

    pub fn is_free(&self, tile: (u32, u32)) -> bool {
        !self.owners.contains_key(&tile)
    }

    /// Claim an unowned tile.
    ///
    /// # Panics
    /// Panics if the tile already has an owner.
    pub fn claim(&mut self, tile: (u32, u32), owner: Owner) {
        let previous = self.owners.insert(tile, owner);
        assert!(
            previous.is_none(),
            "tile {tile:?} claimed by {owner:?} but already owned by {previous:?}"
        );
    }

    /// Non-panicking claim for rebuilding the index from untrusted input;
    /// returns false (and leaves the index unchanged) if the tile is taken.
    pub fn try_claim(&mut self, tile: (u32, u32), owner: Owner) -> bool {
        if self.owners.contains_key(&tile) {
            return false;
        }
        self.owners.insert(tile, owner);
        true
    }

    /// Release a tile held by `owner`.
    ///
    /// # Panics
    /// Panics if the tile is not owned by `owner`.
    pub fn release(&mut self, tile: (u32, u32), owner: Owner) {
        let previous = self.owners.remove(&tile);
        assert_eq!(
            previous,
            Some(owner),
            "tile {tile:?} released by {owner:?} but owned by {previous:?}"
        );
    }

    /// Move a tile between owners, e.g. conquest or tribe-to-country
    /// formation.
    ///
    /// # Panics
    /// Panics if the tile is not owned by `from`.
    pub fn transfer(&mut self, tile: (u32, u32), from: Owner, to: Owner) {
        let previous = self.owners.insert(tile, to);
        assert_eq!(
            previous,
            Some(from),
            "tile {tile:?} transferred from {from:?} but owned by {previous:?}"
        );
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
