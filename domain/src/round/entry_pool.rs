//! Ordered pool of entries competing in a round

use super::entities::Entry;
use crate::core::error::AllocationError;
use crate::core::ids::EntryId;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// The entries of a round, ordered by id
///
/// Lookups by id map an entry to its position, which the reconciler uses to
/// keep per-entry tallies in plain vectors.
#[derive(Debug, Clone, Default)]
pub struct EntryPool {
    entries: Vec<Entry>,
    positions: HashMap<EntryId, usize>,
}

impl EntryPool {
    /// Build a pool, sorting by id and rejecting duplicates
    pub fn new(mut entries: Vec<Entry>) -> Result<Self, AllocationError> {
        entries.sort_by_key(|e| e.id);
        let mut positions = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if positions.insert(entry.id, i).is_some() {
                return Err(AllocationError::DataIntegrity(format!(
                    "duplicate entry {} in round",
                    entry.id
                )));
            }
        }
        Ok(Self { entries, positions })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Position of an entry in id order
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Produce a fresh random permutation of the entry ids
    pub fn shuffled_ids<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self.entries.iter().map(|e| e.id).collect();
        ids.shuffle(rng);
        ids
    }

    /// Check that `order` is a permutation of exactly this pool
    pub fn validate_order(&self, order: &[EntryId]) -> Result<(), AllocationError> {
        if order.len() != self.entries.len() {
            return Err(AllocationError::DataIntegrity(format!(
                "shuffle order covers {} entries, round has {}",
                order.len(),
                self.entries.len()
            )));
        }
        let mut seen = vec![false; self.entries.len()];
        for id in order {
            let pos = self.position(*id).ok_or_else(|| {
                AllocationError::DataIntegrity(format!("shuffle order references unknown {}", id))
            })?;
            if std::mem::replace(&mut seen[pos], true) {
                return Err(AllocationError::DataIntegrity(format!(
                    "shuffle order lists {} twice",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::RoundId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(ids: &[u64]) -> EntryPool {
        EntryPool::new(
            ids.iter()
                .map(|i| Entry::new(EntryId(*i), RoundId(1), format!("File:{}.jpg", i)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sorted_by_id() {
        let pool = pool(&[30, 10, 20]);
        let ids: Vec<_> = pool.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntryId(10), EntryId(20), EntryId(30)]);
        assert_eq!(pool.position(EntryId(30)), Some(2));
        assert_eq!(pool.position(EntryId(99)), None);
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let entries = vec![
            Entry::new(EntryId(1), RoundId(1), "a"),
            Entry::new(EntryId(1), RoundId(1), "b"),
        ];
        assert!(matches!(
            EntryPool::new(entries),
            Err(AllocationError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_shuffle_is_reproducible_with_seed() {
        let pool = pool(&(1..=20).collect::<Vec<_>>());
        let a = pool.shuffled_ids(&mut StdRng::seed_from_u64(7));
        let b = pool.shuffled_ids(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        pool.validate_order(&a).unwrap();
    }

    #[test]
    fn test_validate_order_rejects_bad_permutations() {
        let pool = pool(&[1, 2, 3]);
        assert!(pool.validate_order(&[EntryId(1), EntryId(2)]).is_err());
        assert!(
            pool.validate_order(&[EntryId(1), EntryId(2), EntryId(2)])
                .is_err()
        );
        assert!(
            pool.validate_order(&[EntryId(1), EntryId(2), EntryId(4)])
                .is_err()
        );
        assert!(
            pool.validate_order(&[EntryId(3), EntryId(1), EntryId(2)])
                .is_ok()
        );
    }
}
