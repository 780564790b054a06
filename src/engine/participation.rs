use std::collections::HashSet;

/// Campaign ids we have already joined. Membership here is what makes a
/// listing item "seen" during discovery.
#[derive(Debug, Clone, Default)]
pub struct ParticipationSet(HashSet<u64>);

impl ParticipationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: u64) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable ordering for persistence and assertions.
    pub fn to_sorted_vec(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.0.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_is_empty() {
        let set = ParticipationSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(1));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = ParticipationSet::new();
        assert!(set.insert(42));
        assert!(!set.insert(42));
        assert_eq!(set.len(), 1);
        assert!(set.contains(42));
    }

    #[test]
    fn test_from_ids_deduplicates() {
        let set = ParticipationSet::from_ids([3, 1, 3, 2]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_sorted_vec(), vec![1, 2, 3]);
    }
}
