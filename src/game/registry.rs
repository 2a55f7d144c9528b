use super::constants::ID_WRAP;
use std::collections::BTreeMap;

/// Id-keyed entity store. Each registry owns its own id counter; ids run from 1
/// up to the wrap bound and skip any id that is still live.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: BTreeMap<u32, T>,
    last_id: u32,
    id_wrap: u32,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::with_id_wrap(ID_WRAP)
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_wrap(id_wrap: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            last_id: 0,
            id_wrap: id_wrap.max(1),
        }
    }

    fn allocate_id(&mut self) -> Option<u32> {
        for _ in 0..self.id_wrap {
            self.last_id = self.last_id % self.id_wrap + 1;
            if !self.entries.contains_key(&self.last_id) {
                return Some(self.last_id);
            }
        }
        None
    }

    /// Allocates an id and stores whatever `build` makes of it. `None` when every
    /// id below the wrap bound is taken.
    pub fn insert_with(&mut self, build: impl FnOnce(u32) -> T) -> Option<u32> {
        let id = self.allocate_id()?;
        self.entries.insert(id, build(id));
        Some(id)
    }

    pub fn insert_many(&mut self, count: usize, mut build: impl FnMut(u32) -> T) -> Vec<u32> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            match self.insert_with(&mut build) {
                Some(id) => ids.push(id),
                None => break,
            }
        }
        ids
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: u32) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Drops every entry `keep` rejects. Freed ids become available again
    /// once the counter wraps round to them.
    pub fn retain(&mut self, mut keep: impl FnMut(u32, &T) -> bool) {
        self.entries.retain(|id, value| keep(*id, value));
    }
}
