use std::ops::{Index, IndexMut};

use log::debug;

use super::MapObject;

/// Handle to a `MapObject` in a `ThingAlloc`. The generation is bumped every
/// time a slot is freed, so a handle to a removed thing never resolves to the
/// thing that later takes its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingId {
    index: u32,
    generation: u32,
}

impl ThingId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index as usize
    }
}

struct Slot {
    generation: u32,
    thing: Option<MapObject>,
}

/// Slot storage for every `MapObject` in a level. Freed slots go on a free
/// stack and are reused before the storage grows.
#[derive(Default)]
pub struct ThingAlloc {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ThingAlloc {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, thing: MapObject) -> ThingId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.thing = Some(thing);
            return ThingId::new(index, slot.generation);
        }
        self.slots.push(Slot {
            generation: 0,
            thing: Some(thing),
        });
        ThingId::new((self.slots.len() - 1) as u32, 0)
    }

    /// Take the thing out of its slot. Stale ids return `None`.
    pub fn remove(&mut self, id: ThingId) -> Option<MapObject> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let thing = slot.thing.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        debug!("Freed thing slot {}", id.index);
        Some(thing)
    }

    #[inline]
    pub fn contains(&self, id: ThingId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: ThingId) -> Option<&MapObject> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.thing.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut MapObject> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.thing.as_mut())
    }

    /// Ids of every live thing. Collected so callers may mutate or remove
    /// things while walking them.
    pub fn ids(&self) -> Vec<ThingId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.thing.is_some())
            .map(|(i, s)| ThingId::new(i as u32, s.generation))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThingId, &MapObject)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.thing
                .as_ref()
                .map(|t| (ThingId::new(i as u32, s.generation), t))
        })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

/// Panics on a stale id, use `get` when the thing may be gone
impl Index<ThingId> for ThingAlloc {
    type Output = MapObject;

    fn index(&self, id: ThingId) -> &Self::Output {
        match self.get(id) {
            Some(t) => t,
            None => panic!("stale thing id {id:?}"),
        }
    }
}

impl IndexMut<ThingId> for ThingAlloc {
    fn index_mut(&mut self, id: ThingId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(t) => t,
            None => panic!("stale thing id {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThingAlloc;
    use crate::info::MapObjKind;
    use crate::thing::MapObject;
    use glam::Vec2;

    #[test]
    fn stale_ids_do_not_resolve() {
        let mut alloc = ThingAlloc::new(4);
        let a = alloc.insert(MapObject::new(Vec2::ZERO, 0.0, MapObjKind::MT_TROOP));
        let b = alloc.insert(MapObject::new(Vec2::ONE, 0.0, MapObjKind::MT_TROOP));
        assert_eq!(alloc.len(), 2);

        assert!(alloc.remove(a).is_some());
        assert!(alloc.get(a).is_none());
        assert!(alloc.remove(a).is_none());

        let c = alloc.insert(MapObject::new(Vec2::NEG_ONE, 0.0, MapObjKind::MT_BARREL));
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
        assert!(alloc.get(a).is_none());
        assert_eq!(alloc[c].kind, MapObjKind::MT_BARREL);
        assert_eq!(alloc.capacity(), 2);
        assert_eq!(alloc.ids(), vec![c, b]);
    }
}
