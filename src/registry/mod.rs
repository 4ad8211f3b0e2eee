//! Object registry
//!
//! Owns every object mentioned in the log for the whole reconstruction pass.
//! Objects are created on their first spawn and never removed; the only
//! mutation is the single transition to `Destroyed` when a kill is credited.

pub mod category;
pub mod object;
pub mod player;

use ahash::AHashMap;

use crate::core::types::{ObjectId, Tick};

pub use category::{
    classify, normalize_type, CategoryRule, CategoryTable, Classification, ObjectCategory,
};
pub use object::{GameObject, ObjectState};
pub use player::PlayerContext;

pub struct ObjectRegistry {
    table: CategoryTable,
    /// Classification results keyed by raw type tag
    cache: AHashMap<String, Classification>,
    objects: AHashMap<ObjectId, GameObject>,
}

impl ObjectRegistry {
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            cache: AHashMap::new(),
            objects: AHashMap::new(),
        }
    }

    /// Register an object on its first spawn
    ///
    /// A repeated spawn of a known id keeps the original record.
    pub fn register(
        &mut self,
        id: ObjectId,
        display_name: &str,
        raw_type_tag: &str,
        country: Option<u32>,
    ) -> &GameObject {
        let classification = self.classification(raw_type_tag);
        self.objects.entry(id).or_insert_with(|| {
            let object = GameObject::new(id, display_name, raw_type_tag, country, classification);
            tracing::trace!(
                "Registered {} {:?} as {:?}",
                id,
                object.normalized_type,
                object.category
            );
            object
        })
    }

    /// Category of a raw type tag
    pub fn classify(&mut self, raw_type_tag: &str) -> ObjectCategory {
        self.classification(raw_type_tag).category
    }

    /// Full classification of a raw type tag, cached per tag
    pub fn classification(&mut self, raw_type_tag: &str) -> Classification {
        if let Some(cached) = self.cache.get(raw_type_tag) {
            return cached.clone();
        }
        let result = classify(&self.table, raw_type_tag);
        self.cache.insert(raw_type_tag.to_string(), result.clone());
        result
    }

    pub fn lookup(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    /// Transition an object to `Destroyed`
    ///
    /// Returns false if the object is unknown or already destroyed.
    pub fn mark_destroyed(&mut self, id: ObjectId, tick: Tick, altitude: Option<i32>) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) if !object.is_destroyed() => {
                object.state = ObjectState::Destroyed;
                object.destroyed_at = Some(tick);
                object.destruction_altitude = altitude;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
