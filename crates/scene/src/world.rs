use crate::arc::ArcPath;
use crate::components::{Marker, Shell};
use crate::entity::EntityId;
use foundation::handles::Handle;
use foundation::math::Vec3;

/// Everything drawn on the globe, one slot per entity.
///
/// Components live in index-aligned vectors. Freed slots are reused with a
/// bumped generation, so a stale `EntityId` never resolves to a newer entity.
///
/// Iteration order is ascending slot index.
#[derive(Debug, Default)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    shells: Vec<Option<Shell>>,
    markers: Vec<Option<Marker>>,
    routes: Vec<Option<ArcPath>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                let idx = self.generations.len() as u32;
                self.ensure_capacity(idx as usize);
                idx
            }
        };
        self.alive[idx as usize] = true;
        EntityId(Handle::new(idx, self.generations[idx as usize]))
    }

    pub fn spawn_shell(&mut self, shell: Shell) -> EntityId {
        let entity = self.spawn();
        self.shells[entity.index() as usize] = Some(shell);
        entity
    }

    pub fn spawn_marker(&mut self, position: Vec3, key: impl Into<String>) -> EntityId {
        let entity = self.spawn();
        self.markers[entity.index() as usize] = Some(Marker::new(position, key));
        entity
    }

    pub fn spawn_route(&mut self, path: ArcPath) -> EntityId {
        let entity = self.spawn();
        self.routes[entity.index() as usize] = Some(path);
        entity
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        let idx = entity.index() as usize;
        self.alive.get(idx).copied().unwrap_or(false)
            && self.generations.get(idx) == Some(&entity.generation())
    }

    /// Remove an entity and all its components. Returns `false` for stale ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let idx = entity.index() as usize;
        self.shells[idx] = None;
        self.markers[idx] = None;
        self.routes[idx] = None;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free.push(entity.index());
        true
    }

    /// Drop every marker and route; shells stay.
    pub fn clear_overlays(&mut self) -> usize {
        self.clear_markers() + self.clear_routes()
    }

    pub fn clear_routes(&mut self) -> usize {
        let routes: Vec<EntityId> = self.routes().into_iter().map(|(id, _)| id).collect();
        routes.into_iter().filter(|id| self.despawn(*id)).count()
    }

    pub fn clear_markers(&mut self) -> usize {
        let markers: Vec<EntityId> = self.markers().into_iter().map(|(id, _)| id).collect();
        markers.into_iter().filter(|id| self.despawn(*id)).count()
    }

    pub fn marker(&self, entity: EntityId) -> Option<&Marker> {
        self.component(&self.markers, entity)
    }

    pub fn route(&self, entity: EntityId) -> Option<&ArcPath> {
        self.component(&self.routes, entity)
    }

    pub fn shell(&self, entity: EntityId) -> Option<&Shell> {
        self.component(&self.shells, entity)
    }

    pub fn markers(&self) -> Vec<(EntityId, &Marker)> {
        self.collect(&self.markers)
    }

    pub fn routes(&self) -> Vec<(EntityId, &ArcPath)> {
        self.collect(&self.routes)
    }

    pub fn shells(&self) -> Vec<(EntityId, &Shell)> {
        self.collect(&self.shells)
    }

    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn component<'a, T>(&self, store: &'a [Option<T>], entity: EntityId) -> Option<&'a T> {
        if !self.is_alive(entity) {
            return None;
        }
        store.get(entity.index() as usize).and_then(Option::as_ref)
    }

    fn collect<'a, T>(&self, store: &'a [Option<T>]) -> Vec<(EntityId, &'a T)> {
        let mut out = Vec::new();
        for (idx, component) in store.iter().enumerate() {
            let Some(component) = component else { continue };
            out.push((
                EntityId(Handle::new(idx as u32, self.generations[idx])),
                component,
            ));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.generations.len() <= idx {
            let new_len = idx + 1;
            self.generations.resize(new_len, 0);
            self.alive.resize(new_len, false);
            self.shells.resize(new_len, None);
            self.markers.resize(new_len, None);
            self.routes.resize(new_len, None);
        }
    }
}
