use crate::World;
use crate::arc::GLOBE_RADIUS;
use crate::components::Shell;
use crate::entity::EntityId;

/// Radius of the glow shell drawn around the globe.
pub const ATMOSPHERE_RADIUS: f64 = 5.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlobeEntities {
    pub surface: EntityId,
    pub atmosphere: EntityId,
}

pub fn spawn_globe(world: &mut World) -> GlobeEntities {
    GlobeEntities {
        atmosphere: world.spawn_shell(Shell::atmosphere(ATMOSPHERE_RADIUS)),
        surface: world.spawn_shell(Shell::surface(GLOBE_RADIUS)),
    }
}

#[cfg(test)]
mod tests {
    use super::{ATMOSPHERE_RADIUS, spawn_globe};
    use crate::World;
    use crate::arc::{GLOBE_RADIUS, SURFACE_RADIUS};
    use crate::components::ShellKind;

    #[test]
    fn spawns_surface_inside_atmosphere() {
        let mut world = World::new();
        let globe = spawn_globe(&mut world);

        assert_eq!(world.shells().len(), 2);
        let surface = world.shell(globe.surface).unwrap();
        let atmosphere = world.shell(globe.atmosphere).unwrap();
        assert_eq!(surface.kind, ShellKind::Surface);
        assert_eq!(surface.radius, GLOBE_RADIUS);
        assert_eq!(atmosphere.kind, ShellKind::Atmosphere);
        assert!(GLOBE_RADIUS < SURFACE_RADIUS && SURFACE_RADIUS < ATMOSPHERE_RADIUS);
    }
}
