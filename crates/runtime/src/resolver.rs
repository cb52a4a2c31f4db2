//! Turns location references into scene points.

use effect_core::{Footprint, LocationRef, LocationRole, Point, RandomSource};
use tracing::debug;

use crate::api::Result;
use crate::repository::NamedPositionCache;

/// Resolves [`LocationRef`]s for one pipeline run.
///
/// `grid_size` is the active scene grid in pixels. It converts entity
/// footprints to pixels and sets the margins of missed-offset sampling.
pub struct LocationResolver<'a> {
    positions: &'a NamedPositionCache,
    grid_size: f64,
}

impl<'a> LocationResolver<'a> {
    pub fn new(positions: &'a NamedPositionCache, grid_size: f64) -> Self {
        Self {
            positions,
            grid_size,
        }
    }

    /// Resolves `location` to a point, optionally displaced to miss it.
    ///
    /// Fails only for a name with no record at `repetition`.
    pub fn resolve(
        &self,
        location: &LocationRef,
        role: LocationRole,
        repetition: usize,
        missed: bool,
        rng: &mut dyn RandomSource,
    ) -> Result<Point> {
        let (center, footprint) = match location {
            LocationRef::Point(point) => (*point, None),
            LocationRef::Entity(entity) => (entity.center, Some(entity.footprint(self.grid_size))),
            LocationRef::Template(template) => (template.center(role), template.footprint()),
            LocationRef::Name(name) => (self.positions.lookup(name, repetition)?, None),
        };

        if !missed {
            return Ok(center);
        }

        let footprint = footprint.unwrap_or(Footprint::unit(self.grid_size));
        let point = missed_offset(center, footprint, self.grid_size, rng);
        debug!(
            target: "effect_runtime::resolver",
            %role,
            from_x = center.x,
            from_y = center.y,
            to_x = point.x,
            to_y = point.y,
            "applied missed offset"
        );
        Ok(point)
    }
}

/// Displaces `center` so it lands just outside `footprint` on one axis.
///
/// One axis is chosen at random as the primary axis and pushed past the
/// footprint's half extent by `[grid/5, grid/2)`. The other axis gets a
/// smaller jitter of `[grid/5, half extent + grid/2)`. Each axis draws its
/// own sign.
pub fn missed_offset(
    center: Point,
    footprint: Footprint,
    grid_size: f64,
    rng: &mut dyn RandomSource,
) -> Point {
    let token_offset = grid_size / 5.0;
    let x_is_primary = rng.uniform_bool();
    let sign_x = rng.sign();
    let sign_y = rng.sign();

    let (dx, dy) = if x_is_primary {
        (
            footprint.half_width() + rng.uniform_float(token_offset, grid_size / 2.0),
            rng.uniform_float(token_offset, footprint.half_height() + grid_size / 2.0),
        )
    } else {
        (
            rng.uniform_float(token_offset, footprint.half_width() + grid_size / 2.0),
            footprint.half_height() + rng.uniform_float(token_offset, grid_size / 2.0),
        )
    };

    Point::new(center.x + dx * sign_x, center.y + dy * sign_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PipelineError;
    use effect_core::{AreaShape, AreaTemplateRef, EntityRef, PcgRandom, ScriptedRandom};

    #[test]
    fn points_resolve_to_themselves() {
        let cache = NamedPositionCache::new();
        let resolver = LocationResolver::new(&cache, 100.0);
        let mut rng = ScriptedRandom::default();
        let point = resolver
            .resolve(
                &LocationRef::point(12.0, 34.0),
                LocationRole::Origin,
                0,
                false,
                &mut rng,
            )
            .unwrap();
        assert_eq!(point, Point::new(12.0, 34.0));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn entities_resolve_to_center() {
        let cache = NamedPositionCache::new();
        let resolver = LocationResolver::new(&cache, 100.0);
        let entity = EntityRef::new(Point::new(250.0, 150.0), 2.0, 2.0).with_id("goblin");
        let point = resolver
            .resolve(
                &entity.into(),
                LocationRole::Target,
                0,
                false,
                &mut ScriptedRandom::default(),
            )
            .unwrap();
        assert_eq!(point, Point::new(250.0, 150.0));
    }

    #[test]
    fn ray_target_uses_endpoint() {
        let cache = NamedPositionCache::new();
        let resolver = LocationResolver::new(&cache, 100.0);
        let ray: LocationRef =
            AreaTemplateRef::new(AreaShape::Ray, Point::new(0.0, 0.0), 0.0, 500.0).into();
        let mut rng = ScriptedRandom::default();

        let as_origin = resolver
            .resolve(&ray, LocationRole::Origin, 0, false, &mut rng)
            .unwrap();
        let as_target = resolver
            .resolve(&ray, LocationRole::Target, 0, false, &mut rng)
            .unwrap();
        assert_eq!(as_origin, Point::ORIGIN);
        assert!((as_target.x - 500.0).abs() < 1e-9);
        assert!(as_target.y.abs() < 1e-9);
    }

    #[test]
    fn names_resolve_through_cache() {
        let cache = NamedPositionCache::new();
        cache.record("impact", 0, Point::new(9.0, 9.0)).unwrap();
        let resolver = LocationResolver::new(&cache, 100.0);
        let mut rng = ScriptedRandom::default();

        let found = resolver
            .resolve(
                &LocationRef::name("impact"),
                LocationRole::Origin,
                0,
                false,
                &mut rng,
            )
            .unwrap();
        assert_eq!(found, Point::new(9.0, 9.0));

        let missing = resolver.resolve(
            &LocationRef::name("impact"),
            LocationRole::Origin,
            1,
            false,
            &mut rng,
        );
        assert!(matches!(missing, Err(PipelineError::UnresolvedName(_))));
    }

    #[test]
    fn scripted_miss_on_x_axis() {
        // x primary, +x, -y, primary draw at midpoint, jitter at lower bound
        let mut rng = ScriptedRandom::new([0.9, 0.9, 0.1, 0.5, 0.0]);
        let point = missed_offset(Point::ORIGIN, Footprint::unit(100.0), 100.0, &mut rng);
        assert!((point.x - (50.0 + 35.0)).abs() < 1e-9);
        assert!((point.y - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn misses_always_clear_the_primary_axis() {
        let grid = 100.0;
        let footprint = Footprint::unit(grid);
        let mut rng = PcgRandom::new(0xC0FFEE);

        for _ in 0..1000 {
            let mut probe = rng.clone();
            let x_is_primary = probe.uniform_bool();
            let point = missed_offset(Point::ORIGIN, footprint, grid, &mut rng);
            if x_is_primary {
                assert!(point.x.abs() > footprint.half_width());
            } else {
                assert!(point.y.abs() > footprint.half_height());
            }
            assert!(point.x.abs() < footprint.half_width() + grid);
            assert!(point.y.abs() < footprint.half_height() + grid);
        }
    }
}
