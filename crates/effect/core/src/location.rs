//! Abstract location references accepted by effect options.
//!
//! A [`LocationRef`] may point at a literal scene point, a spatial entity, an
//! area-of-effect template, or the name of an earlier effect in the same
//! sequence. Only the last form needs outside state to resolve; the runtime
//! resolver handles it and everything else is answered here.

use crate::geometry::Point;

/// Which end of an effect a location is being resolved for.
///
/// Cone and ray templates resolve to a different point depending on the role:
/// their origin when the effect starts there, their far end when the effect
/// travels toward them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LocationRole {
    Origin,
    Target,
}

/// Location input for an effect's origin or target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationRef {
    /// Literal scene point.
    Point(Point),
    /// Spatial entity with a footprint measured in grid units.
    Entity(EntityRef),
    /// Area-of-effect template.
    Template(AreaTemplateRef),
    /// Name recorded by an earlier effect of the same sequence.
    Name(String),
}

impl LocationRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Point::new(x, y))
    }

    /// Returns the referenced name for [`LocationRef::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl From<Point> for LocationRef {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<EntityRef> for LocationRef {
    fn from(entity: EntityRef) -> Self {
        Self::Entity(entity)
    }
}

impl From<AreaTemplateRef> for LocationRef {
    fn from(template: AreaTemplateRef) -> Self {
        Self::Template(template)
    }
}

/// Axis-aligned size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    /// A square one grid unit on each side.
    pub const fn unit(grid_size: f64) -> Self {
        Self {
            width: grid_size,
            height: grid_size,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// A spatial entity (token) on the scene.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    /// Optional identifier, used only for logging.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    /// Geometric center in scene pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: Point,
    /// Width in grid units.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub width: f64,
    /// Height in grid units.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub height: f64,
}

#[cfg(feature = "serde")]
fn one() -> f64 {
    1.0
}

impl EntityRef {
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            id: None,
            center,
            width,
            height,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Bounding box in pixels for the given grid size.
    pub fn footprint(&self, grid_size: f64) -> Footprint {
        Footprint {
            width: self.width * grid_size,
            height: self.height * grid_size,
        }
    }
}

/// Shape of an area-of-effect template.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AreaShape {
    /// Radius `distance` around the origin.
    #[default]
    Circle,
    /// Fan opening from the origin along `direction`.
    Cone,
    /// Line from the origin along `direction`.
    Ray,
    /// Rectangle spanned by the origin and the endpoint as opposite corners.
    Rect,
}

impl AreaShape {
    /// Cone and ray templates point somewhere; the others only cover an area.
    pub const fn is_directional(self) -> bool {
        matches!(self, Self::Cone | Self::Ray)
    }
}

/// A placed area-of-effect template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaTemplateRef {
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: AreaShape,
    /// Anchor point of the template in scene pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Point,
    /// Direction in radians.
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction: f64,
    /// Length (or radius, for circles) in pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub distance: f64,
}

impl AreaTemplateRef {
    pub fn new(shape: AreaShape, origin: Point, direction: f64, distance: f64) -> Self {
        Self {
            shape,
            origin,
            direction,
            distance,
        }
    }

    /// Far end of the template along its direction.
    pub fn endpoint(&self) -> Point {
        self.origin.offset_polar(self.direction, self.distance)
    }

    /// The point an effect should use for this template in the given role.
    pub fn center(&self, role: LocationRole) -> Point {
        match (self.shape, role) {
            (AreaShape::Cone | AreaShape::Ray, LocationRole::Target) => self.endpoint(),
            (AreaShape::Rect, _) => self.origin.midpoint(self.endpoint()),
            _ => self.origin,
        }
    }

    /// Bounding box in pixels, if the shape has one.
    pub fn footprint(&self) -> Option<Footprint> {
        match self.shape {
            AreaShape::Circle => Some(Footprint {
                width: self.distance * 2.0,
                height: self.distance * 2.0,
            }),
            AreaShape::Rect => {
                let span = self.endpoint() - self.origin;
                Some(Footprint {
                    width: span.x.abs(),
                    height: span.y.abs(),
                })
            }
            AreaShape::Cone | AreaShape::Ray => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn ray_resolves_to_endpoint_only_as_target() {
        let ray = AreaTemplateRef::new(AreaShape::Ray, Point::new(10.0, 10.0), 0.0, 300.0);
        assert_eq!(ray.center(LocationRole::Origin), Point::new(10.0, 10.0));
        assert!(close(ray.center(LocationRole::Target), Point::new(310.0, 10.0)));
    }

    #[test]
    fn cone_target_follows_direction() {
        let cone = AreaTemplateRef::new(AreaShape::Cone, Point::ORIGIN, FRAC_PI_2, 50.0);
        assert!(close(cone.center(LocationRole::Target), Point::new(0.0, 50.0)));
        assert!(cone.footprint().is_none());
    }

    #[test]
    fn circle_center_is_origin_in_both_roles() {
        let circle = AreaTemplateRef::new(AreaShape::Circle, Point::new(5.0, 6.0), 1.0, 20.0);
        assert_eq!(circle.center(LocationRole::Origin), Point::new(5.0, 6.0));
        assert_eq!(circle.center(LocationRole::Target), Point::new(5.0, 6.0));
        assert_eq!(
            circle.footprint(),
            Some(Footprint {
                width: 40.0,
                height: 40.0
            })
        );
    }

    #[test]
    fn rect_center_is_midpoint_of_corners() {
        let rect = AreaTemplateRef::new(
            AreaShape::Rect,
            Point::ORIGIN,
            (100.0f64).atan2(200.0),
            (200.0f64).hypot(100.0),
        );
        assert!(close(rect.center(LocationRole::Origin), Point::new(100.0, 50.0)));
        let footprint = rect.footprint().unwrap();
        assert!((footprint.width - 200.0).abs() < 1e-9);
        assert!((footprint.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn entity_footprint_scales_with_grid() {
        let entity = EntityRef::new(Point::ORIGIN, 2.0, 1.0);
        let footprint = entity.footprint(50.0);
        assert_eq!(footprint.width, 100.0);
        assert_eq!(footprint.height, 50.0);
    }

    #[test]
    fn shape_parses_case_insensitively() {
        assert_eq!("CONE".parse::<AreaShape>().unwrap(), AreaShape::Cone);
        assert_eq!(AreaShape::Rect.to_string(), "rect");
    }
}
