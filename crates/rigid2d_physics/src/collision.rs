//! Collision detection between shapes
//!
//! All box and polygon pairs run the separating axis theorem over the
//! shapes' candidate axes; circles and points get closed-form
//! treatment. A successful test yields a [`Collision`]: a contact
//! point and the minimum translation vector that moves the first shape
//! out of the second.
//!
//! Also provides collision filtering via layer masks.

use bitflags::bitflags;

use crate::shapes::{BoxShape, CircleShape, Geometry, Shape};
use rigid2d_math::{Interval, Point2, Vec2};

bitflags! {
    /// Collision layers for filtering which bodies can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Bodies can belong to
    /// multiple layers and choose which layers they collide with via a
    /// mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most bodies
        const DEFAULT = 1 << 0;
        /// Static world geometry (floors, walls)
        const TERRAIN = 1 << 1;
        /// Player-controlled bodies
        const PLAYER = 1 << 2;
        /// Projectiles
        const PROJECTILE = 1 << 3;
        /// Debris and decorative bodies
        const DEBRIS = 1 << 4;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what a body collides with
///
/// Uses a layer/mask system: `layer` is which layer(s) the body
/// belongs to, `mask` is which layer(s) it collides with. Two bodies
/// collide only if each body's layer intersects the other's mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this body belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this body can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Whether this filter allows collision with another filter. Both
    /// sides must agree.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Filter for static world geometry: everything hits it.
    pub fn terrain() -> Self {
        Self {
            layer: CollisionLayer::TERRAIN,
            mask: CollisionLayer::ALL,
        }
    }

    /// Filter for debris: collides with terrain only, so piles of it
    /// stay cheap.
    pub fn debris() -> Self {
        Self {
            layer: CollisionLayer::DEBRIS,
            mask: CollisionLayer::TERRAIN,
        }
    }
}

/// The geometric result of two overlapping shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    /// A representative point of the overlap region
    pub point: Point2,
    /// Minimum translation vector: the smallest displacement of the
    /// first shape that separates the pair
    pub mtv: Vec2,
}

impl Collision {
    pub fn new(point: Point2, mtv: Vec2) -> Self {
        Self { point, mtv }
    }

    /// The same contact seen from the other shape's side.
    pub fn inverse(&self) -> Self {
        Self {
            point: self.point,
            mtv: -self.mtv,
        }
    }
}

/// A circle-like view of a shape: circles are themselves, points are
/// circles of radius zero.
#[derive(Clone, Copy)]
struct Disc {
    center: Point2,
    radius: f64,
}

impl Disc {
    fn of_circle(c: &CircleShape) -> Self {
        Self {
            center: c.center(),
            radius: c.radius(),
        }
    }

    fn of_point(center: Point2) -> Self {
        Self { center, radius: 0.0 }
    }
}

/// Collision between two shapes. The MTV moves `a` out of `b`;
/// `collision_between(b, a)` yields the mirrored result.
pub fn collision_between(a: &Shape, b: &Shape) -> Option<Collision> {
    match (a.geometry(), b.geometry()) {
        (Geometry::Circle(ca), Geometry::Circle(cb)) => {
            disc_vs_disc(Disc::of_circle(ca), Disc::of_circle(cb))
        }
        (Geometry::Circle(ca), Geometry::Point(pb)) => {
            disc_vs_disc(Disc::of_circle(ca), Disc::of_point(pb.center()))
        }
        (Geometry::Point(pa), Geometry::Circle(cb)) => {
            disc_vs_disc(Disc::of_point(pa.center()), Disc::of_circle(cb))
        }
        (Geometry::Point(_), Geometry::Point(_)) => None,

        (Geometry::Circle(ca), Geometry::Box(bb)) => disc_vs_box(Disc::of_circle(ca), bb),
        (Geometry::Box(ba), Geometry::Circle(cb)) => {
            disc_vs_box(Disc::of_circle(cb), ba).map(|c| c.inverse())
        }
        (Geometry::Point(pa), Geometry::Box(bb)) => point_vs_box(pa.center(), bb),
        (Geometry::Box(ba), Geometry::Point(pb)) => {
            point_vs_box(pb.center(), ba).map(|c| c.inverse())
        }

        (Geometry::Polygon(_), Geometry::Circle(cb)) => {
            polygon_vs_disc(a, Disc::of_circle(cb))
        }
        (Geometry::Polygon(_), Geometry::Point(pb)) => {
            polygon_vs_disc(a, Disc::of_point(pb.center()))
        }
        (Geometry::Circle(ca), Geometry::Polygon(_)) => {
            polygon_vs_disc(b, Disc::of_circle(ca)).map(|c| c.inverse())
        }
        (Geometry::Point(pa), Geometry::Polygon(_)) => {
            polygon_vs_disc(b, Disc::of_point(pa.center())).map(|c| c.inverse())
        }

        // Every remaining pair is box or polygon on both sides
        _ => {
            if !overlapping(&a.x_interval(), &b.x_interval())
                || !overlapping(&a.y_interval(), &b.y_interval())
            {
                return None;
            }
            let mut axes = a.axes();
            axes.extend(b.axes());
            sat_collision(a, b, &axes)
        }
    }
}

/// Strict interval overlap. Shapes that merely touch along a boundary
/// do not collide, so applying an MTV always yields a non-colliding
/// configuration.
fn overlapping(a: &Interval, b: &Interval) -> bool {
    a.min() < b.max() && b.min() < a.max()
}

/// SAT core: project both shapes onto every axis; a gap on any axis
/// means no collision, otherwise the axis with the smallest overlap
/// yields the MTV. The first axis tested wins ties, so axis order is
/// part of the contract.
fn minimum_translation(a: &Shape, b: &Shape, axes: &[Vec2]) -> Option<Vec2> {
    let mut best: Option<(f64, Vec2)> = None;
    for &axis in axes {
        let projection = a.project_onto(axis);
        let other_projection = b.project_onto(axis);
        if !overlapping(&projection, &other_projection) {
            return None;
        }
        let shift = projection.minimum_translation(&other_projection);
        if best.map_or(true, |(smallest, _)| shift.abs() < smallest) {
            best = Some((shift.abs(), axis * shift));
        }
    }
    best.map(|(_, mtv)| mtv)
}

/// SAT collision for vertex shapes (boxes and polygons). The contact
/// point is the average of each shape's vertices contained in the
/// other; overlap without any contained vertex reports no collision.
fn sat_collision(a: &Shape, b: &Shape, axes: &[Vec2]) -> Option<Collision> {
    let mtv = minimum_translation(a, b, axes)?;

    let mut contained: Vec<Point2> = Vec::new();
    for v in a.vertices() {
        if b.contains(v) {
            contained.push(v);
        }
    }
    for v in b.vertices() {
        if a.contains(v) && !contained.contains(&v) {
            contained.push(v);
        }
    }
    if contained.is_empty() {
        return None;
    }
    let mut sum = Vec2::ZERO;
    for v in &contained {
        sum += *v;
    }
    let point = sum / contained.len() as f64;
    Some(Collision::new(point, mtv))
}

fn disc_vs_disc(a: Disc, b: Disc) -> Option<Collision> {
    let apart = b.center - a.center;
    let total = a.radius + b.radius;
    if apart.length_squared() >= total * total {
        return None;
    }
    let distance = apart.length();
    let direction = apart.normalized();
    // Negative magnitude: the MTV points away from b
    let mtv = direction * (distance - total);
    // Midpoint of the overlap segment between the two boundaries, so
    // both argument orders report the same contact
    let near_a = a.center + direction * a.radius;
    let near_b = b.center - direction * b.radius;
    let point = near_a.lerp(near_b, 0.5);
    Some(Collision::new(point, mtv))
}

fn disc_vs_box(disc: Disc, b: &BoxShape) -> Option<Collision> {
    let clamped = Point2::new(
        disc.center.x.clamp(b.min_x(), b.max_x()),
        disc.center.y.clamp(b.min_y(), b.max_y()),
    );
    if (clamped - disc.center).length_squared() >= disc.radius * disc.radius {
        return None;
    }

    let mtv = if b.contains(disc.center) {
        escape_from_box(disc.center, disc.radius, b)
    } else {
        // Push away from the nearest boundary point
        let to_clamped = clamped - disc.center;
        let distance = to_clamped.length();
        to_clamped.normalized() * (distance - disc.radius)
    };
    Some(Collision::new(clamped, mtv))
}

fn point_vs_box(p: Point2, b: &BoxShape) -> Option<Collision> {
    // Strictly inside; a point on the boundary is not colliding
    if p.x >= b.max_x() || p.x <= b.min_x() || p.y >= b.max_y() || p.y <= b.min_y() {
        return None;
    }
    let mtv = escape_from_box(p, 0.0, b);
    Some(Collision::new(p + mtv, mtv))
}

/// Cheapest axis-aligned escape for a disc center inside a box.
fn escape_from_box(center: Point2, radius: f64, b: &BoxShape) -> Vec2 {
    let x_diff = (b.center().x - center.x).abs();
    let y_diff = (b.center().y - center.y).abs();
    let need_x = radius + b.half_width();
    let need_y = radius + b.half_height();
    if (x_diff - need_x).abs() < (y_diff - need_y).abs() {
        let sign = if b.center().x > center.x { -1.0 } else { 1.0 };
        Vec2::new(sign * (need_x - x_diff), 0.0)
    } else {
        let sign = if b.center().y > center.y { -1.0 } else { 1.0 };
        Vec2::new(0.0, sign * (need_y - y_diff))
    }
}

/// SAT between a polygon and a disc: the polygon's edge normals plus
/// the axis from the disc center to the polygon's nearest vertex.
/// `poly` must wrap polygon geometry. The MTV moves the polygon.
fn polygon_vs_disc(poly: &Shape, disc: Disc) -> Option<Collision> {
    let points = match poly.geometry() {
        Geometry::Polygon(p) => p.points(),
        _ => unreachable!("polygon_vs_disc dispatched on polygon geometry"),
    };

    let closest = closest_point(points, disc.center);
    let mut extra = (disc.center - closest).normalized();
    if extra.x < 0.0 {
        extra = -extra;
    }

    let mut axes = poly.axes();
    axes.push(extra);

    let mut best: Option<(f64, Vec2)> = None;
    for &axis in &axes {
        let projection = poly.project_onto(axis);
        let mid = disc.center.dot(axis);
        let disc_projection = Interval::new(mid - disc.radius, mid + disc.radius);
        if !overlapping(&projection, &disc_projection) {
            return None;
        }
        let shift = projection.minimum_translation(&disc_projection);
        if best.map_or(true, |(smallest, _)| shift.abs() < smallest) {
            best = Some((shift.abs(), axis * shift));
        }
    }
    let (_, mtv) = best?;

    let point = disc.center + (closest - disc.center).normalized() * disc.radius;
    Some(Collision::new(point, mtv))
}

fn closest_point(points: &[Point2], to: Point2) -> Point2 {
    let mut closest = points[0];
    let mut closest_distance = (closest - to).length_squared();
    for &p in &points[1..] {
        let distance = (p - to).length_squared();
        if distance < closest_distance {
            closest = p;
            closest_distance = distance;
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, r: f64) -> Shape {
        Shape::new_circle(Point2::new(x, y), r).unwrap()
    }

    fn square(x: f64, y: f64, side: f64) -> Shape {
        Shape::new_box(Point2::new(x, y), side, side).unwrap()
    }

    #[test]
    fn test_filter_default_collides_with_everything() {
        let a = CollisionFilter::default();
        let b = CollisionFilter::default();
        assert!(a.collides_with(&b));
    }

    #[test]
    fn test_filter_debris_ignores_debris() {
        let debris = CollisionFilter::debris();
        let terrain = CollisionFilter::terrain();
        assert!(debris.collides_with(&terrain));
        assert!(!debris.collides_with(&debris));
    }

    #[test]
    fn test_filter_is_symmetric() {
        let a = CollisionFilter::new(CollisionLayer::PLAYER, CollisionLayer::TERRAIN);
        let b = CollisionFilter::new(CollisionLayer::TERRAIN, CollisionLayer::DEFAULT);
        // a accepts terrain but terrain does not accept players
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn test_circle_circle_overlap() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(1.5, 0.0, 1.0);
        let c = collision_between(&a, &b).unwrap();
        assert!((c.mtv.x + 0.5).abs() < 1e-9);
        assert!(c.mtv.y.abs() < 1e-9);
        // Contact sits midway between the boundaries
        assert!((c.point.x - 0.75).abs() < 1e-9);
        assert!(c.point.y.abs() < 1e-9);
    }

    #[test]
    fn test_circle_circle_separated() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(2.5, 0.0, 1.0);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_circle_circle_touching_is_not_colliding() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(2.0, 0.0, 1.0);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_collision_is_symmetric_up_to_mtv_sign() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(1.5, 0.5, 1.0);
        let ab = collision_between(&a, &b).unwrap();
        let ba = collision_between(&b, &a).unwrap();
        assert!((ab.mtv + ba.mtv).length() < 1e-9);
        assert!((ab.point - ba.point).length() < 1e-9);
    }

    #[test]
    fn test_unequal_circles_share_contact_point() {
        let a = circle(0.0, 0.0, 2.0);
        let b = circle(2.5, 0.0, 1.0);
        let ab = collision_between(&a, &b).unwrap();
        let ba = collision_between(&b, &a).unwrap();
        assert!((ab.point - ba.point).length() < 1e-9);
        // Midway between a's boundary (2.0) and b's boundary (1.5)
        assert!((ab.point.x - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_point_circle_share_contact_point() {
        let c = circle(0.0, 0.0, 1.0);
        let p = Shape::new_point(Point2::new(0.5, 0.0));
        let pc = collision_between(&p, &c).unwrap();
        let cp = collision_between(&c, &p).unwrap();
        assert!((pc.point - cp.point).length() < 1e-9);
        assert!((pc.mtv + cp.mtv).length() < 1e-9);
    }

    #[test]
    fn test_mtv_separates_circles() {
        let mut a = circle(0.0, 0.0, 1.0);
        let b = circle(1.5, 0.0, 1.0);
        let c = collision_between(&a, &b).unwrap();
        a.set_center(a.center() + c.mtv);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_box_box_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(8.0, 0.0, 10.0);
        let c = collision_between(&a, &b).unwrap();
        // Overlap is 2 on x, 10 on y: x wins
        assert!((c.mtv.x + 2.0).abs() < 1e-9);
        assert!(c.mtv.y.abs() < 1e-9);
        // Contained corners average to the overlap center
        assert!((c.point.x - 4.0).abs() < 1e-9);
        assert!(c.point.y.abs() < 1e-9);
    }

    #[test]
    fn test_box_box_separated_early_out() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(5.0, 0.0, 2.0);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_mtv_separates_boxes() {
        let mut a = square(0.0, 0.0, 10.0);
        let b = square(8.0, 0.0, 10.0);
        let c = collision_between(&a, &b).unwrap();
        a.set_center(a.center() + c.mtv);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_circle_box_from_outside() {
        let b = square(0.0, 0.0, 4.0);
        let c = circle(3.0, 0.0, 1.5);
        let col = collision_between(&c, &b).unwrap();
        // Circle is pushed right, away from the box
        assert!(col.mtv.x > 0.0);
        assert!(col.mtv.y.abs() < 1e-9);
        assert!((col.mtv.x - 0.5).abs() < 1e-9);
        // Contact is the clamped boundary point
        assert_eq!(col.point, Point2::new(2.0, 0.0));
    }

    #[test]
    fn test_circle_inside_box_escapes_cheapest_axis() {
        let b = square(0.0, 0.0, 10.0);
        let c = circle(4.0, 0.0, 0.5);
        let col = collision_between(&c, &b).unwrap();
        // Nearest escape is through the right wall
        assert!(col.mtv.x > 0.0);
        assert_eq!(col.mtv.y, 0.0);
    }

    #[test]
    fn test_box_circle_mirrors_circle_box() {
        let b = square(0.0, 0.0, 4.0);
        let c = circle(3.0, 0.0, 1.5);
        let cb = collision_between(&c, &b).unwrap();
        let bc = collision_between(&b, &c).unwrap();
        assert_eq!(bc.mtv, -cb.mtv);
        assert_eq!(bc.point, cb.point);
    }

    #[test]
    fn test_point_box_strictly_inside() {
        let b = square(0.0, 0.0, 4.0);
        let inside = Shape::new_point(Point2::new(1.5, 0.0));
        let col = collision_between(&inside, &b).unwrap();
        assert!((col.mtv.x - 0.5).abs() < 1e-9);
        assert_eq!(col.mtv.y, 0.0);

        let on_edge = Shape::new_point(Point2::new(2.0, 0.0));
        assert!(collision_between(&on_edge, &b).is_none());
    }

    #[test]
    fn test_point_point_never_collides() {
        let a = Shape::new_point(Point2::ZERO);
        let b = Shape::new_point(Point2::ZERO);
        assert!(collision_between(&a, &b).is_none());
    }

    #[test]
    fn test_point_circle() {
        let c = circle(0.0, 0.0, 1.0);
        let p = Shape::new_point(Point2::new(0.5, 0.0));
        let col = collision_between(&p, &c).unwrap();
        // Point pushed right out of the circle by 0.5
        assert!((col.mtv.x - 0.5).abs() < 1e-9);
        assert!(col.mtv.y.abs() < 1e-9);

        let outside = Shape::new_point(Point2::new(1.0, 0.0));
        assert!(collision_between(&outside, &c).is_none());
    }

    #[test]
    fn test_polygon_polygon_overlap() {
        let a = Shape::new_polygon(vec![
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ])
        .unwrap();
        let b = Shape::new_polygon(vec![
            Point2::new(1.0, -2.0),
            Point2::new(5.0, -2.0),
            Point2::new(5.0, 2.0),
            Point2::new(1.0, 2.0),
        ])
        .unwrap();
        let c = collision_between(&a, &b).unwrap();
        assert!((c.mtv.x + 1.0).abs() < 1e-9);
        assert!(c.mtv.y.abs() < 1e-9);
    }

    #[test]
    fn test_polygon_triangle_vs_square() {
        let triangle = Shape::new_polygon(vec![
            Point2::new(1.5, 0.0),
            Point2::new(3.5, -1.0),
            Point2::new(3.5, 1.0),
        ])
        .unwrap();
        let b = square(0.0, 0.0, 4.0);
        let c = collision_between(&triangle, &b).unwrap();
        // Triangle apex pokes into the square; pushed out along +x
        assert!(c.mtv.x > 0.0);
        let mut moved = triangle.clone();
        moved.set_center(moved.center() + c.mtv);
        assert!(collision_between(&moved, &b).is_none());
    }

    #[test]
    fn test_polygon_circle() {
        let poly = Shape::new_polygon(vec![
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ])
        .unwrap();
        let c = circle(3.0, 0.0, 1.5);
        let col = collision_between(&poly, &c).unwrap();
        // Polygon moves left, away from the circle
        assert!(col.mtv.x < 0.0);

        let inverse = collision_between(&c, &poly).unwrap();
        assert!((inverse.mtv + col.mtv).length() < 1e-9);
    }

    #[test]
    fn test_deep_overlap_uses_smallest_axis() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(1.0, 4.0, 10.0);
        let c = collision_between(&a, &b).unwrap();
        // y overlap (6) is smaller than x overlap (9)
        assert_eq!(c.mtv.x, 0.0);
        assert!((c.mtv.y + 6.0).abs() < 1e-9);
    }
}
