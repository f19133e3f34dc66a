//! Collision shapes
//!
//! Four shape primitives share a common surface: axis-aligned boxes,
//! circles, points (zero-radius circles), and convex polygons. Each
//! knows its own projection onto an axis, its containment test, its
//! moment of inertia about the centroid, and its ray intersection.

use crate::error::{PhysicsError, ShapeKind};
use crate::ray::Ray;
use rigid2d_math::{Interval, Point2, Vec2};

use std::f64::consts::TAU;

/// An axis-aligned rectangle. Never rotates; the rotation setters are
/// no-ops.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxShape {
    center: Point2,
    half_width: f64,
    half_height: f64,
}

impl BoxShape {
    pub fn new(center: Point2, width: f64, height: f64) -> Result<Self, PhysicsError> {
        if width < 0.0 || height < 0.0 {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "box extents must be non-negative, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            center,
            half_width: width / 2.0,
            half_height: height / 2.0,
        })
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.center.x - self.half_width
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.center.x + self.half_width
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.center.y - self.half_height
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.center.y + self.half_height
    }

    /// Corners in counterclockwise ring order, starting bottom-left.
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min_x(), self.min_y()),
            Point2::new(self.max_x(), self.min_y()),
            Point2::new(self.max_x(), self.max_y()),
            Point2::new(self.min_x(), self.max_y()),
        ]
    }

    /// Boundary included.
    pub fn contains(&self, p: Point2) -> bool {
        (p.x - self.center.x).abs() <= self.half_width
            && (p.y - self.center.y).abs() <= self.half_height
    }
}

/// A circle. Rotation is tracked so bodies can spin, but it never
/// affects the collision geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleShape {
    center: Point2,
    radius: f64,
    rotation: f64,
}

impl CircleShape {
    pub fn new(center: Point2, radius: f64) -> Result<Self, PhysicsError> {
        if radius < 0.0 {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "circle radius must be non-negative, got {}",
                radius
            )));
        }
        Ok(Self {
            center,
            radius,
            rotation: 0.0,
        })
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Boundary excluded: a point exactly on the circle is outside.
    pub fn contains(&self, p: Point2) -> bool {
        (p - self.center).length_squared() < self.radius * self.radius
    }
}

/// A single point, behaving as a circle of radius zero. Does not
/// rotate, has no size, and ignores color changes.
#[derive(Clone, Debug, PartialEq)]
pub struct PointShape {
    center: Point2,
}

impl PointShape {
    pub fn new(center: Point2) -> Self {
        Self { center }
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Only the exact location is contained.
    pub fn contains(&self, p: Point2) -> bool {
        p == self.center
    }
}

/// A convex polygon with at least three vertices.
///
/// Vertices are stored in absolute coordinates, normalized to
/// counterclockwise winding. Convexity is assumed rather than
/// enforced; [`PolygonShape::concave_vertex`] is available as a
/// diagnostic. The centroid and the moment of inertia are computed
/// once at construction; moving, rotating, and resizing update the
/// vertices and the cached bounding intervals but never the moment.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonShape {
    center: Point2,
    points: Vec<Point2>,
    angle: f64,
    moment: f64,
    x_interval: Interval,
    y_interval: Interval,
}

impl PolygonShape {
    pub fn new(mut points: Vec<Point2>) -> Result<Self, PhysicsError> {
        if points.len() < 3 {
            return Err(PhysicsError::DegenerateGeometry(format!(
                "polygon needs at least three vertices, got {}",
                points.len()
            )));
        }
        let area = signed_area(&points);
        if area == 0.0 {
            return Err(PhysicsError::DegenerateGeometry(
                "zero-area polygon".into(),
            ));
        }
        if area < 0.0 {
            points.reverse();
        }
        let area = area.abs();

        let centroid = centroid(&points, area);

        // Second moment of area about the centroid, divided by area:
        // the per-unit-mass moment of inertia.
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for i in 0..points.len() {
            let current = points[i] - centroid;
            let next = points[(i + 1) % points.len()] - centroid;
            let cross = current.cross(next);
            numerator += cross * (current.dot(current) + current.dot(next) + next.dot(next));
            denominator += cross;
        }
        let moment = numerator / (denominator * 6.0);

        let (x_interval, y_interval) = bounding_intervals(&points);
        Ok(Self {
            center: centroid,
            points,
            angle: 0.0,
            moment,
            x_interval,
            y_interval,
        })
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn x_interval(&self) -> Interval {
        self.x_interval
    }

    #[inline]
    pub fn y_interval(&self) -> Interval {
        self.y_interval
    }

    fn set_center(&mut self, new_center: Point2) {
        let delta = new_center - self.center;
        for p in &mut self.points {
            *p += delta;
        }
        self.x_interval = self.x_interval.translated(delta.x);
        self.y_interval = self.y_interval.translated(delta.y);
        self.center = new_center;
    }

    fn set_rotation(&mut self, theta: f64) {
        let delta = theta - self.angle;
        for p in &mut self.points {
            let rel = *p - self.center;
            *p = self.center + Vec2::from_polar(rel.length(), rel.angle() + delta);
        }
        self.angle = theta % TAU;
        let (x, y) = bounding_intervals(&self.points);
        self.x_interval = x;
        self.y_interval = y;
    }

    fn set_width(&mut self, width: f64) {
        let current = self.x_interval.width();
        if width == current || current == 0.0 {
            return;
        }
        let scale = width / current;
        for p in &mut self.points {
            p.x = self.center.x + (p.x - self.center.x) * scale;
        }
        let (x, y) = bounding_intervals(&self.points);
        self.x_interval = x;
        self.y_interval = y;
    }

    fn set_height(&mut self, height: f64) {
        let current = self.y_interval.width();
        if height == current || current == 0.0 {
            return;
        }
        let scale = height / current;
        for p in &mut self.points {
            p.y = self.center.y + (p.y - self.center.y) * scale;
        }
        let (x, y) = bounding_intervals(&self.points);
        self.x_interval = x;
        self.y_interval = y;
    }

    /// Boundary and vertices count as inside.
    pub fn contains(&self, p: Point2) -> bool {
        for i in 0..self.points.len() {
            let start = self.points[i];
            if start == p {
                return true;
            }
            let end = self.points[(i + 1) % self.points.len()];
            if (end - start).cross(p - start) < 0.0 {
                return false;
            }
        }
        true
    }

    /// Outward-facing separating axes, one per edge, sign-normalized so
    /// that opposite edges collapse onto the same axis.
    pub(crate) fn axes(&self) -> Vec<Vec2> {
        let mut axes = Vec::with_capacity(self.points.len());
        for i in 0..self.points.len() {
            let start = self.points[i];
            let end = self.points[(i + 1) % self.points.len()];
            let mut normal = (end - start).perpendicular().normalized();
            if normal.y < 0.0 || (normal.y == 0.0 && normal.x < 0.0) {
                normal = -normal;
            }
            axes.push(normal);
        }
        axes
    }

    #[inline]
    pub fn moment_of_inertia(&self) -> f64 {
        self.moment
    }

    /// Searches for a vertex that lies inside the polygon formed by the
    /// remaining vertices, which is the signature of a concave corner.
    /// Diagnostic only; collision detection assumes convexity.
    pub fn concave_vertex(&self) -> Option<Point2> {
        for (i, &point) in self.points.iter().enumerate() {
            let mut rest = self.points.clone();
            rest.remove(i);
            if let Ok(remainder) = PolygonShape::new(rest) {
                if remainder.contains(point) {
                    return Some(point);
                }
            }
        }
        None
    }
}

fn signed_area(points: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];
        sum += current.cross(next);
    }
    sum / 2.0
}

fn centroid(points: &[Point2], area: f64) -> Point2 {
    let mut c = Vec2::ZERO;
    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];
        c += (current + next) * current.cross(next);
    }
    c / (6.0 * area)
}

fn bounding_intervals(points: &[Point2]) -> (Interval, Interval) {
    let mut x = Interval::about(points[0].x, 0.0);
    let mut y = Interval::about(points[0].y, 0.0);
    for p in &points[1..] {
        x = x.extended_to(p.x);
        y = y.extended_to(p.y);
    }
    (x, y)
}

/// Smallest positive distance along the ray to any edge of the ring,
/// if the ray crosses one.
fn edges_distance_along(points: &[Point2], ray: &Ray) -> Option<f64> {
    let mut shortest: Option<f64> = None;
    for i in 0..points.len() {
        let start = points[i];
        let end = points[(i + 1) % points.len()];
        let perp = Vec2::new((start - end).y, (end - start).x);

        // The edge is crossed only if its endpoints sit on opposite
        // sides of the ray's line.
        let side_start = (start - ray.origin()).cross(ray.direction());
        let side_end = (end - ray.origin()).cross(ray.direction());
        if side_start * side_end > 0.0 || ray.direction().dot(perp) == 0.0 {
            continue;
        }

        let t = (end - ray.origin()).dot(perp) / ray.direction().dot(perp);
        if t > 0.0 && shortest.map_or(true, |s| t < s) {
            shortest = Some(t);
        }
    }
    shortest
}

/// The geometric part of a shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Box(BoxShape),
    Circle(CircleShape),
    Point(PointShape),
    Polygon(PolygonShape),
}

/// A drawable collision shape: geometry plus an RGBA color.
///
/// The color is carried for the presentation layer and never affects
/// collision behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    geometry: Geometry,
    color: [f32; 4],
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn new_box(center: Point2, width: f64, height: f64) -> Result<Self, PhysicsError> {
        Ok(Self::new(Geometry::Box(BoxShape::new(center, width, height)?)))
    }

    pub fn new_circle(center: Point2, radius: f64) -> Result<Self, PhysicsError> {
        Ok(Self::new(Geometry::Circle(CircleShape::new(center, radius)?)))
    }

    pub fn new_point(center: Point2) -> Self {
        Self::new(Geometry::Point(PointShape::new(center)))
    }

    pub fn new_polygon(points: Vec<Point2>) -> Result<Self, PhysicsError> {
        Ok(Self::new(Geometry::Polygon(PolygonShape::new(points)?)))
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.set_color(color);
        self
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn kind(&self) -> ShapeKind {
        match &self.geometry {
            Geometry::Box(_) => ShapeKind::Box,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::Polygon(_) => ShapeKind::Polygon,
        }
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Points keep their color; everything else takes the new one.
    pub fn set_color(&mut self, color: [f32; 4]) {
        if !matches!(self.geometry, Geometry::Point(_)) {
            self.color = color;
        }
    }

    pub fn center(&self) -> Point2 {
        match &self.geometry {
            Geometry::Box(b) => b.center,
            Geometry::Circle(c) => c.center,
            Geometry::Point(p) => p.center,
            Geometry::Polygon(p) => p.center,
        }
    }

    pub fn set_center(&mut self, center: Point2) {
        match &mut self.geometry {
            Geometry::Box(b) => b.center = center,
            Geometry::Circle(c) => c.center = center,
            Geometry::Point(p) => p.center = center,
            Geometry::Polygon(p) => p.set_center(center),
        }
    }

    /// Current rotation in radians. Boxes and points always report zero.
    pub fn rotation(&self) -> f64 {
        match &self.geometry {
            Geometry::Box(_) | Geometry::Point(_) => 0.0,
            Geometry::Circle(c) => c.rotation,
            Geometry::Polygon(p) => p.angle,
        }
    }

    pub fn set_rotation(&mut self, theta: f64) {
        match &mut self.geometry {
            Geometry::Box(_) | Geometry::Point(_) => {}
            Geometry::Circle(c) => c.rotation = theta,
            Geometry::Polygon(p) => p.set_rotation(theta),
        }
    }

    /// Adds to the current rotation, wrapping modulo a full turn.
    pub fn rotate(&mut self, theta: f64) {
        match &mut self.geometry {
            Geometry::Box(_) | Geometry::Point(_) => {}
            Geometry::Circle(c) => c.rotation = (c.rotation + theta) % TAU,
            Geometry::Polygon(p) => {
                let target = (p.angle + theta) % TAU;
                p.set_rotation(target);
            }
        }
    }

    /// Extent along the x axis.
    pub fn width(&self) -> f64 {
        match &self.geometry {
            Geometry::Box(b) => b.half_width * 2.0,
            Geometry::Circle(c) => c.radius * 2.0,
            Geometry::Point(_) => 0.0,
            Geometry::Polygon(p) => p.x_interval.width(),
        }
    }

    /// Extent along the y axis.
    pub fn height(&self) -> f64 {
        match &self.geometry {
            Geometry::Box(b) => b.half_height * 2.0,
            Geometry::Circle(c) => c.radius * 2.0,
            Geometry::Point(_) => 0.0,
            Geometry::Polygon(p) => p.y_interval.width(),
        }
    }

    /// Setting a circle's width also sets its height; points ignore
    /// resizing entirely. Negative sizes clamp to zero.
    pub fn set_width(&mut self, width: f64) {
        let width = width.max(0.0);
        match &mut self.geometry {
            Geometry::Box(b) => b.half_width = width / 2.0,
            Geometry::Circle(c) => c.radius = width / 2.0,
            Geometry::Point(_) => {}
            Geometry::Polygon(p) => p.set_width(width),
        }
    }

    pub fn set_height(&mut self, height: f64) {
        let height = height.max(0.0);
        match &mut self.geometry {
            Geometry::Box(b) => b.half_height = height / 2.0,
            Geometry::Circle(c) => c.radius = height / 2.0,
            Geometry::Point(_) => {}
            Geometry::Polygon(p) => p.set_height(height),
        }
    }

    pub fn contains(&self, p: Point2) -> bool {
        match &self.geometry {
            Geometry::Box(b) => b.contains(p),
            Geometry::Circle(c) => c.contains(p),
            Geometry::Point(pt) => pt.contains(p),
            Geometry::Polygon(poly) => poly.contains(p),
        }
    }

    /// Moment of inertia of the shape about its centroid, per unit
    /// mass. Multiply by a body's mass to get the mass moment.
    pub fn moment_of_inertia(&self) -> f64 {
        match &self.geometry {
            Geometry::Box(b) => {
                (4.0 * b.half_width * b.half_width + 4.0 * b.half_height * b.half_height) / 12.0
            }
            Geometry::Circle(c) => c.radius * c.radius / 2.0,
            Geometry::Point(_) => 0.0,
            Geometry::Polygon(p) => p.moment,
        }
    }

    /// Scalar projection of the shape onto the given axis.
    pub fn project_onto(&self, axis: Vec2) -> Interval {
        match &self.geometry {
            Geometry::Box(b) => {
                let corners = b.corners();
                let mut interval = Interval::about(corners[0].dot(axis), 0.0);
                for corner in &corners[1..] {
                    interval = interval.extended_to(corner.dot(axis));
                }
                interval
            }
            Geometry::Circle(c) => {
                let mid = c.center.dot(axis);
                let extent = c.radius * axis.length();
                Interval::new(mid - extent, mid + extent)
            }
            Geometry::Point(p) => Interval::about(p.center.dot(axis), 0.0),
            Geometry::Polygon(p) => {
                let mut interval = Interval::about(p.points[0].dot(axis), 0.0);
                for point in &p.points[1..] {
                    interval = interval.extended_to(point.dot(axis));
                }
                interval
            }
        }
    }

    /// Bounding interval along the x axis.
    pub fn x_interval(&self) -> Interval {
        match &self.geometry {
            Geometry::Box(b) => Interval::about(b.center.x, b.half_width * 2.0),
            Geometry::Circle(c) => Interval::about(c.center.x, c.radius * 2.0),
            Geometry::Point(p) => Interval::about(p.center.x, 0.0),
            Geometry::Polygon(p) => p.x_interval,
        }
    }

    /// Bounding interval along the y axis.
    pub fn y_interval(&self) -> Interval {
        match &self.geometry {
            Geometry::Box(b) => Interval::about(b.center.y, b.half_height * 2.0),
            Geometry::Circle(c) => Interval::about(c.center.y, c.radius * 2.0),
            Geometry::Point(p) => Interval::about(p.center.y, 0.0),
            Geometry::Polygon(p) => p.y_interval,
        }
    }

    /// Distance from the ray's origin to its first intersection with
    /// this shape. Never reports a hit behind the origin.
    pub fn distance_along(&self, ray: &Ray) -> Option<f64> {
        match &self.geometry {
            Geometry::Box(b) => edges_distance_along(&b.corners(), ray),
            Geometry::Polygon(p) => edges_distance_along(&p.points, ray),
            Geometry::Circle(c) => {
                let projection = (c.center - ray.origin()).dot(ray.direction());
                let closest = ray.at_distance(projection);
                if !c.contains(closest) {
                    return None;
                }
                let chord = (c.radius * c.radius - (c.center - closest).length_squared()).sqrt();
                if c.contains(ray.origin()) {
                    Some(projection + chord)
                } else if projection - chord > 0.0 {
                    Some(projection - chord)
                } else {
                    None
                }
            }
            Geometry::Point(p) => {
                let projection = (p.center - ray.origin()).dot(ray.direction());
                if projection < 0.0 {
                    return None;
                }
                if ray.at_distance(projection) == p.center {
                    Some(projection)
                } else {
                    None
                }
            }
        }
    }

    /// Ring vertices used for contact point averaging. Empty for
    /// shapes without vertices.
    pub(crate) fn vertices(&self) -> Vec<Point2> {
        match &self.geometry {
            Geometry::Box(b) => b.corners().to_vec(),
            Geometry::Polygon(p) => p.points.clone(),
            Geometry::Circle(_) | Geometry::Point(_) => Vec::new(),
        }
    }

    /// SAT candidate axes contributed by this shape. Circles and
    /// points contribute axes through pair-specific logic instead.
    pub(crate) fn axes(&self) -> Vec<Vec2> {
        match &self.geometry {
            Geometry::Box(_) => vec![Vec2::Y, Vec2::X],
            Geometry::Polygon(p) => p.axes(),
            Geometry::Circle(_) | Geometry::Point(_) => Vec::new(),
        }
    }
}
