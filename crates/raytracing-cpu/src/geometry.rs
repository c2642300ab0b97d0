use scenegraph::geometry::Vec4;

use crate::ray::Ray;

/// Hits at or below this distance are treated as self-intersections.
pub(crate) const T_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// distance along the ray, `f64::INFINITY` for a miss
    pub t: f64,
    pub point: Vec4,
    pub normal: Vec4,
    /// face index used to pick per-face colours and materials
    pub face: usize,
}

impl Intersection {
    pub fn miss() -> Self {
        Intersection {
            t: f64::INFINITY,
            point: Vec4::zero(),
            normal: Vec4::zero(),
            face: 0,
        }
    }

    pub fn closer_than(&self, other: &Intersection) -> bool {
        self.t < other.t
    }
}

/// Nearest hit in front of the origin. A ray starting inside the sphere reports
/// the exit point; a tangent ray reports the touching point.
pub(crate) fn ray_sphere(ray: Ray, center: Vec4, radius: f64) -> Option<Intersection> {
    let d = ray.origin - center;
    let b = Vec4::dot(d, ray.direction);
    let c = Vec4::dot(d, d) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    let t = if near > T_EPSILON {
        near
    } else if far > T_EPSILON {
        far
    } else {
        return None;
    };

    let point = ray.at(t);
    Some(Intersection {
        t,
        point,
        normal: (point - center).normalized(),
        face: 0,
    })
}

// (axis, use max corner, outward normal sign) in face order front, back, top, bottom, left, right
const BOX_FACES: [(usize, bool, f64); 6] = [
    (2, true, 1.0),
    (2, false, -1.0),
    (1, true, 1.0),
    (1, false, -1.0),
    (0, false, -1.0),
    (0, true, 1.0),
];

/// Every face plane hit of an axis-aligned box whose point lies strictly inside
/// the face, sorted nearest first.
pub(crate) fn aabox_candidates(ray: Ray, min: Vec4, max: Vec4) -> Vec<Intersection> {
    let mut candidates = Vec::with_capacity(2);

    for (face, &(axis, use_max, sign)) in BOX_FACES.iter().enumerate() {
        let denom = ray.direction[axis];
        if denom == 0.0 {
            continue;
        }

        let offset = if use_max { max[axis] } else { min[axis] };
        let t = (offset - ray.origin[axis]) / denom;
        if t <= T_EPSILON {
            continue;
        }

        let point = ray.at(t);
        let inside = (0..3)
            .filter(|&other| other != axis)
            .all(|other| point[other] > min[other] && point[other] < max[other]);
        if !inside {
            continue;
        }

        let mut normal = Vec4::zero();
        normal[axis] = sign;
        candidates.push(Intersection {
            t,
            point,
            normal,
            face,
        });
    }

    candidates.sort_by(|a, b| a.t.total_cmp(&b.t));
    candidates
}

pub(crate) fn ray_aabox(ray: Ray, min: Vec4, max: Vec4) -> Option<Intersection> {
    aabox_candidates(ray, min, max).into_iter().next()
}

/// Moller-Trumbore; returns `(t, u, v)` for hits in front of the origin.
pub(crate) fn ray_triangle_intersect(p0: Vec4, p1: Vec4, p2: Vec4, ray: Ray) -> Option<(f64, f64, f64)> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;

    let p = Vec4::cross(ray.direction, e2);
    let denom = Vec4::dot(p, e1);
    if denom == 0.0 {
        return None;
    }

    let s = ray.origin - p0;
    let u = Vec4::dot(p, s) / denom;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = Vec4::cross(s, e1);
    let v = Vec4::dot(q, ray.direction) / denom;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = Vec4::dot(q, e2) / denom;
    if t <= T_EPSILON {
        return None;
    }
    Some((t, u, v))
}

// base first, then the three sides
const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

pub(crate) fn ray_tetrahedron(ray: Ray, vertices: &[Vec4; 4]) -> Option<Intersection> {
    let centroid = (vertices[0] + vertices[1] + vertices[2] + vertices[3]) / 4.0;

    let mut nearest: Option<Intersection> = None;
    for (face, [a, b, c]) in TETRAHEDRON_FACES.iter().enumerate() {
        let (p0, p1, p2) = (vertices[*a], vertices[*b], vertices[*c]);
        let Some((t, _, _)) = ray_triangle_intersect(p0, p1, p2, ray) else {
            continue;
        };
        if nearest.is_some_and(|n| n.t <= t) {
            continue;
        }

        let mut normal = Vec4::cross(p1 - p0, p2 - p0).normalized();
        if Vec4::dot(normal, p0 - centroid) < 0.0 {
            normal = -normal;
        }
        nearest = Some(Intersection {
            t,
            point: ray.at(t),
            normal,
            face,
        });
    }
    nearest
}
