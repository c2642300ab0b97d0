//! Scene graph nodes. Leaves carry geometry, a camera or a light; groups carry
//! a local transform and an ordered child list.
//!
//! Children are referenced by [`NodeId`] into the owning [`SceneGraph`](super::SceneGraph)
//! arena, so animation drivers can point at nodes without sharing ownership.

use serde::{Deserialize, Serialize};

use super::appearance::Appearance;
use crate::geometry::{Matrix4x4, Vec4};

/// Index into the owning scene graph's node arena
pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Group(GroupNode),
    Sphere(SphereNode),
    AABox(AABoxNode),
    Pyramid(PyramidNode),
    Camera(CameraNode),
    Light(LightNode),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Group(_) => "group",
            Node::Sphere(_) => "sphere",
            Node::AABox(_) => "aabox",
            Node::Pyramid(_) => "pyramid",
            Node::Camera(_) => "camera",
            Node::Light(_) => "light",
        }
    }

    pub fn appearance(&self) -> Option<&Appearance> {
        match self {
            Node::Sphere(s) => Some(&s.appearance),
            Node::AABox(b) => Some(&b.appearance),
            Node::Pyramid(p) => Some(&p.appearance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub matrix: Matrix4x4,
    // traversal order
    pub children: Vec<NodeId>,
}

impl GroupNode {
    pub fn new(matrix: Matrix4x4) -> Self {
        GroupNode {
            matrix,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereNode {
    pub center: Vec4,
    pub radius: f64,
    pub appearance: Appearance,
}

impl SphereNode {
    pub fn new(center: Vec4, radius: f64, appearance: Appearance) -> Self {
        SphereNode {
            center,
            radius,
            appearance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AABoxNode {
    pub min_point: Vec4,
    pub max_point: Vec4,
    pub appearance: Appearance,
}

impl AABoxNode {
    pub fn new(min_point: Vec4, max_point: Vec4, appearance: Appearance) -> Self {
        AABoxNode {
            min_point,
            max_point,
            appearance,
        }
    }
}

/// Regular tetrahedron standing on its base triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidNode {
    /// centre of the base triangle
    pub center: Vec4,
    pub height: f64,
    pub appearance: Appearance,
}

impl PyramidNode {
    pub fn new(center: Vec4, height: f64, appearance: Appearance) -> Self {
        PyramidNode {
            center,
            height,
            appearance,
        }
    }

    /// Vertices in local space: three base corners followed by the apex.
    pub fn vertices(&self) -> [Vec4; 4] {
        let c = self.center;
        let h = self.height;
        let a = (8.0f64 / 9.0).sqrt();
        let b = (2.0f64 / 9.0).sqrt();
        let d = (2.0f64 / 3.0).sqrt();
        [
            c + Vec4::direction(a * h, 0.0, 0.0),
            c + Vec4::direction(-b * h, 0.0, d * h),
            c + Vec4::direction(-b * h, 0.0, -d * h),
            c + Vec4::direction(0.0, 4.0 / 3.0 * h, 0.0),
        ]
    }
}

/// Camera in its canonical `eye`/`center` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraNode {
    pub eye: Vec4,
    pub center: Vec4,
    pub up: Vec4,
    /// vertical field of view in degrees
    pub fovy: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl CameraNode {
    pub fn new(eye: Vec4, center: Vec4, up: Vec4, fovy: f64, aspect: f64, near: f64, far: f64) -> Self {
        CameraNode {
            eye,
            center,
            up,
            fovy,
            aspect,
            near,
            far,
        }
    }

    /// Builds a camera from a viewing direction instead of a target point.
    pub fn looking_towards(
        eye: Vec4,
        towards: Vec4,
        up: Vec4,
        fovy: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let center = Vec4::point(eye.0 + towards.0, eye.1 + towards.1, eye.2 + towards.2);
        Self::new(eye, center, up, fovy, aspect, near, far)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightNode {
    pub position: Vec4,
    pub intensity: f64,
}

impl LightNode {
    pub fn new(position: Vec4, intensity: f64) -> Self {
        LightNode { position, intensity }
    }
}

macro_rules! impl_into_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::$variant(value)
                }
            }
        )*
    };
}

impl_into_node!(
    Group(GroupNode),
    Sphere(SphereNode),
    AABox(AABoxNode),
    Pyramid(PyramidNode),
    Camera(CameraNode),
    Light(LightNode),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_towards_resolves_center() {
        let cam = CameraNode::looking_towards(
            Vec4::point(1.0, 2.0, 3.0),
            Vec4::direction(0.0, 0.0, -1.0),
            Vec4::direction(0.0, 1.0, 0.0),
            60.0,
            1.0,
            0.1,
            100.0,
        );
        assert_eq!(cam.center, Vec4::point(1.0, 2.0, 2.0));
    }

    #[test]
    fn pyramid_is_regular() {
        let pyramid = PyramidNode::new(Vec4::point(0.0, 0.0, 0.0), 1.5, Appearance::default());
        let v = pyramid.vertices();
        let edge = (v[0] - v[1]).length();
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert!(((v[i] - v[j]).length() - edge).abs() < 1e-9);
            }
            assert_eq!(v[i].w(), 1.0);
        }
        // base centroid is the pyramid centre
        let centroid = (v[0] + v[1] + v[2]) / 3.0;
        assert!(centroid.approx_eq(&Vec4::point(0.0, 0.0, 0.0), 1e-9));
        assert!((v[3].y() - 2.0).abs() < 1e-9);
    }
}
