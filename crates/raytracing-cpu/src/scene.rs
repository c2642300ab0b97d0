//! Flattening of the scene graph into world-space primitives for the CPU tracer.

use scenegraph::{
    geometry::{Matrix4x4, Vec4},
    scene::{AABoxNode, Appearance, Material, PyramidNode, SceneGraph, SphereNode, Visitor},
};
use tracing::debug;

use crate::{
    geometry::{Intersection, ray_aabox, ray_sphere, ray_tetrahedron},
    ray::Ray,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// radius is not scaled by ancestor transforms
    Sphere { center: Vec4, radius: f64 },
    AABox { min: Vec4, max: Vec4 },
    Tetrahedron([Vec4; 4]),
}

impl Shape {
    pub fn face_count(&self) -> usize {
        match self {
            Shape::Sphere { .. } => 1,
            Shape::AABox { .. } => 6,
            Shape::Tetrahedron(_) => 4,
        }
    }
}

/// World-space shape with one colour and material per face.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPrimitive {
    pub shape: Shape,
    pub colors: Vec<Vec4>,
    pub materials: Vec<Material>,
}

impl RenderPrimitive {
    fn new(shape: Shape, appearance: &Appearance) -> Self {
        let faces = shape.face_count();
        RenderPrimitive {
            shape,
            colors: appearance.colors_for(faces),
            materials: appearance.materials_for(faces),
        }
    }

    pub fn intersect(&self, ray: Ray) -> Option<Intersection> {
        match &self.shape {
            Shape::Sphere { center, radius } => ray_sphere(ray, *center, *radius),
            Shape::AABox { min, max } => ray_aabox(ray, *min, *max),
            Shape::Tetrahedron(vertices) => ray_tetrahedron(ray, vertices),
        }
    }

    pub fn color(&self, face: usize) -> Vec4 {
        self.colors[face % self.colors.len()]
    }

    pub fn material(&self, face: usize) -> Material {
        self.materials[face % self.materials.len()]
    }
}

/// Collects every geometric leaf with the accumulated transform applied.
#[derive(Debug, Default)]
pub struct PrimitiveVisitor {
    current_matrix: Matrix4x4,
    primitives: Vec<RenderPrimitive>,
}

impl PrimitiveVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, scene: &SceneGraph) -> Vec<RenderPrimitive> {
        self.current_matrix = Matrix4x4::identity();
        self.primitives.clear();

        self.traverse(scene);

        debug!("collected {} render primitives", self.primitives.len());
        std::mem::take(&mut self.primitives)
    }
}

impl Visitor for PrimitiveVisitor {
    fn current_matrix_mut(&mut self) -> Option<&mut Matrix4x4> {
        Some(&mut self.current_matrix)
    }

    fn visit_sphere(&mut self, sphere: &SphereNode) {
        let shape = Shape::Sphere {
            center: self.current_matrix * sphere.center,
            radius: sphere.radius,
        };
        self.primitives.push(RenderPrimitive::new(shape, &sphere.appearance));
    }

    // only exact while ancestors keep the box axis aligned
    fn visit_aabox(&mut self, aabox: &AABoxNode) {
        let a = self.current_matrix * aabox.min_point;
        let b = self.current_matrix * aabox.max_point;
        let shape = Shape::AABox {
            min: Vec4::elementwise_min(a, b),
            max: Vec4::elementwise_max(a, b),
        };
        self.primitives.push(RenderPrimitive::new(shape, &aabox.appearance));
    }

    fn visit_pyramid(&mut self, pyramid: &PyramidNode) {
        let vertices = pyramid.vertices().map(|v| self.current_matrix * v);
        self.primitives
            .push(RenderPrimitive::new(Shape::Tetrahedron(vertices), &pyramid.appearance));
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use scenegraph::scene::LightNode;

    use super::*;

    fn appearance(colors: &[Vec4]) -> Appearance {
        Appearance::new(colors.to_vec(), vec![Material::default()]).unwrap()
    }

    #[test]
    fn leaves_are_flattened_to_world_space() {
        let mut scene = SceneGraph::new(Matrix4x4::translation(Vec4::direction(0.0, 0.0, 2.0)));
        let root = scene.root();
        let rotated = scene
            .add_group(root, Matrix4x4::rotation(Vec4::direction(0.0, 0.0, FRAC_PI_2)))
            .unwrap();
        scene
            .add(rotated, SphereNode::new(Vec4::point(1.0, 0.0, 0.0), 0.5, Appearance::default()))
            .unwrap();
        scene
            .add(root, LightNode::new(Vec4::point(0.0, 0.0, 0.0), 1.0))
            .unwrap();
        scene
            .add(
                root,
                AABoxNode::new(
                    Vec4::point(-1.0, -1.0, -1.0),
                    Vec4::point(1.0, 1.0, 1.0),
                    appearance(&[Vec4(1.0, 0.0, 0.0, 1.0), Vec4(0.0, 1.0, 0.0, 1.0)]),
                ),
            )
            .unwrap();

        let primitives = PrimitiveVisitor::new().run(&scene);
        assert_eq!(primitives.len(), 2);

        let Shape::Sphere { center, radius } = primitives[0].shape else {
            panic!("expected sphere, got {:?}", primitives[0].shape);
        };
        assert!(center.approx_eq(&Vec4::point(0.0, 1.0, 2.0), 1e-12));
        assert_eq!(radius, 0.5);

        assert_eq!(
            primitives[1].shape,
            Shape::AABox {
                min: Vec4::point(-1.0, -1.0, 1.0),
                max: Vec4::point(1.0, 1.0, 3.0),
            }
        );
        assert_eq!(primitives[1].colors.len(), 6);
        assert_eq!(primitives[1].color(5), Vec4(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn mirrored_box_is_reordered() {
        let mut scene = SceneGraph::new(Matrix4x4::scaling(Vec4::direction(-1.0, 1.0, 1.0)));
        scene
            .add(
                scene.root(),
                AABoxNode::new(Vec4::point(1.0, 0.0, 0.0), Vec4::point(2.0, 1.0, 1.0), Appearance::default()),
            )
            .unwrap();
        let primitives = PrimitiveVisitor::new().run(&scene);
        assert_eq!(
            primitives[0].shape,
            Shape::AABox {
                min: Vec4::point(-2.0, 0.0, 0.0),
                max: Vec4::point(-1.0, 1.0, 1.0),
            }
        );
    }

    #[test]
    fn pyramid_faces_get_colors() {
        let mut scene = SceneGraph::default();
        scene
            .add(
                scene.root(),
                PyramidNode::new(
                    Vec4::point(0.0, 0.0, 0.0),
                    1.0,
                    appearance(&[Vec4(0.0, 1.0, 0.0, 1.0), Vec4(0.0, 0.0, 1.0, 1.0), Vec4(1.0, 0.0, 0.0, 1.0)]),
                ),
            )
            .unwrap();
        let primitives = PrimitiveVisitor::new().run(&scene);
        assert_eq!(primitives[0].colors.len(), 4);
        assert_eq!(primitives[0].color(3), Vec4(0.0, 1.0, 0.0, 1.0));
        assert_eq!(primitives[0].materials.len(), 4);
    }
}
