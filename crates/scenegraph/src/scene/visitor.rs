//! Double-dispatch traversal of a [`SceneGraph`].
//!
//! A visitor overrides the `visit_*` methods for the node variants it cares
//! about; the group default recurses through [`walk_group`]. Visitors that
//! track the accumulated world transform expose it via
//! [`Visitor::current_matrix_mut`], and [`walk_group`] composes each group's
//! local matrix on entry and restores the previous value on exit.

use super::graph::SceneGraph;
use super::node::{AABoxNode, CameraNode, GroupNode, LightNode, PyramidNode, SphereNode};
use crate::geometry::Matrix4x4;

pub trait Visitor {
    /// Accumulated transform, for visitors that track one.
    fn current_matrix_mut(&mut self) -> Option<&mut Matrix4x4> {
        None
    }

    fn visit_group(&mut self, scene: &SceneGraph, group: &GroupNode) {
        walk_group(self, scene, group);
    }

    fn visit_sphere(&mut self, _sphere: &SphereNode) {}

    fn visit_aabox(&mut self, _aabox: &AABoxNode) {}

    fn visit_pyramid(&mut self, _pyramid: &PyramidNode) {}

    fn visit_camera(&mut self, _camera: &CameraNode) {}

    fn visit_light(&mut self, _light: &LightNode) {}

    /// Visits the whole graph starting at its root.
    fn traverse(&mut self, scene: &SceneGraph) {
        scene.accept(scene.root(), self);
    }
}

/// Visits `group`'s children in order, with the group's matrix composed onto
/// the visitor's current matrix for the duration of the call.
pub fn walk_group<V: Visitor + ?Sized>(visitor: &mut V, scene: &SceneGraph, group: &GroupNode) {
    let saved = visitor.current_matrix_mut().map(|current| {
        let previous = *current;
        *current = previous * group.matrix;
        previous
    });

    for &child in &group.children {
        scene.accept(child, visitor);
    }

    if let (Some(previous), Some(current)) = (saved, visitor.current_matrix_mut()) {
        *current = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec4;
    use crate::scene::{Appearance, LightNode, SphereNode};

    #[derive(Default)]
    struct Recorder {
        current: Matrix4x4,
        spheres: Vec<Vec4>,
        lights: Vec<Vec4>,
    }

    impl Visitor for Recorder {
        fn current_matrix_mut(&mut self) -> Option<&mut Matrix4x4> {
            Some(&mut self.current)
        }

        fn visit_sphere(&mut self, sphere: &SphereNode) {
            self.spheres.push(self.current * sphere.center);
        }

        fn visit_light(&mut self, light: &LightNode) {
            self.lights.push(self.current * light.position);
        }
    }

    #[derive(Default)]
    struct Counter {
        leaves: usize,
    }

    impl Visitor for Counter {
        fn visit_sphere(&mut self, _sphere: &SphereNode) {
            self.leaves += 1;
        }

        fn visit_light(&mut self, _light: &LightNode) {
            self.leaves += 1;
        }
    }

    fn nested_scene() -> SceneGraph {
        let mut scene = SceneGraph::new(Matrix4x4::translation(Vec4::direction(1.0, 0.0, 0.0)));
        let root = scene.root();
        let inner = scene
            .add_group(root, Matrix4x4::translation(Vec4::direction(0.0, 2.0, 0.0)))
            .unwrap();
        scene
            .add(inner, SphereNode::new(Vec4::point(0.0, 0.0, 3.0), 1.0, Appearance::default()))
            .unwrap();
        // sibling after the nested group must not see the inner translation
        scene
            .add(root, LightNode::new(Vec4::point(0.0, 0.0, 0.0), 1.0))
            .unwrap();
        scene
    }

    #[test]
    fn matrices_compose_and_restore() {
        let scene = nested_scene();
        let mut recorder = Recorder::default();
        recorder.traverse(&scene);

        assert_eq!(recorder.spheres, vec![Vec4::point(1.0, 2.0, 3.0)]);
        assert_eq!(recorder.lights, vec![Vec4::point(1.0, 0.0, 0.0)]);
        assert_eq!(recorder.current, Matrix4x4::identity());
    }

    #[test]
    fn visitors_without_matrix_still_recurse() {
        let scene = nested_scene();
        let mut counter = Counter::default();
        counter.traverse(&scene);
        assert_eq!(counter.leaves, 2);
    }

    #[test]
    fn same_visitor_can_run_twice() {
        let scene = nested_scene();
        let mut recorder = Recorder::default();
        recorder.traverse(&scene);
        recorder.traverse(&scene);
        assert_eq!(recorder.spheres.len(), 2);
        assert_eq!(recorder.spheres[0], recorder.spheres[1]);
    }
}
