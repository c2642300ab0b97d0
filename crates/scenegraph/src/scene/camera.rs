use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::graph::SceneGraph;
use super::node::{CameraNode, LightNode};
use super::visitor::Visitor;
use crate::geometry::{Matrix4x4, Vec4};

/// World-space camera produced by [`CameraLightVisitor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec4,
    pub center: Vec4,
    pub up: Vec4,
    pub fovy: f64, // degrees
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Unnormalised viewing direction
    pub fn towards(&self) -> Vec4 {
        Vec4::direction(
            self.center.0 - self.eye.0,
            self.center.1 - self.eye.1,
            self.center.2 - self.eye.2,
        )
    }

    pub fn view_matrix(&self) -> Matrix4x4 {
        Matrix4x4::look_at(self.eye, self.center, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4x4 {
        Matrix4x4::perspective(self.fovy, self.aspect, self.near, self.far)
    }
}

/// Resolves the camera and the light positions to world space.
///
/// Lights are reported as `(x, y, z, intensity)`.
#[derive(Debug, Default)]
pub struct CameraLightVisitor {
    current_matrix: Matrix4x4,
    camera: Option<Camera>,
    lights: Vec<Vec4>,
}

impl CameraLightVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, scene: &SceneGraph) -> (Option<Camera>, Vec<Vec4>) {
        self.current_matrix = Matrix4x4::identity();
        self.camera = None;
        self.lights.clear();

        self.traverse(scene);

        debug!(
            "resolved camera: {}, lights: {}",
            self.camera.is_some(),
            self.lights.len()
        );
        (self.camera, std::mem::take(&mut self.lights))
    }
}

impl Visitor for CameraLightVisitor {
    fn current_matrix_mut(&mut self) -> Option<&mut Matrix4x4> {
        Some(&mut self.current_matrix)
    }

    fn visit_camera(&mut self, camera: &CameraNode) {
        if self.camera.is_some() {
            warn!("scene has more than one camera, using the last one visited");
        }
        let m = self.current_matrix;
        self.camera = Some(Camera {
            eye: m * camera.eye,
            center: m * camera.center,
            up: m * camera.up,
            fovy: camera.fovy,
            aspect: camera.aspect,
            near: camera.near,
            far: camera.far,
        });
    }

    fn visit_light(&mut self, light: &LightNode) {
        let p = self.current_matrix * light.position;
        self.lights.push(Vec4(p.0, p.1, p.2, light.intensity));
    }
}
