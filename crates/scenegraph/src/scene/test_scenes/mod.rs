//! Builtin scenes used as a smoke test for the backends and as starting points for the cli.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::{AnimationNode, TransformKind},
    error::Result,
    geometry::{Matrix4x4, Vec4},
    renderer::RaytracerSettings,
    scene::{
        AABoxNode, Appearance, CameraNode, LightNode, Material, NodeId, PyramidNode, SceneDescription,
        SceneGraph, SphereNode,
    },
};

const RED: Vec4 = Vec4(1.0, 0.0, 0.0, 1.0);
const GREEN: Vec4 = Vec4(0.0, 1.0, 0.0, 1.0);
const BLUE: Vec4 = Vec4(0.0, 0.0, 1.0, 1.0);

fn up() -> Vec4 {
    Vec4::direction(0.0, 1.0, 0.0)
}

/// A unit sphere lit and viewed head-on from `(0, 0, -5)`.
pub fn single_sphere_scene() -> Result<SceneDescription> {
    let mut scene = SceneGraph::new(Matrix4x4::identity());
    let root = scene.root();
    scene.add(
        root,
        SphereNode::new(
            Vec4::point(0.0, 0.0, 0.0),
            1.0,
            Appearance::solid(RED, Material::default()),
        ),
    )?;
    scene.add(root, LightNode::new(Vec4::point(0.0, 0.0, -5.0), 1.0))?;
    scene.add(
        root,
        CameraNode::new(
            Vec4::point(0.0, 0.0, -5.0),
            Vec4::point(0.0, 0.0, 0.0),
            up(),
            60.0,
            1.0,
            0.1,
            100.0,
        ),
    )?;
    Ok(SceneDescription::new(scene, Vec::new()))
}

pub fn two_spheres_scene() -> Result<SceneDescription> {
    let mut scene = SceneGraph::new(Matrix4x4::identity());
    let root = scene.root();
    scene.add(
        root,
        SphereNode::new(
            Vec4::point(0.5, -0.2, 0.0),
            0.4,
            Appearance::solid(Vec4(0.3, 0.0, 0.0, 1.0), Material::default()),
        ),
    )?;
    scene.add(
        root,
        SphereNode::new(
            Vec4::point(-0.5, -0.2, 0.5),
            0.4,
            Appearance::solid(Vec4(0.0, 0.0, 0.3, 1.0), Material::default()),
        ),
    )?;
    scene.add(root, LightNode::new(Vec4::point(1.0, 1.0, -1.0), 1.0))?;
    scene.add(
        root,
        CameraNode::new(
            Vec4::point(0.0, 0.0, -2.0),
            Vec4::point(0.0, 0.0, 0.0),
            up(),
            60.0,
            1.0,
            0.1,
            100.0,
        ),
    )?;
    Ok(SceneDescription::new(scene, Vec::new()))
}

/// Flight controls for the camera group, all inactive until switched on.
fn flight_animations(camera_group: NodeId) -> Vec<AnimationNode> {
    let axes = [
        Vec4::direction(0.0, 0.0, -1.0),
        Vec4::direction(0.0, 0.0, 1.0),
        Vec4::direction(-1.0, 0.0, 0.0),
        Vec4::direction(1.0, 0.0, 0.0),
        Vec4::direction(0.0, 1.0, 0.0),
        Vec4::direction(0.0, -1.0, 0.0),
    ];
    let rotations = [
        Vec4::direction(-1.0, 0.0, 0.0),
        Vec4::direction(1.0, 0.0, 0.0),
        Vec4::direction(0.0, 1.0, 0.0),
        Vec4::direction(0.0, -1.0, 0.0),
        Vec4::direction(0.0, 0.0, 1.0),
        Vec4::direction(0.0, 0.0, -1.0),
    ];

    axes.into_iter()
        .map(|axis| AnimationNode::direct(camera_group, 1.0, false, axis, TransformKind::Translation))
        .chain(
            rotations
                .into_iter()
                .map(|axis| AnimationNode::direct(camera_group, 1.0, false, axis, TransformKind::Rotation)),
        )
        .collect()
}

/// Default editor scene: nested groups with a sphere, a box and a pyramid,
/// two dim side lights, and a camera on its own group for flight controls.
pub fn editor_scene() -> Result<SceneDescription> {
    let mut scene = SceneGraph::new(Matrix4x4::identity());
    let root = scene.root();
    let material = Material::default();

    let camera_group = scene.add_group(root, Matrix4x4::identity())?;
    let upper = scene.add_group(root, Matrix4x4::translation(Vec4::direction(1.0, 1.0, 0.0)))?;
    let swinging = scene.add_group(upper, Matrix4x4::identity())?;
    scene.add(
        swinging,
        SphereNode::new(
            Vec4::point(0.5, -0.8, 0.0),
            0.4,
            Appearance::solid(Vec4(0.8, 0.4, 0.1, 1.0), material)
                .with_texture("assets/diamond_ore.png", Some("assets/diamond_ore_n.png".to_string())),
        ),
    )?;

    let box_group = scene.add_group(root, Matrix4x4::translation(Vec4::direction(-0.7, -0.4, 0.1)))?;
    let spinning = scene.add_group(root, Matrix4x4::identity())?;
    scene.add(
        box_group,
        AABoxNode::new(
            Vec4::point(-1.0, -1.0, -1.0),
            Vec4::point(1.0, 1.0, 1.0),
            Appearance::solid(GREEN, material)
                .with_texture("assets/diamond_ore.png", Some("assets/diamond_ore_n.png".to_string())),
        ),
    )?;

    scene.add(
        upper,
        PyramidNode::new(
            Vec4::point(1.1, -1.5, 0.5),
            1.5,
            Appearance::new(vec![GREEN, BLUE, RED], vec![material])?
                .with_texture("assets/diamond_ore.png", Some("assets/diamond_ore_n.png".to_string())),
        ),
    )?;
    scene.add(upper, LightNode::new(Vec4::point(-10.0, 3.0, 3.0), 0.2))?;
    scene.add(upper, LightNode::new(Vec4::point(10.0, 3.0, 3.0), 0.2))?;

    scene.add(
        camera_group,
        CameraNode::new(
            Vec4::point(0.0, 0.0, 10.0),
            Vec4::point(0.0, 0.0, 0.0),
            up(),
            60.0,
            1.0,
            0.1,
            100.0,
        ),
    )?;

    let mut animations = flight_animations(camera_group);
    animations.push(AnimationNode::direct(
        box_group,
        1.0,
        false,
        Vec4::direction(0.0, 0.5, 0.5),
        TransformKind::Rotation,
    ));
    animations.push(AnimationNode::back_and_forth(
        swinging,
        1.0,
        true,
        Vec4::direction(0.0, 0.0, 1.0),
        TransformKind::Translation,
        3.0,
        1.5,
    )?);
    animations.push(AnimationNode::direct(
        spinning,
        1.0,
        true,
        Vec4::direction(1.0, 0.0, 0.0),
        TransformKind::Rotation,
    ));

    Ok(SceneDescription::new(scene, animations))
}

/// Seeded field of spheres in front of the camera.
pub fn random_spheres_scene() -> Result<SceneDescription> {
    const COUNT: usize = 24;
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut scene = SceneGraph::new(Matrix4x4::identity());
    let root = scene.root();
    for _ in 0..COUNT {
        let center = Vec4::point(
            rng.random_range(-3.0..3.0),
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
        );
        let color = Vec4(rng.random(), rng.random(), rng.random(), 1.0);
        let material = Material::new(
            rng.random_range(0.1..0.4),
            rng.random_range(0.4..0.8),
            rng.random_range(0.0..1.5),
            rng.random_range(2.0..32.0),
        );
        scene.add(
            root,
            SphereNode::new(center, rng.random_range(0.2..0.6), Appearance::solid(color, material)),
        )?;
    }

    scene.add(root, LightNode::new(Vec4::point(-5.0, 5.0, 8.0), 0.8))?;
    scene.add(root, LightNode::new(Vec4::point(5.0, 2.0, 8.0), 0.4))?;
    scene.add(
        root,
        CameraNode::new(
            Vec4::point(0.0, 0.0, 10.0),
            Vec4::point(0.0, 0.0, 0.0),
            up(),
            50.0,
            1.0,
            0.1,
            100.0,
        ),
    )?;
    Ok(SceneDescription::new(scene, Vec::new()))
}

pub struct TestScene {
    pub name: &'static str,
    pub scene_func: fn() -> Result<SceneDescription>,
    pub settings_func: fn() -> RaytracerSettings,
}

pub const fn all_test_scenes() -> &'static [TestScene] {
    &[
        TestScene {
            name: "single_sphere",
            scene_func: single_sphere_scene,
            settings_func: RaytracerSettings::default,
        },
        TestScene {
            name: "two_spheres",
            scene_func: two_spheres_scene,
            settings_func: RaytracerSettings::default,
        },
        TestScene {
            name: "editor",
            scene_func: editor_scene,
            // dark grey backdrop so the dim side lights are easier to judge
            settings_func: || RaytracerSettings {
                background: Vec4(0.1, 0.1, 0.1, 1.0),
                ..Default::default()
            },
        },
        TestScene {
            name: "random_spheres",
            scene_func: random_spheres_scene,
            settings_func: RaytracerSettings::default,
        },
    ]
}

pub fn find_test_scene(name: &str) -> Option<&'static TestScene> {
    all_test_scenes().iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CameraLightVisitor;

    #[test]
    fn every_scene_builds_with_a_camera() {
        for test_scene in all_test_scenes() {
            let description = (test_scene.scene_func)().unwrap();
            description.validate().unwrap();
            let (camera, lights) = CameraLightVisitor::new().run(&description.scene);
            assert!(camera.is_some(), "scene {} has no camera", test_scene.name);
            assert!(!lights.is_empty(), "scene {} has no lights", test_scene.name);
        }
    }

    #[test]
    fn editor_scene_layout() {
        let description = editor_scene().unwrap();
        assert_eq!(description.animations.len(), 15);
        assert_eq!(description.animations.iter().filter(|a| a.active).count(), 2);

        // side lights sit under the (1, 1, 0) translation
        let (_, lights) = CameraLightVisitor::new().run(&description.scene);
        assert_eq!(lights, vec![Vec4(-9.0, 4.0, 3.0, 0.2), Vec4(11.0, 4.0, 3.0, 0.2)]);
    }

    #[test]
    fn random_scene_is_deterministic() {
        assert_eq!(random_spheres_scene().unwrap(), random_spheres_scene().unwrap());
    }

    #[test]
    fn lookup_by_name() {
        assert!(find_test_scene("editor").is_some());
        assert!(find_test_scene("teapot").is_none());
    }
}
