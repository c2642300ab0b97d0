use std::time::Instant;

use ray::generate_ray;
use scenegraph::{
    geometry::Vec4,
    renderer::{RaytracerSettings, RenderOutput, RenderingBackend, to_rgba8},
    scene::{Camera, SceneGraph},
};
use tracing::{debug, info};

mod geometry;
mod ray;
mod scene;
mod shading;
pub mod utils;


pub use geometry::Intersection;
pub use ray::Ray;
pub use scene::{PrimitiveVisitor, RenderPrimitive, Shape};
pub use shading::phong;

/// Nearest hit over all primitives, with the primitive that produced it.
fn nearest_hit<'p>(primitives: &'p [RenderPrimitive], ray: Ray) -> Option<(Intersection, &'p RenderPrimitive)> {
    let mut nearest = Intersection::miss();
    let mut owner = None;
    for primitive in primitives {
        if let Some(hit) = primitive.intersect(ray) {
            if hit.closer_than(&nearest) {
                nearest = hit;
                owner = Some(primitive);
            }
        }
    }
    owner.map(|primitive| (nearest, primitive))
}

fn shade(hit: &Intersection, primitive: &RenderPrimitive, camera: &Camera, lights: &[Vec4]) -> Vec4 {
    phong(
        primitive.color(hit.face),
        hit,
        lights,
        &primitive.material(hit.face),
        camera.eye,
    )
}

/// Renders one frame a scanline at a time.
///
/// Each call to `next` traces one raster row and yields its index; the image
/// is only handed out by [`FrameRenderer::finish`], so dropping the renderer
/// part way through abandons the frame without publishing partial results.
pub struct FrameRenderer<'a> {
    camera: &'a Camera,
    lights: &'a [Vec4],
    settings: RaytracerSettings,
    primitives: Vec<RenderPrimitive>,
    next_row: u32,
    output: RenderOutput,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(
        scene: &SceneGraph,
        camera: &'a Camera,
        lights: &'a [Vec4],
        width: u32,
        height: u32,
        settings: &RaytracerSettings,
    ) -> Self {
        let (width, height) = settings.scaled_size(width, height);
        let primitives = PrimitiveVisitor::new().run(scene);

        FrameRenderer {
            camera,
            lights,
            settings: settings.clone(),
            primitives,
            next_row: 0,
            output: RenderOutput::new(width, height, settings.background),
        }
    }

    pub fn width(&self) -> u32 {
        self.output.width
    }

    pub fn height(&self) -> u32 {
        self.output.height
    }

    pub fn rows_remaining(&self) -> u32 {
        self.output.height - self.next_row
    }

    fn render_row(&mut self, y: u32) {
        let (width, height) = (self.output.width, self.output.height);
        let out_row = self.settings.output_row(height, y);

        for x in 0..width {
            let ray = generate_ray(self.camera, width, height, x, y);
            if let Some((hit, primitive)) = nearest_hit(&self.primitives, ray) {
                let color = shade(&hit, primitive, self.camera, self.lights);
                self.output.set_pixel(x, out_row, to_rgba8(color));
            }
        }
    }

    /// Traces any rows not yet rendered and returns the finished image.
    pub fn finish(mut self) -> RenderOutput {
        while self.next().is_some() {}
        self.output
    }
}

impl Iterator for FrameRenderer<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next_row >= self.output.height {
            return None;
        }
        let y = self.next_row;
        self.render_row(y);
        self.next_row += 1;
        Some(y)
    }
}

pub fn render(scene: &SceneGraph, camera: &Camera, lights: &[Vec4], width: u32, height: u32) -> RenderOutput {
    render_with_settings(scene, camera, lights, width, height, &RaytracerSettings::default())
}

pub fn render_with_settings(
    scene: &SceneGraph,
    camera: &Camera,
    lights: &[Vec4],
    width: u32,
    height: u32,
    settings: &RaytracerSettings,
) -> RenderOutput {
    let t = Instant::now();
    let renderer = FrameRenderer::new(scene, camera, lights, width, height, settings);
    debug!(
        "tracing {}x{} pixels against {} lights",
        renderer.width(),
        renderer.height(),
        lights.len()
    );
    let output = renderer.finish();
    info!("render: {:.2}s", t.elapsed().as_secs_f64());
    output
}

/// What a single pixel's primary ray sees.
#[derive(Debug, Clone, Copy)]
pub struct PixelSample {
    pub hit: bool,
    pub t: f64,
    pub point: Vec4,
    pub normal: Vec4,
    pub color: Vec4,
}

/// Traces the pixel at output coordinates `(x, y)` of a `width` x `height` image.
///
/// Coordinates address the image [`render_with_settings`] produces, i.e. after
/// `resolution_divisor` is applied. Returns `None` outside that image.
#[allow(clippy::too_many_arguments)]
pub fn render_single_pixel(
    scene: &SceneGraph,
    camera: &Camera,
    lights: &[Vec4],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    settings: &RaytracerSettings,
) -> Option<PixelSample> {
    let (width, height) = settings.scaled_size(width, height);
    if x >= width || y >= height {
        return None;
    }
    let primitives = PrimitiveVisitor::new().run(scene);
    let raster_y = settings.output_row(height, y);
    let ray = generate_ray(camera, width, height, x, raster_y);

    let sample = match nearest_hit(&primitives, ray) {
        Some((hit, primitive)) => PixelSample {
            hit: true,
            t: hit.t,
            point: hit.point,
            normal: hit.normal,
            color: shade(&hit, primitive, camera, lights),
        },
        None => PixelSample {
            hit: false,
            t: f64::INFINITY,
            point: Vec4::zero(),
            normal: Vec4::zero(),
            color: settings.background,
        },
    };
    Some(sample)
}

/// Software ray tracer behind the common backend interface.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl RenderingBackend for CpuBackend {
    fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &Camera,
        lights: &[Vec4],
        width: u32,
        height: u32,
        settings: &RaytracerSettings,
    ) -> RenderOutput {
        render_with_settings(scene, camera, lights, width, height, settings)
    }
}
