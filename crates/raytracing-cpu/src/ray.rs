use scenegraph::{geometry::Vec4, scene::Camera};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec4,
    // unit length, w = 0
    pub direction: Vec4,
}

impl Ray {
    pub fn at(&self, t: f64) -> Vec4 {
        self.origin + self.direction * t
    }
}

/// Primary ray through the centre of raster pixel `(x, y)`.
///
/// Raster row 0 is the bottom of the view; the render loop mirrors rows when
/// the output surface has its origin at the top.
pub fn generate_ray(camera: &Camera, width: u32, height: u32, x: u32, y: u32) -> Ray {
    let half_extent = (camera.fovy.to_radians() / 2.0).tan() * camera.near;

    let ndc_x = ((x as f64 + 0.5) / width as f64) * 2.0 - 1.0;
    let ndc_y = ((y as f64 + 0.5) / height as f64) * 2.0 - 1.0;
    let w = ndc_x * half_extent * camera.aspect;
    let h = ndc_y * half_extent;

    // same basis as Matrix4x4::look_at
    let forward = camera.towards().normalized();
    let right = Vec4::cross(forward, camera.up).normalized();
    let up = Vec4::cross(right, forward);

    let direction = (forward * camera.near + right * w + up * h).normalized();

    Ray {
        origin: camera.eye,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use scenegraph::geometry::Matrix4x4;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn camera(fovy: f64, aspect: f64) -> Camera {
        Camera {
            eye: Vec4::point(0.0, 0.0, -5.0),
            center: Vec4::point(0.0, 0.0, 0.0),
            up: Vec4::direction(0.0, 1.0, 0.0),
            fovy,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    #[test]
    fn single_pixel_looks_straight_ahead() {
        let ray = generate_ray(&camera(60.0, 1.0), 1, 1, 0, 0);
        assert!(ray.direction.approx_eq(&Vec4::direction(0.0, 0.0, 1.0), EPSILON));
        assert_eq!(ray.origin, Vec4::point(0.0, 0.0, -5.0));
        assert!(ray.at(5.0).approx_eq(&Vec4::point(0.0, 0.0, 0.0), EPSILON));
    }

    #[test]
    fn edge_pixels_span_the_field_of_view() {
        let cam = camera(90.0, 1.0);
        let size = 1000;
        let top = generate_ray(&cam, size, size, size / 2, size - 1);
        // vertical angle to the top pixel centre approaches fovy / 2
        let angle = top.direction.y().atan2(top.direction.z()).to_degrees();
        assert!(angle > 44.9 && angle < 45.0, "angle {}", angle);
    }

    #[test]
    fn rays_agree_with_view_matrix() {
        // a ray to the right of the image must land on the positive x side of view space
        let cam = camera(60.0, 2.0);
        let ray = generate_ray(&cam, 4, 2, 3, 1);
        let view = Matrix4x4::look_at(cam.eye, cam.center, cam.up);
        let in_view = view * ray.direction;
        assert!(in_view.x() > 0.0);
        assert!(in_view.y() > 0.0);
        assert!(in_view.z() < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < EPSILON);
    }
}
