use scenegraph::{geometry::Vec4, scene::Material};
use tracing::warn;

use crate::geometry::Intersection;

/// Phong illumination of `hit` by point lights given as `(x, y, z, intensity)`.
///
/// Each light is attenuated by `intensity / distance`. The returned alpha is
/// the base colour's alpha.
pub fn phong(base_color: Vec4, hit: &Intersection, lights: &[Vec4], material: &Material, camera_eye: Vec4) -> Vec4 {
    let normal = hit.normal.normalized();
    let view_dir = (camera_eye - hit.point).normalized();

    let mut diffuse_sum = 0.0;
    let mut specular_sum = 0.0;
    for light in lights {
        let light_vec = Vec4::direction(
            light.0 - hit.point.0,
            light.1 - hit.point.1,
            light.2 - hit.point.2,
        );
        let distance = light_vec.length();
        if distance == 0.0 {
            warn!("light at {:?} coincides with the shaded point, skipping it", light);
            continue;
        }
        let light_dir = light_vec / distance;
        let lj = light.3 / distance;

        diffuse_sum += lj * f64::max(Vec4::dot(light_dir, normal), 0.0);

        let incoming = -light_dir;
        let reflect = incoming - normal * (2.0 * Vec4::dot(normal, incoming));
        // clamp before powf, a negative base with fractional exponent is NaN
        let spec_angle = f64::max(Vec4::dot(reflect.normalized(), view_dir), 0.0);
        specular_sum += lj * spec_angle.powf(material.shininess);
    }

    let mut color = base_color * material.ambient
        + base_color * (material.diffuse * diffuse_sum)
        + base_color * (material.specular * specular_sum);
    color.3 = base_color.3;
    color
}
