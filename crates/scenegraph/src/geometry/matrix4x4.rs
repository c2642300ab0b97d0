use std::ops::{Index, IndexMut, Mul};

use serde::{Deserialize, Serialize};

use super::Vec4;
use crate::error::{Result, SceneError};

/// 4x4 transform. `a * b` is the transform that applies `b` first, then `a`
/// (column vectors, pre-multiplication).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix4x4 {
    // row-major
    pub data: [[f64; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4::identity()
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index / 4][index % 4]
    }
}

impl IndexMut<usize> for Matrix4x4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index / 4][index % 4]
    }
}

impl Matrix4x4 {
    pub fn identity() -> Self {
        Matrix4x4 {
            data: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub fn create(a11: f64, a12: f64, a13: f64, a14: f64,
                  a21: f64, a22: f64, a23: f64, a24: f64,
                  a31: f64, a32: f64, a33: f64, a34: f64,
                  a41: f64, a42: f64, a43: f64, a44: f64) -> Self {
        Matrix4x4 {
            data: [[a11, a12, a13, a14],
                   [a21, a22, a23, a24],
                   [a31, a32, a33, a34],
                   [a41, a42, a43, a44]]
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row][col] = val;
    }

    pub fn matmul(a: Matrix4x4, b: Matrix4x4) -> Self {
        let mut m = Matrix4x4 { data: [[0.0; 4]; 4] };
        for i in 0..4 {
            for j in 0..4 {
                let mut dot = 0.0;
                for k in 0..4 {
                    dot += a.data[i][k] * b.data[k][j]
                }
                m.data[i][j] = dot;
            }
        }
        m
    }

    /// Applies the transform to a homogeneous vector; `w` is carried through as-is.
    pub fn apply(&self, v: Vec4) -> Vec4 {
        let mut out = [0.0; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.data[row][0] * v.0
                + self.data[row][1] * v.1
                + self.data[row][2] * v.2
                + self.data[row][3] * v.3;
        }
        out.into()
    }

    pub fn transpose(&mut self) {
        for i in 0..4 {
            for j in 0..i {
                let tmp = self.data[i][j];
                self.data[i][j] = self.data[j][i];
                self.data[j][i] = tmp;
            }
        }
    }

    pub fn transposed(&self) -> Matrix4x4 {
        let mut me = *self;
        me.transpose();
        me
    }

    // Cramer's rule on the transposed matrix: 24 paired 2x2 products feed
    // the 16 cofactors, the determinant comes from the first row.
    fn cofactors(&self) -> ([f64; 16], f64) {
        let mut src = [0.0; 16];
        for i in 0..4 {
            src[i] = self[i * 4];
            src[i + 4] = self[i * 4 + 1];
            src[i + 8] = self[i * 4 + 2];
            src[i + 12] = self[i * 4 + 3];
        }

        let mut tmp = [0.0; 12];
        let mut dst = [0.0; 16];

        // pairs for first 8 cofactors
        tmp[0] = src[10] * src[15];
        tmp[1] = src[11] * src[14];
        tmp[2] = src[9] * src[15];
        tmp[3] = src[11] * src[13];
        tmp[4] = src[9] * src[14];
        tmp[5] = src[10] * src[13];
        tmp[6] = src[8] * src[15];
        tmp[7] = src[11] * src[12];
        tmp[8] = src[8] * src[14];
        tmp[9] = src[10] * src[12];
        tmp[10] = src[8] * src[13];
        tmp[11] = src[9] * src[12];

        dst[0] = tmp[0] * src[5] + tmp[3] * src[6] + tmp[4] * src[7];
        dst[0] -= tmp[1] * src[5] + tmp[2] * src[6] + tmp[5] * src[7];
        dst[1] = tmp[1] * src[4] + tmp[6] * src[6] + tmp[9] * src[7];
        dst[1] -= tmp[0] * src[4] + tmp[7] * src[6] + tmp[8] * src[7];
        dst[2] = tmp[2] * src[4] + tmp[7] * src[5] + tmp[10] * src[7];
        dst[2] -= tmp[3] * src[4] + tmp[6] * src[5] + tmp[11] * src[7];
        dst[3] = tmp[5] * src[4] + tmp[8] * src[5] + tmp[11] * src[6];
        dst[3] -= tmp[4] * src[4] + tmp[9] * src[5] + tmp[10] * src[6];
        dst[4] = tmp[1] * src[1] + tmp[2] * src[2] + tmp[5] * src[3];
        dst[4] -= tmp[0] * src[1] + tmp[3] * src[2] + tmp[4] * src[3];
        dst[5] = tmp[0] * src[0] + tmp[7] * src[2] + tmp[8] * src[3];
        dst[5] -= tmp[1] * src[0] + tmp[6] * src[2] + tmp[9] * src[3];
        dst[6] = tmp[3] * src[0] + tmp[6] * src[1] + tmp[11] * src[3];
        dst[6] -= tmp[2] * src[0] + tmp[7] * src[1] + tmp[10] * src[3];
        dst[7] = tmp[4] * src[0] + tmp[9] * src[1] + tmp[10] * src[2];
        dst[7] -= tmp[5] * src[0] + tmp[8] * src[1] + tmp[11] * src[2];

        // pairs for second 8 cofactors
        tmp[0] = src[2] * src[7];
        tmp[1] = src[3] * src[6];
        tmp[2] = src[1] * src[7];
        tmp[3] = src[3] * src[5];
        tmp[4] = src[1] * src[6];
        tmp[5] = src[2] * src[5];
        tmp[6] = src[0] * src[7];
        tmp[7] = src[3] * src[4];
        tmp[8] = src[0] * src[6];
        tmp[9] = src[2] * src[4];
        tmp[10] = src[0] * src[5];
        tmp[11] = src[1] * src[4];

        dst[8] = tmp[0] * src[13] + tmp[3] * src[14] + tmp[4] * src[15];
        dst[8] -= tmp[1] * src[13] + tmp[2] * src[14] + tmp[5] * src[15];
        dst[9] = tmp[1] * src[12] + tmp[6] * src[14] + tmp[9] * src[15];
        dst[9] -= tmp[0] * src[12] + tmp[7] * src[14] + tmp[8] * src[15];
        dst[10] = tmp[2] * src[12] + tmp[7] * src[13] + tmp[10] * src[15];
        dst[10] -= tmp[3] * src[12] + tmp[6] * src[13] + tmp[11] * src[15];
        dst[11] = tmp[5] * src[12] + tmp[8] * src[13] + tmp[11] * src[14];
        dst[11] -= tmp[4] * src[12] + tmp[9] * src[13] + tmp[10] * src[14];
        dst[12] = tmp[2] * src[10] + tmp[5] * src[11] + tmp[1] * src[9];
        dst[12] -= tmp[4] * src[11] + tmp[0] * src[9] + tmp[3] * src[10];
        dst[13] = tmp[8] * src[11] + tmp[0] * src[8] + tmp[7] * src[10];
        dst[13] -= tmp[6] * src[10] + tmp[9] * src[11] + tmp[1] * src[8];
        dst[14] = tmp[6] * src[9] + tmp[11] * src[11] + tmp[3] * src[8];
        dst[14] -= tmp[10] * src[11] + tmp[2] * src[8] + tmp[7] * src[9];
        dst[15] = tmp[10] * src[10] + tmp[4] * src[8] + tmp[9] * src[9];
        dst[15] -= tmp[8] * src[9] + tmp[11] * src[10] + tmp[5] * src[8];

        let det = src[0] * dst[0] + src[1] * dst[1] + src[2] * dst[2] + src[3] * dst[3];
        (dst, det)
    }

    pub fn determinant(&self) -> f64 {
        self.cofactors().1
    }

    /// Fails with [`SceneError::SingularMatrix`] when the determinant is exactly zero.
    pub fn invert(&self) -> Result<Matrix4x4> {
        let (mut dst, det) = self.cofactors();
        if det == 0.0 {
            return Err(SceneError::SingularMatrix);
        }

        let inv_det = 1.0 / det;
        for value in dst.iter_mut() {
            *value *= inv_det;
        }

        let mut inv = Matrix4x4::identity();
        for (i, value) in dst.into_iter().enumerate() {
            inv[i] = value;
        }
        Ok(inv)
    }

    pub fn translation(direction: Vec4) -> Matrix4x4 {
        let mut me = Self::identity();
        me.data[0][3] = direction.0;
        me.data[1][3] = direction.1;
        me.data[2][3] = direction.2;

        me
    }

    pub fn scaling(scale: Vec4) -> Matrix4x4 {
        let mut me = Self::identity();
        me.data[0][0] = scale.0;
        me.data[1][1] = scale.1;
        me.data[2][2] = scale.2;

        me
    }

    /// Rotation by `angles.x` about X, `angles.y` about Y, `angles.z` about Z (radians),
    /// composed as `Rx * Ry * Rz`.
    pub fn rotation(angles: Vec4) -> Matrix4x4 {
        let mut m = Self::identity();
        for axis in 0..3 {
            let (sin, cos) = angles[axis].sin_cos();
            let a = (axis + 1) % 3;
            let b = (axis + 2) % 3;

            let mut single = Self::identity();
            single.set(a, a, cos);
            single.set(a, b, -sin);
            single.set(b, a, sin);
            single.set(b, b, cos);

            m = m * single;
        }
        m
    }

    /// Upper-triangle shear: `x` shears Y along Z, `y` shears X along Z, `z` shears X along Y.
    pub fn shear(shear: Vec4) -> Matrix4x4 {
        let mut me = Self::identity();
        me.data[0][1] = shear.2;
        me.data[0][2] = shear.1;
        me.data[1][2] = shear.0;

        me
    }

    pub fn shear_lower(shear: Vec4) -> Matrix4x4 {
        Self::shear(shear).transposed()
    }

    /// View matrix looking from `eye` at `center`.
    pub fn look_at(eye: Vec4, center: Vec4, up: Vec4) -> Matrix4x4 {
        let f = Vec4::direction(center.0 - eye.0, center.1 - eye.1, center.2 - eye.2).normalized();
        Self::look_to(eye, f, up)
    }

    /// View matrix looking from `eye` along the unit direction `towards`.
    pub fn look_to(eye: Vec4, towards: Vec4, up: Vec4) -> Matrix4x4 {
        let f = towards;
        let s = Vec4::cross(f, up).normalized();
        let u = Vec4::cross(s, f);

        #[rustfmt::skip]
        let view = Matrix4x4::create(
            s.0, s.1, s.2, 0.0,
            u.0, u.1, u.2, 0.0,
            -f.0, -f.1, -f.2, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        view * Self::translation(-eye)
    }

    pub fn frustum(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Matrix4x4 {
        #[rustfmt::skip]
        let m = Matrix4x4::create(
            (2.0 * near) / (right - left), 0.0, (right + left) / (right - left), 0.0,
            0.0, (2.0 * near) / (top - bottom), (top + bottom) / (top - bottom), 0.0,
            0.0, 0.0, -(far + near) / (far - near), -(2.0 * far * near) / (far - near),
            0.0, 0.0, -1.0, 0.0,
        );
        m
    }

    /// Symmetric projection from a vertical field of view given in degrees.
    pub fn perspective(fovy: f64, aspect: f64, near: f64, far: f64) -> Matrix4x4 {
        let top = near * (fovy.to_radians() / 2.0).tan();
        let bottom = -top;
        let right = top * aspect;
        let left = -right;
        Self::frustum(left, right, bottom, top, near, far)
    }
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: Matrix4x4) -> Self::Output {
        Matrix4x4::matmul(self, rhs)
    }
}

impl Mul<Vec4> for Matrix4x4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        self.apply(rhs)
    }
}

// both `From` implementations assume row major
impl From<[f64; 16]> for Matrix4x4 {
    fn from(value: [f64; 16]) -> Self {
        Matrix4x4 {
            data: [
                [value[0], value[1], value[2], value[3]],
                [value[4], value[5], value[6], value[7]],
                [value[8], value[9], value[10], value[11]],
                [value[12], value[13], value[14], value[15]],
            ],
        }
    }
}

impl From<[[f64; 4]; 4]> for Matrix4x4 {
    fn from(value: [[f64; 4]; 4]) -> Self {
        Self { data: value }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_approx_eq(a: f64, b: f64) {
        assert!(
            (a - b).abs() < EPSILON,
            "Expected {} ~ {}, difference: {}",
            a,
            b,
            (a - b).abs()
        );
    }

    fn assert_vec4_approx_eq(a: Vec4, b: Vec4) {
        for i in 0..4 {
            assert_approx_eq(a[i], b[i]);
        }
    }

    fn assert_identity(m: &Matrix4x4) {
        let identity = Matrix4x4::identity();
        for row in 0..4 {
            for col in 0..4 {
                assert!(
                    (m.get(row, col) - identity.get(row, col)).abs() < 1e-6,
                    "entry ({row}, {col}) = {} in {m:?}",
                    m.get(row, col)
                );
            }
        }
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let t = Matrix4x4::translation(Vec4::direction(1.0, 2.0, 3.0));
        assert_vec4_approx_eq(t * Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 2.0, 3.0));
        assert_vec4_approx_eq(t * Vec4::direction(1.0, 0.0, 0.0), Vec4::direction(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_mul_applies_right_operand_first() {
        let t = Matrix4x4::translation(Vec4::direction(1.0, 0.0, 0.0));
        let s = Matrix4x4::scaling(Vec4::direction(2.0, 2.0, 2.0));
        let p = Vec4::point(1.0, 0.0, 0.0);
        // scale then translate
        assert_vec4_approx_eq((t * s) * p, Vec4::point(3.0, 0.0, 0.0));
        // translate then scale
        assert_vec4_approx_eq((s * t) * p, Vec4::point(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_single_axes() {
        let x_axis = Vec4::direction(1.0, 0.0, 0.0);
        let y_axis = Vec4::direction(0.0, 1.0, 0.0);

        // rotating about X leaves X alone and turns Y into Z
        let rx = Matrix4x4::rotation(Vec4::direction(FRAC_PI_2, 0.0, 0.0));
        assert_vec4_approx_eq(rx * x_axis, x_axis);
        assert_vec4_approx_eq(rx * y_axis, Vec4::direction(0.0, 0.0, 1.0));

        // rotating about Y turns X into -Z
        let ry = Matrix4x4::rotation(Vec4::direction(0.0, FRAC_PI_2, 0.0));
        assert_vec4_approx_eq(ry * x_axis, Vec4::direction(0.0, 0.0, -1.0));

        // rotating about Z turns X into Y
        let rz = Matrix4x4::rotation(Vec4::direction(0.0, 0.0, FRAC_PI_2));
        assert_vec4_approx_eq(rz * x_axis, y_axis);
    }

    #[test]
    fn test_rotation_composition_order() {
        // Rx * Ry: the Y rotation reaches the vector first
        let m = Matrix4x4::rotation(Vec4::direction(FRAC_PI_2, FRAC_PI_2, 0.0));
        let rotated = m * Vec4::direction(1.0, 0.0, 0.0);
        assert_vec4_approx_eq(rotated, Vec4::direction(0.0, 1.0, 0.0));

        let rx = Matrix4x4::rotation(Vec4::direction(FRAC_PI_2, 0.0, 0.0));
        let ry = Matrix4x4::rotation(Vec4::direction(0.0, FRAC_PI_2, 0.0));
        let rz = Matrix4x4::rotation(Vec4::direction(0.0, 0.0, 0.3));
        let all = Matrix4x4::rotation(Vec4::direction(FRAC_PI_2, FRAC_PI_2, 0.3));
        let composed = rx * ry * rz;
        for i in 0..16 {
            assert_approx_eq(all[i], composed[i]);
        }
    }

    #[test]
    fn test_shear_layout() {
        let m = Matrix4x4::shear(Vec4::direction(1.0, 2.0, 3.0));
        assert_eq!(m.get(0, 1), 3.0);
        assert_eq!(m.get(0, 2), 2.0);
        assert_eq!(m.get(1, 2), 1.0);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 1.0);
        }
        let lower = Matrix4x4::shear_lower(Vec4::direction(1.0, 2.0, 3.0));
        assert_eq!(lower.get(2, 1), 1.0);
        assert_eq!(lower.get(1, 2), 0.0);
    }

    #[test]
    fn test_invert_translation() {
        let t = Matrix4x4::translation(Vec4::direction(3.0, -2.0, 5.0));
        let inv = t.invert().unwrap();
        assert_vec4_approx_eq(inv * Vec4::point(3.0, -2.0, 5.0), Vec4::point(0.0, 0.0, 0.0));
        assert_approx_eq(inv.get(0, 3), -3.0);
    }

    #[test]
    fn test_invert_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let mut m = Matrix4x4::identity();
            for i in 0..16 {
                m[i] = rng.random_range(-10.0..10.0);
            }
            if m.determinant() == 0.0 {
                assert!(matches!(m.invert(), Err(SceneError::SingularMatrix)));
                continue;
            }
            let inv = m.invert().unwrap();
            assert_identity(&(m * inv));
            assert_identity(&(inv * m));
        }
    }

    #[test]
    fn test_invert_composed_transform() {
        let m = Matrix4x4::translation(Vec4::direction(1.0, 2.0, 3.0))
            * Matrix4x4::rotation(Vec4::direction(0.3, -1.2, 2.0))
            * Matrix4x4::scaling(Vec4::direction(2.0, 0.5, 4.0));
        let inv = m.invert().unwrap();
        assert_identity(&(m * inv));
    }

    #[test]
    fn test_singular_matrix_is_an_error() {
        let flat = Matrix4x4::scaling(Vec4::direction(1.0, 0.0, 1.0));
        assert_eq!(flat.determinant(), 0.0);
        assert!(matches!(flat.invert(), Err(SceneError::SingularMatrix)));

        let zero = Matrix4x4 { data: [[0.0; 4]; 4] };
        assert!(matches!(zero.invert(), Err(SceneError::SingularMatrix)));
    }

    #[test]
    fn test_determinant() {
        let s = Matrix4x4::scaling(Vec4::direction(2.0, 3.0, 4.0));
        assert_approx_eq(s.determinant(), 24.0);
        let r = Matrix4x4::rotation(Vec4::direction(0.4, 0.2, -0.7));
        assert_approx_eq(r.determinant(), 1.0);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec4::point(0.0, 0.0, 10.0);
        let view = Matrix4x4::look_at(eye, Vec4::point(0.0, 0.0, 0.0), Vec4::direction(0.0, 1.0, 0.0));
        assert_vec4_approx_eq(view * eye, Vec4::point(0.0, 0.0, 0.0));
        // the target ends up straight ahead along -Z
        assert_vec4_approx_eq(view * Vec4::point(0.0, 0.0, 0.0), Vec4::point(0.0, 0.0, -10.0));
        // world +X is to the right when looking down -Z
        assert_vec4_approx_eq(view * Vec4::direction(1.0, 0.0, 0.0), Vec4::direction(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_perspective_maps_near_plane_corners() {
        let near = 0.5;
        let p = Matrix4x4::perspective(90.0, 2.0, near, 100.0);
        // top-right corner of the near plane: y = near * tan(45deg), x = y * aspect
        let corner = p * Vec4::point(2.0 * near, near, -near);
        let ndc = corner / corner.w();
        assert_approx_eq(ndc.x(), 1.0);
        assert_approx_eq(ndc.y(), 1.0);
        assert_approx_eq(ndc.z(), -1.0);
    }
}
