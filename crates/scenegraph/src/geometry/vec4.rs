use std::ops::{self, Index, IndexMut, MulAssign};

use serde::{Deserialize, Serialize};

/// Homogeneous vector. `w == 1` marks a point, `w == 0` a direction.
/// Colours reuse the same type as `(r, g, b, a)`.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vec4(pub f64, pub f64, pub f64, pub f64);

impl Vec4 {
    pub fn point(x: f64, y: f64, z: f64) -> Vec4 {
        Vec4(x, y, z, 1.0)
    }

    pub fn direction(x: f64, y: f64, z: f64) -> Vec4 {
        Vec4(x, y, z, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn z(&self) -> f64 {
        self.2
    }

    pub fn w(&self) -> f64 {
        self.3
    }

    pub fn r(&self) -> f64 {
        self.0
    }

    pub fn g(&self) -> f64 {
        self.1
    }

    pub fn b(&self) -> f64 {
        self.2
    }

    pub fn a(&self) -> f64 {
        self.3
    }

    // only x, y, z contribute
    pub fn square_magnitude(&self) -> f64 {
        self.0 * self.0 + self.1 * self.1 + self.2 * self.2
    }

    pub fn length(&self) -> f64 {
        self.square_magnitude().sqrt()
    }

    pub fn dot(a: Vec4, b: Vec4) -> f64 {
        a.0 * b.0 + a.1 * b.1 + a.2 * b.2
    }

    pub fn cross(u: Vec4, v: Vec4) -> Vec4 {
        Vec4(
            u.1 * v.2 - u.2 * v.1,
            u.2 * v.0 - u.0 * v.2,
            u.0 * v.1 - u.1 * v.0,
            0.0,
        )
    }

    /// Divides every component (including `w`) by the xyz length.
    /// A zero-length input yields NaN components.
    pub fn normalized(self) -> Vec4 {
        self / self.length()
    }

    /// Component-wise comparison within `eps`; `w` only counts when either side is non-zero.
    pub fn approx_eq(&self, other: &Vec4, eps: f64) -> bool {
        (self.0 - other.0).abs() <= eps
            && (self.1 - other.1).abs() <= eps
            && (self.2 - other.2).abs() <= eps
            && ((self.3 == 0.0 && other.3 == 0.0) || (self.3 - other.3).abs() <= eps)
    }

    pub fn elementwise_min(a: Vec4, b: Vec4) -> Vec4 {
        Vec4(f64::min(a.0, b.0), f64::min(a.1, b.1), f64::min(a.2, b.2), f64::min(a.3, b.3))
    }

    pub fn elementwise_max(a: Vec4, b: Vec4) -> Vec4 {
        Vec4(f64::max(a.0, b.0), f64::max(a.1, b.1), f64::max(a.2, b.2), f64::max(a.3, b.3))
    }

    pub fn zero() -> Vec4 {
        Vec4(0.0, 0.0, 0.0, 0.0)
    }
}

impl Index<usize> for Vec4 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.0,
            1 => &self.1,
            2 => &self.2,
            3 => &self.3,
            _ => panic!("Vec4 index {index} out of range"),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.0,
            1 => &mut self.1,
            2 => &mut self.2,
            3 => &mut self.3,
            _ => panic!("Vec4 index {index} out of range"),
        }
    }
}

impl ops::AddAssign for Vec4 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.1 += rhs.1;
        self.2 += rhs.2;
        self.3 += rhs.3
    }
}

impl ops::MulAssign<f64> for Vec4 {
    fn mul_assign(&mut self, rhs: f64) {
        self.0 *= rhs;
        self.1 *= rhs;
        self.2 *= rhs;
        self.3 *= rhs;
    }
}

impl ops::DivAssign<f64> for Vec4 {
    fn div_assign(&mut self, rhs: f64) {
        self.mul_assign(1.0 / rhs);
    }
}

impl ops::Add for Vec4 {
    type Output = Vec4;
    fn add(self, rhs: Self) -> Self::Output {
        Vec4(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2, self.3 + rhs.3)
    }
}

impl ops::Neg for Vec4 {
    type Output = Vec4;
    fn neg(self) -> Self::Output {
        Vec4(-self.0, -self.1, -self.2, -self.3)
    }
}

impl ops::Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec4(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2, self.3 - rhs.3)
    }
}

// element-wise product, used for colour modulation
impl ops::Mul for Vec4 {
    type Output = Vec4;
    fn mul(self, rhs: Self) -> Self::Output {
        Vec4(self.0 * rhs.0, self.1 * rhs.1, self.2 * rhs.2, self.3 * rhs.3)
    }
}

impl ops::Mul<f64> for Vec4 {
    type Output = Vec4;
    fn mul(self, rhs: f64) -> Self::Output {
        Vec4(self.0 * rhs, self.1 * rhs, self.2 * rhs, self.3 * rhs)
    }
}

impl ops::Mul<Vec4> for f64 {
    type Output = Vec4;
    fn mul(self, rhs: Vec4) -> Self::Output {
        rhs * self
    }
}

impl ops::Div<f64> for Vec4 {
    type Output = Vec4;
    fn div(self, rhs: f64) -> Self::Output {
        Vec4(self.0 / rhs, self.1 / rhs, self.2 / rhs, self.3 / rhs)
    }
}

impl From<[f64; 4]> for Vec4 {
    fn from(value: [f64; 4]) -> Self {
        Vec4(value[0], value[1], value[2], value[3])
    }
}

impl From<Vec4> for [f64; 4] {
    fn from(value: Vec4) -> Self {
        [value.0, value.1, value.2, value.3]
    }
}
