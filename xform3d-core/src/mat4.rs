//! 4x4 matrix type for model, view and projection transforms.
//!
//! Matrices are stored in **row-major** order and act on **column vectors**,
//! so `a.multiply(&b)` applied to a vector runs `b` first. Graphics APIs want
//! the transpose of that layout, which [`Mat4::dump_column_wise`] produces:
//!
//! ```text
//! array[i + 4 * j] = m[i][j]
//! ```

use std::fmt;
use std::ops::{Add, Mul, Sub};

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::Matrix4;
use rand::Rng;

use crate::error::{Error, Result};
use crate::vec3::Vec3;

/// Fill pattern for [`Mat4::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    #[default]
    Identity,
    Ones,
    Zeros,
}

/// Coordinate axis for rotations and scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A 4x4 `f32` matrix.
///
/// Composition always returns a new matrix. The only in-place mutators are
/// [`set`](Mat4::set), [`set_identity`](Mat4::set_identity),
/// [`set_zeros`](Mat4::set_zeros), [`set_ones`](Mat4::set_ones) and
/// [`randomize`](Mat4::randomize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    pub const ONES: Self = Self { m: [[1.0; 4]; 4] };

    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(init: Init) -> Self {
        match init {
            Init::Identity => Self::IDENTITY,
            Init::Ones => Self::ONES,
            Init::Zeros => Self::ZERO,
        }
    }

    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Rebuilds a matrix from a column-major array, the inverse of
    /// [`dump_column_wise`](Mat4::dump_column_wise).
    pub fn from_cols_array(values: &[f32; 16]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = values[i + j * 4];
            }
        }
        Self { m }
    }

    /// Right-handed rotation about `axis` by `angle_degrees`.
    ///
    /// Positive angles are counter-clockwise when looking down the axis
    /// towards the origin.
    pub fn rotation(angle_degrees: f32, axis: Axis) -> Self {
        let theta = angle_degrees / 180.0 * std::f32::consts::PI;
        let (s, c) = theta.sin_cos();
        let mut result = Self::IDENTITY;
        match axis {
            Axis::X => {
                result.m[1][1] = c;
                result.m[1][2] = -s;
                result.m[2][1] = s;
                result.m[2][2] = c;
            }
            Axis::Y => {
                result.m[0][0] = c;
                result.m[0][2] = s;
                result.m[2][0] = -s;
                result.m[2][2] = c;
            }
            Axis::Z => {
                result.m[0][0] = c;
                result.m[0][1] = -s;
                result.m[1][0] = s;
                result.m[1][1] = c;
            }
        }
        result
    }

    pub fn translation(v: Vec3) -> Self {
        let mut result = Self::IDENTITY;
        result.m[0][3] = v.x;
        result.m[1][3] = v.y;
        result.m[2][3] = v.z;
        result
    }

    /// Non-uniform scale along the three axes.
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut result = Self::IDENTITY;
        result.m[0][0] = sx;
        result.m[1][1] = sy;
        result.m[2][2] = sz;
        result
    }

    /// Off-center perspective frustum (OpenGL clip conventions).
    ///
    /// The bottom row is always `[0, 0, -1, 0]` so the homogeneous divide
    /// uses eye-space depth. Parameters are not validated here; see
    /// [`Frustum::new`](crate::projection::Frustum::new).
    pub fn perspective(near: f32, far: f32, left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self::from_rows([
            [
                2.0 * near / (right - left),
                0.0,
                (right + left) / (right - left),
                0.0,
            ],
            [
                0.0,
                2.0 * near / (top - bottom),
                (top + bottom) / (top - bottom),
                0.0,
            ],
            [
                0.0,
                0.0,
                -(far + near) / (far - near),
                -2.0 * far * near / (far - near),
            ],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// View matrix from an orthonormal right (`u`), up (`v`), back (`n`)
    /// basis and the translation `d = (-eye·u, -eye·v, -eye·n)`.
    pub fn view_from_basis(u: Vec3, v: Vec3, n: Vec3, d: Vec3) -> Self {
        Self::from_rows([
            [u.x, u.y, u.z, d.x],
            [v.x, v.y, v.z, d.y],
            [n.x, n.y, n.z, d.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Matrix with every entry drawn uniformly from `[low, high]`.
    pub fn random_uniform<R: Rng + ?Sized>(low: f32, high: f32, rng: &mut R) -> Self {
        let mut result = Self::ZERO;
        result.randomize(low, high, rng);
        result
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f32> {
        Self::check_index(i, j)?;
        Ok(self.m[i][j])
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) -> Result<()> {
        Self::check_index(i, j)?;
        self.m[i][j] = value;
        Ok(())
    }

    fn check_index(i: usize, j: usize) -> Result<()> {
        if i >= 4 || j >= 4 {
            return Err(Error::IndexOutOfBounds { row: i, col: j });
        }
        Ok(())
    }

    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    pub fn set_zeros(&mut self) -> &mut Self {
        *self = Self::ZERO;
        self
    }

    pub fn set_ones(&mut self) -> &mut Self {
        *self = Self::ONES;
        self
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, low: f32, high: f32, rng: &mut R) -> &mut Self {
        for value in self.m.iter_mut().flatten() {
            *value = low + rng.gen::<f32>() * (high - low);
        }
        self
    }

    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum::<f32>();
            }
        }
        result
    }

    /// Element-wise product.
    pub fn hadamard(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[j][i] = self.m[i][j];
            }
        }
        result
    }

    pub fn scaled(&self, factor: f32) -> Self {
        let mut result = *self;
        for value in result.m.iter_mut().flatten() {
            *value *= factor;
        }
        result
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = f(self.m[i][j], rhs.m[i][j]);
            }
        }
        result
    }

    /// Applies the upper-left 3x3 block only. Use for directions, never for
    /// positions: translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Full product with a homogeneous column `[x, y, z, w]`.
    pub fn transform_homogeneous(&self, p: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (i, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| self.m[i][k] * p[k]).sum::<f32>();
        }
        out
    }

    /// Translation part (column 3, rows 0-2).
    pub fn translation_vec3(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Gaze direction encoded in a view matrix built by
    /// [`view_from_basis`](Mat4::view_from_basis): the negated back axis.
    pub fn view_direction(&self) -> Vec3 {
        Vec3::new(-self.m[2][0], -self.m[2][1], -self.m[2][2])
    }

    /// Column-major flattening for uniform upload.
    pub fn dump_column_wise(&self) -> [f32; 16] {
        let mut array = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                array[i + j * 4] = self.m[i][j];
            }
        }
        array
    }

    #[inline]
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        self.m
    }

    pub(crate) fn translation_mut(&mut self) -> (&mut f32, &mut f32, &mut f32) {
        let [r0, r1, r2, _] = &mut self.m;
        (&mut r0[3], &mut r1[3], &mut r2[3])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, factor: f32) -> Self {
        self.scaled(factor)
    }
}

impl Add for Mat4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl Sub for Mat4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(n: Matrix4<f32>) -> Self {
        Self::from_rows(std::array::from_fn(|i| std::array::from_fn(|j| n[(i, j)])))
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        Matrix4::from_fn(|i, j| m.m[i][j])
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
