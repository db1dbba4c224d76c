//! Three-component vectors indexed by axis.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A value per Cartesian axis (x, y, z).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Real-valued axis vector.
pub type RVec3 = Vec3<f64>;

/// Integer axis vector (sizes and cell indices).
pub type IVec3 = Vec3<usize>;

impl<T> Vec3<T> {
    #[inline]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Apply `f` to every component.
    #[inline]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vec3<U> {
        Vec3::new(f(self.x), f(self.y), f(self.z))
    }
}

impl<T: Copy> Vec3<T> {
    #[inline]
    pub const fn splat(v: T) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Components as an array, in axis order.
    #[inline]
    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn zip_with<U: Copy, V>(self, other: Vec3<U>, mut f: impl FnMut(T, U) -> V) -> Vec3<V> {
        Vec3::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl IVec3 {
    /// Product of the components.
    #[inline]
    pub fn product(self) -> usize {
        self.x * self.y * self.z
    }

    /// Number of axes with more than one entry.
    pub fn active_dimension(self) -> usize {
        self.to_array().iter().filter(|&&n| n > 1).count()
    }
}

impl RVec3 {
    /// Largest component.
    pub fn max_element(self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

impl<T> Index<usize> for Vec3<T> {
    type Output = T;

    #[inline]
    fn index(&self, axis: usize) -> &T {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("axis {axis} out of range for Vec3"),
        }
    }
}

impl<T> IndexMut<usize> for Vec3<T> {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut T {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("axis {axis} out of range for Vec3"),
        }
    }
}

macro_rules! impl_vec3_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: $trait<Output = T>> $trait for Vec3<T> {
            type Output = Vec3<T>;

            #[inline]
            fn $method(self, rhs: Self) -> Self::Output {
                Vec3::new(self.x $op rhs.x, self.y $op rhs.y, self.z $op rhs.z)
            }
        }
    };
}

impl_vec3_binop!(Add, add, +);
impl_vec3_binop!(Sub, sub, -);
impl_vec3_binop!(Mul, mul, *);
impl_vec3_binop!(Div, div, /);

impl Mul<f64> for RVec3 {
    type Output = RVec3;

    #[inline]
    fn mul(self, rhs: f64) -> RVec3 {
        self.map(|v| v * rhs)
    }
}

impl<T: fmt::Display> fmt::Display for Vec3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[usize; 3]> for IVec3 {
    fn from(a: [usize; 3]) -> Self {
        Vec3::new(a[0], a[1], a[2])
    }
}

impl From<[f64; 3]> for RVec3 {
    fn from(a: [f64; 3]) -> Self {
        Vec3::new(a[0], a[1], a[2])
    }
}
