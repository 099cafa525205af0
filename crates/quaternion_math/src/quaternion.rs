//! Quaternion value type
//!
//! A quaternion is a four component hypercomplex number q0 + q1*i + q2*j + q3*k
//! with a scalar part (q0) and a vector part (q1, q2, q3).
//!
//! Two equality regimes are provided and must not be mixed up:
//! - [`Quaternion::exact_eq`] (also `==`) compares bit patterns, so `0.0` and
//!   `-0.0` differ and NaN is never equal to anything.
//! - [`Quaternion::approx_eq`] compares component-wise within a tolerance.

use std::hash::{Hash, Hasher};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::QuaternionError;

/// Quaternion with scalar part q0 and vector part (q1, q2, q3)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    q0: f64,
    q1: f64,
    q2: f64,
    q3: f64,
}

impl Quaternion {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const I: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const J: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const K: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a quaternion from its four components
    #[inline]
    pub const fn new(q0: f64, q1: f64, q2: f64, q3: f64) -> Self {
        Self { q0, q1, q2, q3 }
    }

    /// Create a quaternion from a scalar part and a 3-component vector part
    pub fn from_scalar_vector(scalar: f64, vector: &[f64]) -> Result<Self, QuaternionError> {
        match *vector {
            [q1, q2, q3] => Ok(Self::new(scalar, q1, q2, q3)),
            _ => {
                log::debug!("Rejected vector part with {} components", vector.len());
                Err(QuaternionError::WrongDimension(vector.len()))
            }
        }
    }

    /// Create a pure quaternion (zero scalar part) from a 3-component vector
    pub fn from_vector(vector: &[f64]) -> Result<Self, QuaternionError> {
        Self::from_scalar_vector(0.0, vector)
    }

    #[inline]
    pub const fn from_array(components: [f64; 4]) -> Self {
        Self::new(components[0], components[1], components[2], components[3])
    }

    /// Components as `[q0, q1, q2, q3]`
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        bytemuck::cast(self)
    }

    #[inline]
    pub fn q0(&self) -> f64 {
        self.q0
    }

    #[inline]
    pub fn q1(&self) -> f64 {
        self.q1
    }

    #[inline]
    pub fn q2(&self) -> f64 {
        self.q2
    }

    #[inline]
    pub fn q3(&self) -> f64 {
        self.q3
    }

    /// The real part, q0
    #[inline]
    pub fn scalar_part(&self) -> f64 {
        self.q0
    }

    /// The imaginary parts `[q1, q2, q3]` as an owned copy
    #[inline]
    pub fn vector_part(&self) -> [f64; 3] {
        [self.q1, self.q2, self.q3]
    }

    /// Negate the vector part, keeping the scalar part
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.q0, -self.q1, -self.q2, -self.q3)
    }

    #[inline]
    pub fn negate(self) -> Self {
        Self::new(-self.q0, -self.q1, -self.q2, -self.q3)
    }

    /// Component-wise sum
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(
            self.q0 + other.q0,
            self.q1 + other.q1,
            self.q2 + other.q2,
            self.q3 + other.q3,
        )
    }

    /// Component-wise difference
    #[inline]
    pub fn subtract(self, other: Self) -> Self {
        Self::new(
            self.q0 - other.q0,
            self.q1 - other.q1,
            self.q2 - other.q2,
            self.q3 - other.q3,
        )
    }

    /// Hamilton product `self * other`
    ///
    /// The product is not commutative: `a.multiply(b)` and `b.multiply(a)`
    /// differ in the sign of the cross terms.
    pub fn multiply(self, other: Self) -> Self {
        let (a0, a1, a2, a3) = (self.q0, self.q1, self.q2, self.q3);
        let (b0, b1, b2, b3) = (other.q0, other.q1, other.q2, other.q3);

        Self::new(
            a0 * b0 - a1 * b1 - a2 * b2 - a3 * b3,
            a0 * b1 + a1 * b0 + a2 * b3 - a3 * b2,
            a0 * b2 - a1 * b3 + a2 * b0 + a3 * b1,
            a0 * b3 + a1 * b2 - a2 * b1 + a3 * b0,
        )
    }

    /// Multiply every component by a real factor
    #[inline]
    pub fn scale(self, alpha: f64) -> Self {
        Self::new(self.q0 * alpha, self.q1 * alpha, self.q2 * alpha, self.q3 * alpha)
    }

    /// Divide every component by a real factor
    #[inline]
    pub fn divide(self, alpha: f64) -> Self {
        Self::new(self.q0 / alpha, self.q1 / alpha, self.q2 / alpha, self.q3 / alpha)
    }

    /// Dot product of the components seen as a 4D vector
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.q0 * other.q0 + self.q1 * other.q1 + self.q2 * other.q2 + self.q3 * other.q3
    }

    /// Sum of squared components
    #[inline]
    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Divide by the norm to get a unit quaternion
    ///
    /// Fails with [`QuaternionError::ZeroNorm`] only when the norm is exactly zero.
    pub fn normalize(self) -> Result<Self, QuaternionError> {
        let norm = self.norm();
        if norm == 0.0 {
            log::debug!("Cannot normalize {}: zero norm", self);
            return Err(QuaternionError::ZeroNorm);
        }
        Ok(self.divide(norm))
    }

    /// Multiplicative inverse: the conjugate divided by the squared norm
    pub fn inverse(self) -> Result<Self, QuaternionError> {
        let norm_squared = self.norm_squared();
        if norm_squared == 0.0 {
            log::debug!("Cannot invert {}: zero norm", self);
            return Err(QuaternionError::ZeroNorm);
        }
        Ok(self.conjugate().divide(norm_squared))
    }

    /// Canonical unit representative with a non-negative scalar part
    ///
    /// `q` and `-q` encode the same rotation and map to the same result. When
    /// the scalar part is zero the first non-zero vector component decides the sign.
    pub fn positive_polar_form(self) -> Result<Self, QuaternionError> {
        let unit = self.normalize()?;
        let leading = unit.to_array().into_iter().find(|c| *c != 0.0);
        match leading {
            Some(c) if c < 0.0 => Ok(unit.negate()),
            _ => Ok(unit),
        }
    }

    /// True when `|q0| <= eps`
    #[inline]
    pub fn is_pure(self, eps: f64) -> bool {
        self.q0.abs() <= eps
    }

    /// True when `|norm - 1| <= eps`
    #[inline]
    pub fn is_unit(self, eps: f64) -> bool {
        (self.norm() - 1.0).abs() <= eps
    }

    /// Tolerance equality: every component differs by at most `eps`
    ///
    /// Equal infinities match; NaN matches nothing.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.to_array()
            .into_iter()
            .zip(other.to_array())
            .all(|(a, b)| a == b || (a - b).abs() <= eps)
    }

    /// Exact equality on the bit patterns of the components
    ///
    /// Signed zeros are distinct and a NaN component makes the values unequal,
    /// even when compared with itself.
    pub fn exact_eq(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| !a.is_nan() && a.to_bits() == b.to_bits())
    }

    /// Raw IEEE-754 bit patterns of the components
    #[inline]
    pub fn to_bits(&self) -> [u64; 4] {
        [self.q0.to_bits(), self.q1.to_bits(), self.q2.to_bits(), self.q3.to_bits()]
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        self.exact_eq(other)
    }
}

impl Hash for Quaternion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(components: [f64; 4]) -> Self {
        Self::from_array(components)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        q.to_array()
    }
}

// Operator overloads

impl std::ops::Add for Quaternion {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Quaternion::add(self, other)
    }
}

impl std::ops::Sub for Quaternion {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        self.subtract(other)
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.multiply(other)
    }
}

impl std::ops::Mul<f64> for Quaternion {
    type Output = Self;
    #[inline]
    fn mul(self, alpha: f64) -> Self {
        self.scale(alpha)
    }
}

impl std::ops::Div<f64> for Quaternion {
    type Output = Self;
    #[inline]
    fn div(self, alpha: f64) -> Self {
        self.divide(alpha)
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    const EPS: f64 = 1e-14;
    const COMPARISON_EPS: f64 = 1e-14;

    fn hash_of(q: &Quaternion) -> u64 {
        let mut hasher = DefaultHasher::new();
        q.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_accessors() {
        let q = Quaternion::new(2.0, 5.4, 17.0, 0.0005);
        assert_eq!(q.q0(), 2.0);
        assert_eq!(q.q1(), 5.4);
        assert_eq!(q.q2(), 17.0);
        assert_eq!(q.q3(), 0.0005);
        assert_eq!(q.scalar_part(), 2.0);
        assert_eq!(q.vector_part(), [5.4, 17.0, 0.0005]);
    }

    #[test]
    fn test_from_scalar_vector() {
        let q = Quaternion::from_scalar_vector(2.0, &[5.4, 17.0, 0.0005]).unwrap();
        assert_eq!(q.scalar_part(), 2.0);
        assert_eq!(q.vector_part(), [5.4, 17.0, 0.0005]);
    }

    #[test]
    fn test_vector_part_is_a_copy() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let mut v = q.vector_part();
        v[0] = 100.0;
        assert_eq!(v[0], 100.0);
        assert_eq!(q.q1(), 2.0);
    }

    #[test]
    fn test_wrong_dimension() {
        assert_eq!(
            Quaternion::from_vector(&[1.0, 2.0]),
            Err(QuaternionError::WrongDimension(2))
        );
        assert_eq!(
            Quaternion::from_scalar_vector(1.0, &[1.0, 2.0, 3.0, 4.0]),
            Err(QuaternionError::WrongDimension(4))
        );
    }

    #[test]
    fn test_array_conversions() {
        let q = Quaternion::new(1.0, -2.0, 3.5, 4.0);
        assert_eq!(q.to_array(), [1.0, -2.0, 3.5, 4.0]);
        assert_eq!(Quaternion::from([1.0, -2.0, 3.5, 4.0]), q);
        let arr: [f64; 4] = q.into();
        assert_eq!(arr, [1.0, -2.0, 3.5, 4.0]);
    }

    #[test]
    fn test_conjugate() {
        let q = Quaternion::new(1.5, 4.0, 2.0, -2.5);
        let c = q.conjugate();
        assert_eq!(c, Quaternion::new(1.5, -4.0, -2.0, 2.5));
        assert_eq!(c.conjugate(), q);
    }

    #[test]
    fn test_hamilton_product() {
        let a = Quaternion::new(1.0, 0.5, -3.0, 4.0);
        let b = Quaternion::new(6.0, 2.0, 1.0, -9.0);
        assert_eq!(a * b, Quaternion::new(44.0, 28.0, -4.5, 21.5));

        // Conjugate of a product is the reversed product of conjugates
        let lhs = (a * b).conjugate();
        let rhs = b.conjugate() * a.conjugate();
        assert!(lhs.approx_eq(&rhs, EPS));
    }

    #[test]
    fn test_product_is_not_commutative() {
        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(4.0, 3.0, 2.0, 1.0);
        assert_ne!(a * b, b * a);
        assert_eq!(a * b, Quaternion::new(-12.0, 6.0, 24.0, 12.0));
    }

    #[test]
    fn test_product_with_pure_quaternion() {
        let q = Quaternion::new(4.0, 7.0, -1.0, 2.0);
        let v = Quaternion::from_vector(&[2.0, 1.0, 3.0]).unwrap();
        assert_eq!(q * v, Quaternion::new(-19.0, 3.0, -13.0, 21.0));
        assert_eq!(v * q, Quaternion::new(-19.0, 13.0, 21.0, 3.0));
    }

    #[test]
    fn test_basis_units() {
        let i = Quaternion::I;
        let j = Quaternion::J;
        let k = Quaternion::K;
        assert!((i * j).approx_eq(&k, 0.0));
        assert!((j * k).approx_eq(&i, 0.0));
        assert!((k * i).approx_eq(&j, 0.0));
        assert!((i * i).approx_eq(&-Quaternion::ONE, 0.0));
        assert!((j * i).approx_eq(&-k, 0.0));
    }

    #[test]
    fn test_add_subtract() {
        let a = Quaternion::new(1.0, 2.0, -2.0, -1.0);
        let b = Quaternion::new(3.0, -3.0, 4.0, -3.0);
        assert_eq!(a + b, Quaternion::new(4.0, -1.0, 2.0, -4.0));
        assert_eq!(b.add(a), a.add(b));
        assert_eq!(a - b, Quaternion::new(-2.0, 5.0, -6.0, 2.0));
        assert_eq!(b - a, Quaternion::new(2.0, -5.0, 6.0, -2.0));
    }

    #[test]
    fn test_scale_and_divide() {
        let q = Quaternion::new(0.5, -1.5, 3.5, 0.8);
        let scaled = q * 1.8;
        assert!(scaled.approx_eq(&Quaternion::new(0.9, -2.7, 6.3, 1.44), COMPARISON_EPS));
        assert_eq!(q / 2.0, Quaternion::new(0.25, -0.75, 1.75, 0.4));
    }

    #[test]
    fn test_dot() {
        let a = Quaternion::new(1.0, 2.0, 2.0, 1.0);
        let b = Quaternion::new(3.0, -2.0, -1.0, -3.0);
        assert_eq!(a.dot(b), -6.0);
        assert_eq!(b.dot(a), -6.0);
    }

    #[test]
    fn test_norm() {
        let q = Quaternion::new(2.0, 1.0, -4.0, 3.0);
        assert_eq!(q.norm(), 30f64.sqrt());
        let scalar = (q * q.conjugate()).scalar_part();
        assert_eq!(q.norm(), scalar.sqrt());
    }

    #[test]
    fn test_normalize() {
        let q = Quaternion::new(2.0, 1.0, -4.0, -2.0);
        let versor = q.normalize().unwrap();
        assert_eq!(versor, Quaternion::new(2.0 / 5.0, 1.0 / 5.0, -4.0 / 5.0, -2.0 / 5.0));
        assert!((versor.norm() - 1.0).abs() <= f64::EPSILON);
        assert!(versor.is_unit(COMPARISON_EPS));
    }

    #[test]
    fn test_normalize_zero_fails() {
        assert_eq!(Quaternion::ZERO.normalize(), Err(QuaternionError::ZeroNorm));
        assert_eq!(Quaternion::new(-0.0, 0.0, -0.0, 0.0).normalize(), Err(QuaternionError::ZeroNorm));
    }

    #[test]
    fn test_normalize_tiny_succeeds() {
        // Only an exact zero norm is rejected
        let q = Quaternion::new(1e-150, 0.0, 0.0, 0.0);
        assert_eq!(q.normalize().unwrap(), Quaternion::ONE);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::new(1.5, 4.0, 2.0, -2.5);
        let inv = q.inverse().unwrap();
        assert_eq!(inv.q0(), 1.5 / 28.5);
        assert_eq!(inv.q1(), -4.0 / 28.5);
        assert_eq!(inv.q2(), -2.0 / 28.5);
        assert_eq!(inv.q3(), 2.5 / 28.5);

        assert!((inv * q).approx_eq(&Quaternion::ONE, EPS));
        assert!((q * inv).approx_eq(&Quaternion::ONE, EPS));
    }

    #[test]
    fn test_inverse_zero_fails() {
        assert_eq!(Quaternion::ZERO.inverse(), Err(QuaternionError::ZeroNorm));
    }

    #[test]
    fn test_is_pure() {
        assert!(Quaternion::new(0.0, 5.0, 4.0, 8.0).is_pure(EPS));
        assert!(Quaternion::new(0.0 - EPS, 5.0, 4.0, 8.0).is_pure(EPS));
        assert!(!Quaternion::new(0.0 - 1.1 * EPS, 5.0, 4.0, 8.0).is_pure(EPS));
        assert!(Quaternion::from_vector(&[5.0, 4.0, 8.0]).unwrap().is_pure(0.0));
        assert!(Quaternion::from_scalar_vector(0.0, &[5.0, 4.0, 8.0]).unwrap().is_pure(0.0));
    }

    #[test]
    fn test_is_unit() {
        assert!(Quaternion::ONE.is_unit(0.0));
        assert!(!Quaternion::new(1.0, 1.0, 1.0, 1.0).is_unit(COMPARISON_EPS));
        assert!(Quaternion::new(0.5, 0.5, 0.5, 0.5).is_unit(COMPARISON_EPS));
    }

    #[test]
    fn test_positive_polar_form_scalar_positive() {
        let q = Quaternion::new(3.0, -3.0, -3.0, 3.0);
        let expected = Quaternion::new(0.5, -0.5, -0.5, 0.5);
        assert!(q.positive_polar_form().unwrap().approx_eq(&expected, EPS));
    }

    #[test]
    fn test_positive_polar_form_scalar_negative() {
        let q = Quaternion::new(-3.0, 3.0, -3.0, 3.0);
        let expected = Quaternion::new(0.5, -0.5, 0.5, -0.5);
        assert!(q.positive_polar_form().unwrap().approx_eq(&expected, EPS));
    }

    #[test]
    fn test_positive_polar_form_antipodal() {
        let q = Quaternion::new(-0.3, 1.2, 0.7, -2.0).normalize().unwrap();
        let a = q.positive_polar_form().unwrap();
        let b = (-q).positive_polar_form().unwrap();
        assert_eq!(a, b);
        assert!(a.q0() >= 0.0);
        assert!(a.is_unit(COMPARISON_EPS));
        assert_eq!(Quaternion::ZERO.positive_polar_form(), Err(QuaternionError::ZeroNorm));
    }

    #[test]
    fn test_positive_polar_form_pure() {
        let q = Quaternion::new(0.0, -3.0, 4.0, 0.0);
        let expected = Quaternion::new(0.0, 0.6, -0.8, 0.0);
        assert!(q.positive_polar_form().unwrap().approx_eq(&expected, EPS));
        assert_eq!(q.positive_polar_form(), (-q).positive_polar_form());
    }

    #[test]
    fn test_exact_equality() {
        let q1 = Quaternion::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(q1, q1);
        assert_eq!(Quaternion::new(1.0, 1.0, 1.0, 1.0), q1);
        let q3 = Quaternion::new(1.0, f64::from_bits(1f64.to_bits() + 1), 1.0, 1.0);
        assert_ne!(q3, q1);
    }

    #[test]
    fn test_exact_equality_signed_zero() {
        let zero = Quaternion::ZERO;
        for i in 0..4 {
            let mut components = [0.0; 4];
            components[i] = -0.0;
            let y = Quaternion::from(components);
            assert!(!zero.exact_eq(&y), "signed zero at {} should differ", i);
            assert_ne!(hash_of(&zero), hash_of(&y));
        }
    }

    #[test]
    fn test_exact_equality_nan() {
        let q = Quaternion::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(!q.exact_eq(&q));
        assert_ne!(q, q);
        assert!(!q.approx_eq(&q, 1.0));
    }

    #[test]
    fn test_hash() {
        let x = Quaternion::ZERO;
        let y = Quaternion::new(0.0, f64::MIN_POSITIVE, 0.0, 0.0);
        assert_ne!(hash_of(&x), hash_of(&y));
        let y = Quaternion::new(f64::from_bits(1), 0.0, 0.0, 0.0);
        assert_ne!(hash_of(&x), hash_of(&y));

        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_approx_eq_single_component() {
        let inc = 1e-5;
        let q1 = Quaternion::new(2.0, 1.0, -4.0, -2.0);
        let shifted = [
            Quaternion::new(2.0 + inc, 1.0, -4.0, -2.0),
            Quaternion::new(2.0, 1.0 + inc, -4.0, -2.0),
            Quaternion::new(2.0, 1.0, -4.0 + inc, -2.0),
            Quaternion::new(2.0, 1.0, -4.0, -2.0 + inc),
        ];
        for q in &shifted {
            assert!(!q1.approx_eq(q, 0.9 * inc));
            assert!(q1.approx_eq(q, 1.1 * inc));
        }
    }

    #[test]
    fn test_approx_eq_all_components() {
        let gap = 1e-5;
        let q1 = Quaternion::new(1.0, 4.0, 2.0, 3.0);
        let q2 = Quaternion::new(1.0 + gap, 4.0 + gap, 2.0 + gap, 3.0 + gap);
        assert!(q1.approx_eq(&q2, 10.0 * gap));
        assert!(!q1.approx_eq(&q2, gap));
        assert!(!q1.approx_eq(&q2, gap / 10.0));
        assert!(q2.approx_eq(&q1, 10.0 * gap));
    }

    #[test]
    fn test_approx_eq_is_inclusive() {
        let a = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let b = Quaternion::new(1.5, 0.0, 0.0, 0.0);
        assert!(a.approx_eq(&b, 0.5));
        assert!(a.approx_eq(&a, 0.0));
    }

    #[test]
    fn test_approx_eq_infinite_components() {
        let q = Quaternion::new(f64::INFINITY, 1.0, 2.0, 3.0);
        assert!(q.exact_eq(&q));
        assert!(q.approx_eq(&q, 1.0));
        assert!(q.approx_eq(&q, 0.0));

        let mixed = Quaternion::new(f64::INFINITY, f64::NEG_INFINITY, 2.0, 3.0);
        assert!(mixed.approx_eq(&mixed, 0.0));
        assert!(!mixed.approx_eq(&q, 1.0));
        assert!(!q.approx_eq(&Quaternion::new(f64::NEG_INFINITY, 1.0, 2.0, 3.0), f64::MAX));
        assert!(!q.approx_eq(&Quaternion::new(1e308, 1.0, 2.0, 3.0), f64::MAX));
        assert!(q.approx_eq(&Quaternion::new(f64::INFINITY, 1.5, 2.0, 3.0), 0.5));
    }

    #[test]
    fn test_serde_fields() {
        let q = Quaternion::new(1.0, -2.0, 0.5, 4.0);
        let text = toml::to_string(&q).unwrap();
        assert!(text.contains("q0 = 1.0"));
        assert!(text.contains("q2 = 0.5"));
        let back: Quaternion = toml::from_str(&text).unwrap();
        assert_eq!(back, q);
    }
}
