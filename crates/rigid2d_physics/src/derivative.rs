//! Derivative chains for numeric integration
//!
//! A [`DerivativeList`] holds a quantity and an open-ended chain of its
//! time derivatives: index 0 is the quantity itself, index 1 its first
//! derivative and so on. Stepping folds each derivative into the one
//! below it, highest first, which is the symplectic Euler update order.

/// A quantity that can be scaled by a timestep and accumulated.
pub trait Derivable: Copy {
    const ZERO: Self;

    /// `self + other * dt`
    fn add_scaled(self, other: Self, dt: f64) -> Self;
}

impl Derivable for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn add_scaled(self, other: Self, dt: f64) -> Self {
        self + other * dt
    }
}

impl Derivable for rigid2d_math::Vec2 {
    const ZERO: Self = rigid2d_math::Vec2::ZERO;

    #[inline]
    fn add_scaled(self, other: Self, dt: f64) -> Self {
        self + other * dt
    }
}

/// A quantity and the chain of its time derivatives.
///
/// Absent derivatives are zero: reading past the end yields
/// `Derivable::ZERO`, and writing past the end pads the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivativeList<T: Derivable> {
    values: Vec<T>,
}

impl<T: Derivable> DerivativeList<T> {
    /// A list whose quantity and all derivatives are zero.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// A list starting from the given quantity, with zero derivatives.
    pub fn from_value(value: T) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// The derivative at `index` (0 is the quantity itself).
    pub fn get(&self, index: usize) -> T {
        self.values.get(index).copied().unwrap_or(T::ZERO)
    }

    /// Set the derivative at `index`, zero-padding any gap below it.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.values.len() {
            self.values.resize(index + 1, T::ZERO);
        }
        self.values[index] = value;
    }

    /// Add to the derivative at `index`.
    pub fn add(&mut self, index: usize, value: T) {
        let current = self.get(index);
        self.set(index, current.add_scaled(value, 1.0));
    }

    /// Number of stored entries, including the quantity itself.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Advance time by `dt`. Each derivative is folded into the one
    /// below it, highest order first, so lower derivatives integrate
    /// the already-updated higher ones.
    pub fn step(&mut self, dt: f64) {
        for i in (0..self.values.len()).rev() {
            let above = self.get(i + 1);
            self.values[i] = self.values[i].add_scaled(above, dt);
        }
    }

    /// Zero every derivative above index 0, leaving the quantity
    /// itself untouched.
    pub fn arrest(&mut self) {
        self.values.truncate(1);
    }
}

impl<T: Derivable> Default for DerivativeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigid2d_math::Vec2;

    #[test]
    fn test_missing_derivatives_read_as_zero() {
        let list: DerivativeList<f64> = DerivativeList::from_value(3.0);
        assert_eq!(list.get(0), 3.0);
        assert_eq!(list.get(1), 0.0);
        assert_eq!(list.get(7), 0.0);
    }

    #[test]
    fn test_set_pads_with_zero() {
        let mut list: DerivativeList<f64> = DerivativeList::new();
        list.set(2, 4.0);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), 0.0);
        assert_eq!(list.get(1), 0.0);
        assert_eq!(list.get(2), 4.0);
    }

    #[test]
    fn test_constant_velocity_step() {
        let mut list = DerivativeList::from_value(5.0);
        list.set(1, 2.0);
        list.step(1.0);
        assert_eq!(list.get(0), 7.0);
        assert_eq!(list.get(1), 2.0);
    }

    #[test]
    fn test_acceleration_applies_before_position() {
        // With the highest-first order, v updates before x reads it
        let mut list = DerivativeList::from_value(0.0);
        list.set(1, 0.0);
        list.set(2, 10.0);
        list.step(0.5);
        assert_eq!(list.get(1), 5.0);
        // x integrated the *new* velocity
        assert_eq!(list.get(0), 2.5);
    }

    #[test]
    fn test_vector_derivatives() {
        let mut list = DerivativeList::from_value(Vec2::new(1.0, 1.0));
        list.set(1, Vec2::new(0.0, -10.0));
        list.step(0.1);
        assert_eq!(list.get(0), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_add_accumulates() {
        let mut list: DerivativeList<f64> = DerivativeList::new();
        list.add(1, 3.0);
        list.add(1, 4.0);
        assert_eq!(list.get(1), 7.0);
    }

    #[test]
    fn test_arrest_keeps_position() {
        let mut list = DerivativeList::from_value(9.0);
        list.set(1, 100.0);
        list.set(2, 50.0);
        list.arrest();
        assert_eq!(list.get(0), 9.0);
        assert_eq!(list.get(1), 0.0);
        assert_eq!(list.get(2), 0.0);
        list.step(1.0);
        assert_eq!(list.get(0), 9.0);
    }

    #[test]
    fn test_arrest_on_empty_list() {
        let mut list: DerivativeList<f64> = DerivativeList::new();
        list.arrest();
        assert_eq!(list.get(0), 0.0);
    }
}
