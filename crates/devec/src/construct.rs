//! Constructors.
//!
//! Every form either allocates exactly once up front (known length) or
//! grows incrementally through `push_back` (unknown length). A constructor
//! that fails part-way drops the partially built devector, which destroys
//! whatever was constructed and frees the block.

use std::iter;

use devec_core::{Allocator, DevecError, Global};

use crate::devector::Devector;

impl<T, A: Allocator> Devector<T, A> {
    /// Empty devector with room for `capacity` elements at the back.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, DevecError> {
        Self::with_free_capacity_in(0, capacity, alloc)
    }

    /// Empty devector with `front` free slots before and `back` free slots
    /// after the (empty) live window. Allocates once when `front + back > 0`.
    pub fn with_free_capacity_in(front: usize, back: usize, alloc: A) -> Result<Self, DevecError> {
        let mut devector = Self::new_in(alloc);
        let capacity = front.checked_add(back).ok_or(DevecError::LengthError {
            requested: usize::MAX,
            max: devector.max_size(),
        })?;
        if capacity > 0 {
            devector.reallocate(capacity, front)?;
        }
        Ok(devector)
    }

    /// `n` clones of `value`.
    pub fn from_elem_in(n: usize, value: T, alloc: A) -> Result<Self, DevecError>
    where
        T: Clone,
    {
        Self::try_from_iter_in(iter::repeat_n(value, n), alloc)
    }

    /// `n` default-initialised elements.
    pub fn with_len_in(n: usize, alloc: A) -> Result<Self, DevecError>
    where
        T: Default,
    {
        Self::try_from_iter_in(iter::repeat_with(T::default).take(n), alloc)
    }

    /// Collect `iter` using `alloc`.
    ///
    /// When the iterator reports an exact length (`size_hint` lower bound
    /// equals its upper bound) the block is allocated once and elements
    /// are constructed directly into it. Otherwise the devector grows as
    /// elements arrive.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self, DevecError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut devector = Self::new_in(alloc);
        devector.try_extend(iter)?;
        Ok(devector)
    }
}

impl<T> Devector<T> {
    /// Empty devector with room for `capacity` elements at the back.
    pub fn with_capacity(capacity: usize) -> Result<Self, DevecError> {
        Self::with_capacity_in(capacity, Global)
    }

    /// Empty devector with the given free-slot split.
    ///
    /// ```
    /// let v = devec::Devector::<i32>::with_free_capacity(5, 10).unwrap();
    /// assert_eq!(v.capacity(), 15);
    /// assert_eq!(v.front_free_capacity(), 5);
    /// assert_eq!(v.back_free_capacity(), 10);
    /// ```
    pub fn with_free_capacity(front: usize, back: usize) -> Result<Self, DevecError> {
        Self::with_free_capacity_in(front, back, Global)
    }

    /// `n` clones of `value`.
    pub fn from_elem(n: usize, value: T) -> Result<Self, DevecError>
    where
        T: Clone,
    {
        Self::from_elem_in(n, value, Global)
    }

    /// `n` default-initialised elements.
    pub fn with_len(n: usize) -> Result<Self, DevecError>
    where
        T: Default,
    {
        Self::with_len_in(n, Global)
    }
}

impl<T: Clone, A: Allocator + Default> From<&[T]> for Devector<T, A> {
    fn from(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl<T, A: Allocator + Default, const N: usize> From<[T; N]> for Devector<T, A> {
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

impl<T, A: Allocator + Default> From<Vec<T>> for Devector<T, A> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::LinkedList;

    #[test]
    fn reserve_only_back() {
        let v = Devector::<i32>::with_capacity(10).unwrap();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.front_free_capacity(), 0);
        assert_eq!(v.back_free_capacity(), 10);
    }

    #[test]
    fn reserve_only_split() {
        let v = Devector::<i32>::with_free_capacity(5, 10).unwrap();
        assert_eq!(v.capacity(), 15);
        assert_eq!(v.front_free_capacity(), 5);
        assert_eq!(v.back_free_capacity(), 10);
        assert!(v.is_empty());
    }

    #[test]
    fn split_overflow_is_length_error() {
        let err = Devector::<u8>::with_free_capacity(usize::MAX, 1).unwrap_err();
        assert!(matches!(err, DevecError::LengthError { .. }));
    }

    #[test]
    fn from_elem_fills() {
        let v = Devector::from_elem(5, 42).unwrap();
        assert_eq!(v, [42; 5]);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn with_len_default_initialises() {
        let v = Devector::<i32>::with_len(5).unwrap();
        assert_eq!(v, [0; 5]);
    }

    #[test]
    fn exact_iterator_allocates_once() {
        let src = vec![1, 2, 3, 4, 5];
        let v = Devector::try_from_iter_in(src.iter().copied(), Global).unwrap();
        assert_eq!(v, src);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn unknown_length_iterator_grows() {
        let src: LinkedList<i32> = (1..=5).collect();
        let v = Devector::try_from_iter_in(src.iter().copied().filter(|_| true), Global).unwrap();
        assert_eq!(v, [1, 2, 3, 4, 5]);
        assert!(v.capacity() >= 5);
    }

    #[test]
    fn from_conversions() {
        let a: Devector<i32> = Devector::from([1, 2, 3]);
        let b: Devector<i32> = Devector::from(vec![1, 2, 3]);
        let c: Devector<i32> = Devector::from(&[1, 2, 3][..]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn zero_sized_elements() {
        let mut v = Devector::from_elem(3, ()).unwrap();
        v.push_front(()).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v.pop_back(), Some(()));
        assert_eq!(v.len(), 3);
    }
}
