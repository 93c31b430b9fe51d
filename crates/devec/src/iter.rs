//! Iteration: the owning [`IntoIter`], the borrowing `IntoIterator` impls,
//! and collection from iterators.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use devec_core::{Allocator, DevecError, Global};

use crate::devector::Devector;
use crate::raw::{self, Block};

/// Owning iterator over the elements of a [`Devector`].
///
/// Keeps the devector's block; elements not yielded are dropped and the
/// block freed when the iterator is dropped.
pub struct IntoIter<T, A: Allocator = Global> {
    buf: NonNull<T>,
    capacity: usize,
    /// Slot of the next front element.
    start: usize,
    /// One past the slot of the next back element.
    end: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: the iterator owns the remaining elements and the allocator.
unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}
// SAFETY: shared access only exposes `&T`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` holds live values.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start` is live and leaves the window before reuse.
        let value = unsafe { ptr::read(self.buf.as_ptr().add(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: `end` was live and is now outside the window.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.end)) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let block = Block {
            ptr: self.buf,
            capacity: self.capacity,
            front_free: self.start,
            len: self.end - self.start,
        };
        // SAFETY: the block came from `alloc`; only the window is live.
        unsafe { raw::retire_block(&self.alloc, block) }
    }
}

impl<T, A: Allocator> IntoIterator for Devector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(mut self) -> IntoIter<T, A> {
        let block = self.take_block();
        IntoIter {
            buf: block.ptr,
            capacity: block.capacity,
            start: block.front_free,
            end: block.front_free + block.len,
            alloc: self.alloc.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Devector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Devector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Allocator> Devector<T, A> {
    /// Append every item of `items` at the back.
    ///
    /// All-or-nothing: on error or panic the devector holds its previous
    /// elements.
    pub fn try_extend<I>(&mut self, items: I) -> Result<(), DevecError>
    where
        I: IntoIterator<Item = T>,
    {
        self.append_iter(items, true).map(|_| ())
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for Devector<T, A> {
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::try_from_iter_in(iter, A::default()).unwrap_or_else(|err| raw::allocation_panic(err))
    }
}

impl<T, A: Allocator> Extend<T> for Devector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.try_extend(iter)
            .unwrap_or_else(|err| raw::allocation_panic(err));
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Devector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn into_iter_both_ends() {
        let v: Devector<i32> = Devector::from([1, 2, 3, 4]);
        let mut it = v.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.as_slice(), &[2, 3]);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn dropping_partial_iterator_drops_rest() {
        let shared = Rc::new(());
        let v: Devector<Rc<()>> = (0..5).map(|_| Rc::clone(&shared)).collect();
        let mut it = v.into_iter();
        let first = it.next();
        drop(it);
        assert_eq!(Rc::strong_count(&shared), 2);
        drop(first);
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn borrowing_iteration() {
        let mut v: Devector<i32> = Devector::from([1, 2, 3]);
        for x in &mut v {
            *x *= 2;
        }
        let sum: i32 = (&v).into_iter().sum();
        assert_eq!(sum, 12);
    }

    #[test]
    fn extend_appends_in_order() {
        let mut v: Devector<i32> = Devector::from([1]);
        v.extend([2, 3]);
        v.extend(&[4, 5]);
        assert_eq!(v, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn collect_front_loaded_devector() {
        let mut v = Devector::with_free_capacity(4, 0).unwrap();
        for i in (0..4).rev() {
            v.push_front(i).unwrap();
        }
        let out: Vec<i32> = v.into_iter().rev().collect();
        assert_eq!(out, vec![3, 2, 1, 0]);
    }
}
