//! Fixed-capacity blocks, the unit of transfer through a [`RingBuffer`](crate::RingBuffer).
//!
//! A [`Block`] can hold up to `N` elements and keeps track of how many of them are valid.
//! Only the valid elements are visible through [`Deref`], iteration, comparison and
//! [`Debug`](fmt::Debug) output; the remaining storage is stale from the caller's perspective.
//!
//! # Examples
//!
//! ```
//! use blockring::Block;
//!
//! let mut block = Block::<u8, 4>::from_slice(b"hello");
//! // NB: The input was silently truncated:
//! assert_eq!(block.len(), 4);
//! assert_eq!(*block, *b"hell");
//!
//! block.clear();
//! assert!(block.is_empty());
//! assert_eq!(block.push(b'x'), Ok(()));
//! assert_eq!(block.as_slice(), b"x");
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

/// A bundle of up to `N` elements plus the number of valid elements.
///
/// The number of valid elements can never exceed `N`:
/// all methods that add elements truncate, and [`set_len()`](Block::set_len) panics.
#[derive(Clone)]
pub struct Block<T, const N: usize> {
    len: usize,
    data: [T; N],
}

impl<T: Default, const N: usize> Block<T, N> {
    /// Creates an empty block, the storage is filled with [`Default`] values.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::Block;
    ///
    /// let block = Block::<f32, 16>::new();
    /// assert!(block.is_empty());
    /// assert_eq!(block.capacity(), 16);
    /// ```
    pub fn new() -> Block<T, N> {
        Block {
            len: 0,
            data: std::array::from_fn(|_| T::default()),
        }
    }

    /// Creates a block from (at most `N` elements of) a slice.
    ///
    /// Elements beyond the capacity are dropped silently.
    pub fn from_slice(slice: &[T]) -> Block<T, N>
    where
        T: Clone,
    {
        let mut block = Block::new();
        block.fill_from(slice.iter().cloned());
        block
    }
}

impl<T, const N: usize> Block<T, N> {
    /// Replaces the contents with (at most `N`) items taken from an iterator.
    ///
    /// Returns the number of stored items.
    /// Items beyond the capacity are not taken from the iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::Block;
    ///
    /// let mut block = Block::<i64, 3>::new();
    /// let mut items = vec![1, 2, 3, 4, 5].into_iter();
    /// assert_eq!(block.fill_from(&mut items), 3);
    /// assert_eq!(*block, [1, 2, 3]);
    /// assert_eq!(items.next(), Some(4));
    /// ```
    pub fn fill_from<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let mut len = 0;
        // NB: The storage has to be the first iterator in zip(), otherwise one surplus item
        //     would be taken from `items`.
        for (slot, item) in self.data.iter_mut().zip(items) {
            *slot = item.into();
            len += 1;
        }
        self.len = len;
        len
    }

    /// Appends a single element.
    ///
    /// If the block is full, the element is returned as an error.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.data[self.len] = value;
        self.len += 1;
        Ok(())
    }

    /// Marks all elements as invalid.
    ///
    /// The storage itself is left untouched.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the number of valid elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the block contains no valid elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if all `N` elements are valid.
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Returns the maximum number of elements, `N`.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the valid elements.
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Returns the valid elements for modification.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..self.len]
    }

    /// Returns the whole storage, including the elements that are currently not valid.
    ///
    /// This can be used to fill the storage in place,
    /// followed by [`set_len()`](Block::set_len).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::Block;
    ///
    /// let mut block = Block::<u8, 8>::new();
    /// block.storage_mut()[..3].copy_from_slice(b"abc");
    /// block.set_len(3);
    /// assert_eq!(block.as_slice(), b"abc");
    /// ```
    pub fn storage_mut(&mut self) -> &mut [T; N] {
        &mut self.data
    }

    /// Sets the number of valid elements.
    ///
    /// # Panics
    ///
    /// Panics if `len` is greater than `N`.
    pub fn set_len(&mut self, len: usize) {
        assert!(len <= N, "block length {} exceeds capacity {}", len, N);
        self.len = len;
    }
}

impl<T: Default, const N: usize> Default for Block<T, N> {
    fn default() -> Self {
        Block::new()
    }
}

impl<T, const N: usize> From<[T; N]> for Block<T, N> {
    /// Creates a full block.
    fn from(data: [T; N]) -> Self {
        Block { len: N, data }
    }
}

impl<T: Default, const N: usize> FromIterator<T> for Block<T, N> {
    /// Collects at most `N` items, the rest of the iterator is not consumed.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut block = Block::new();
        block.fill_from(iter);
        block
    }
}

impl<T, const N: usize> IntoIterator for Block<T, N> {
    type Item = T;
    type IntoIter = std::iter::Take<std::array::IntoIter<T, N>>;

    /// Yields the valid elements.
    ///
    /// The iterator knows its exact length,
    /// which allows collections to reserve enough space before extending.
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter().take(self.len)
    }
}

impl<T, const N: usize> Deref for Block<T, N> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for Block<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for Block<T, N> {
    /// Compares only the valid elements.
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for Block<T, N> {}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Block<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}
