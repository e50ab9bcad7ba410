use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

/// A growable array with an explicit capacity policy.
///
/// Capacity is tracked separately from the backing storage so that growth is fully deterministic:
///
/// - an explicitly requested capacity of 1 to 7 slots is rounded up to 8;
/// - when a push finds the array full, the first growth target is 16 slots, and every growth after that doubles
///   the capacity;
/// - [`GrowVec::grow`] sets the capacity to exactly the requested minimum (if it is larger than the current one).
///
/// There is no shrink operation. Every growth reallocates the backing storage, so references into the array must
/// not be held across a push.
#[derive(Clone, PartialEq, Eq)]
pub struct GrowVec<T> {
    capacity: usize,
    items: Vec<T>,
}

/// The integer flavor of [`GrowVec`], used for index lists.
pub type IntVec = GrowVec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VecError {
    #[error("index {index} is out of range for an array of size {size}")]
    OutOfRange { index: usize, size: usize },
}

impl<T> GrowVec<T> {
    const MIN_CAPACITY: usize = 8;
    const FIRST_GROWTH: usize = 16;

    pub const fn new() -> Self {
        GrowVec { capacity: 0, items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity > 0 && capacity < Self::MIN_CAPACITY { Self::MIN_CAPACITY } else { capacity };
        GrowVec { capacity, items: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ensures room for at least `min_capacity` entries. The new capacity is exactly `min_capacity`.
    pub fn grow(&mut self, min_capacity: usize) {
        if self.capacity >= min_capacity {
            return;
        }
        let mut items = Vec::with_capacity(min_capacity);
        items.append(&mut self.items);
        self.items = items;
        self.capacity = min_capacity;
    }

    pub fn push(&mut self, entry: T) {
        if self.items.len() == self.capacity {
            if self.capacity < Self::FIRST_GROWTH {
                self.grow(Self::FIRST_GROWTH);
            } else {
                self.grow(2 * self.capacity);
            }
        }
        self.items.push(entry);
    }

    pub fn entry(&self, index: usize) -> Result<&T, VecError> {
        self.items.get(index).ok_or(VecError::OutOfRange { index, size: self.items.len() })
    }

    pub fn entry_mut(&mut self, index: usize) -> Result<&mut T, VecError> {
        let size = self.items.len();
        self.items.get_mut(index).ok_or(VecError::OutOfRange { index, size })
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Removes the entry at `index`, shifting every later entry left by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, VecError> {
        if index >= self.items.len() {
            return Err(VecError::OutOfRange { index, size: self.items.len() });
        }
        Ok(self.items.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> GrowVec<T> {
    /// Removes one entry equal to `entry`, searching from the end of the array.
    ///
    /// Panics if no entry matches.
    pub fn remove(&mut self, entry: &T) {
        let position = self.items.iter().rposition(|item| item == entry);
        assert!(position.is_some(), "entry to remove is not present in the array");
        if let Some(index) = position {
            self.items.remove(index);
        }
    }

    pub fn contains(&self, entry: &T) -> bool {
        self.items.contains(entry)
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for GrowVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Index<usize> for GrowVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for GrowVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = GrowVec::new();
        for entry in iter {
            result.push(entry);
        }
        result
    }
}

impl<T> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry);
        }
    }
}

impl<T> IntoIterator for GrowVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
