//! Typed bump storage with a fixed byte budget

/// Values of one type constructed front to back, never individually freed.
///
/// The budget is measured in bytes (`size_of::<T>()` per value) so a region
/// can be sized the same way as a raw arena. Storage for the whole budget is
/// reserved up front; constructing never reallocates.
#[derive(Debug)]
pub struct Region<T> {
    items: Vec<T>,
    used: usize,
    capacity: usize,
}

impl<T> Region<T> {
    pub fn new(capacity: usize) -> Self {
        let slots = capacity / std::mem::size_of::<T>().max(1);
        Self {
            items: Vec::with_capacity(slots),
            used: 0,
            capacity,
        }
    }

    /// Construct `value` in the region and return its index.
    ///
    /// # Panics
    ///
    /// Panics if the value does not fit in the byte budget.
    pub fn construct(&mut self, value: T) -> usize {
        let size = std::mem::size_of::<T>();
        assert!(
            self.used + size <= self.capacity,
            "region exhausted: {} of {} bytes used, {} more requested",
            self.used,
            self.capacity,
            size
        );
        self.used += size;
        self.items.push(value);
        self.items.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bytes consumed so far
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Byte budget
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Copy> Region<T> {
    /// Rewind to empty.
    ///
    /// Does not run destructors. Restricted to `Copy` types, which have none;
    /// any explicit teardown (component `on_destroy` hooks) must already have
    /// run before the rewind.
    pub fn reset(&mut self) {
        self.items.clear();
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_and_get() {
        let mut region: Region<u64> = Region::new(64);
        let a = region.construct(7);
        let b = region.construct(9);
        assert_eq!((a, b), (0, 1));
        assert_eq!(region.get(1), Some(&9));
        assert_eq!(region.used(), 16);
        *region.get_mut(0).unwrap() = 70;
        assert_eq!(region.iter().copied().collect::<Vec<_>>(), vec![70, 9]);
    }

    #[test]
    #[should_panic(expected = "region exhausted")]
    fn test_budget_is_enforced() {
        let mut region: Region<u64> = Region::new(16);
        region.construct(1);
        region.construct(2);
        region.construct(3);
    }

    #[test]
    fn test_reset_rewinds_budget() {
        let mut region: Region<u32> = Region::new(8);
        region.construct(1);
        region.construct(2);
        region.reset();
        assert!(region.is_empty());
        assert_eq!(region.used(), 0);
        region.construct(3);
        region.construct(4);
        assert_eq!(region.len(), 2);
    }
}
