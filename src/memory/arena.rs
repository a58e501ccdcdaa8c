//! Linear bump allocator over a fixed byte buffer

use bytemuck::Pod;

/// A monotonic bump allocator.
///
/// Allocations are handed out front to back from a single buffer. There is no
/// per-allocation free; `reset` rewinds the whole arena. Only `Pod` values are
/// constructed in place, so rewinding never skips a destructor.
#[derive(Debug)]
pub struct Arena {
    buffer: Box<[u8]>,
    used: usize,
}

impl Arena {
    /// Bind an arena to an existing buffer. Capacity is the buffer length.
    pub fn from_buffer(buffer: Box<[u8]>) -> Self {
        Self { buffer, used: 0 }
    }

    /// Allocate a zeroed buffer of `capacity` bytes and bind to it
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_buffer(vec![0u8; capacity].into_boxed_slice())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Hand out `size` bytes. Contents are whatever the buffer held before.
    ///
    /// # Panics
    ///
    /// Panics if the request does not fit in the remaining capacity.
    pub fn allocate(&mut self, size: usize) -> &mut [u8] {
        let start = self.bump(size, 1);
        &mut self.buffer[start..start + size]
    }

    /// Allocate `len` values of `T`, aligned for `T`.
    ///
    /// Alignment padding is charged to the arena like any other byte.
    ///
    /// # Panics
    ///
    /// Panics if the request does not fit in the remaining capacity.
    pub fn allocate_slice<T: Pod>(&mut self, len: usize) -> &mut [T] {
        let size = std::mem::size_of::<T>() * len;
        let start = self.bump(size, std::mem::align_of::<T>());
        bytemuck::cast_slice_mut(&mut self.buffer[start..start + size])
    }

    /// Allocate room for one `T` and write `value` into it
    ///
    /// # Panics
    ///
    /// Panics if the value does not fit in the remaining capacity.
    pub fn construct<T: Pod>(&mut self, value: T) -> &mut T {
        let size = std::mem::size_of::<T>();
        let start = self.bump(size, std::mem::align_of::<T>());
        let slot: &mut T = bytemuck::from_bytes_mut(&mut self.buffer[start..start + size]);
        *slot = value;
        slot
    }

    /// Rewind to empty. Memory contents are left untouched.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Reserve `size` bytes at `align` and return the start offset
    fn bump(&mut self, size: usize, align: usize) -> usize {
        let addr = self.buffer.as_ptr() as usize + self.used;
        let padding = addr.wrapping_neg() & (align - 1);
        let start = self.used + padding;
        assert!(
            start + size <= self.capacity(),
            "arena exhausted: requested {} bytes (+{} padding) with {} of {} used",
            size,
            padding,
            self.used,
            self.capacity()
        );
        self.used = start + size;
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_advances_used() {
        let mut arena = Arena::with_capacity(64);
        assert_eq!(arena.allocate(10).len(), 10);
        assert_eq!(arena.used(), 10);
        assert_eq!(arena.allocate(20).len(), 20);
        assert_eq!(arena.used(), 30);
        assert_eq!(arena.remaining(), 34);
    }

    #[test]
    fn test_allocate_exact_capacity() {
        let mut arena = Arena::with_capacity(16);
        arena.allocate(16);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "arena exhausted")]
    fn test_allocate_past_capacity_is_fatal() {
        let mut arena = Arena::with_capacity(16);
        arena.allocate(10);
        arena.allocate(7);
    }

    #[test]
    fn test_reset_keeps_contents() {
        let mut arena = Arena::from_buffer(vec![0u8; 8].into_boxed_slice());
        arena.allocate(4).copy_from_slice(&[1, 2, 3, 4]);
        arena.reset();
        assert_eq!(arena.used(), 0);
        // Bytes are handed out untouched after a reset
        assert_eq!(arena.allocate(4), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_construct_is_aligned() {
        let mut arena = Arena::with_capacity(64);
        arena.allocate(1);
        let value = arena.construct(0xDEAD_BEEFu32);
        assert_eq!(*value, 0xDEAD_BEEF);
        assert_eq!(value as *const u32 as usize % std::mem::align_of::<u32>(), 0);
        assert!(arena.used() >= 5);
    }

    #[test]
    fn test_allocate_slice() {
        let mut arena = Arena::with_capacity(128);
        let floats = arena.allocate_slice::<f32>(4);
        floats.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(floats.iter().sum::<f32>(), 10.0);
        assert_eq!(arena.allocate_slice::<f32>(0).len(), 0);
    }
}
