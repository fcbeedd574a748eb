//! Per-tick scratch arena with page-granular growth.
//!
//! One growable allocator backs all transient per-tick work (vertex
//! assembly, mostly). Growth is negotiated with the host through the
//! [`MemoryGrower`] contract in whole pages, monotonically: backing
//! memory is never released, and previously returned offsets stay valid
//! across growth. `clear()` only resets the write mark.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrowError {
    #[error("host refused growth of {pages} page(s)")]
    OutOfMemory { pages: usize },
}

/// Host memory-growth contract. Monotonic: a grower only ever adds
/// pages.
pub trait MemoryGrower {
    /// Page granularity in bytes. Constant for the grower's lifetime.
    fn page_size(&self) -> usize;

    /// Request `pages` more pages of backing memory.
    fn grow(&mut self, pages: usize) -> Result<(), GrowError>;
}

/// Heap-backed grower with wasm-style 64 KiB pages. The default host
/// implementation and the one tests use.
pub struct HeapGrower;

pub const HEAP_PAGE_SIZE: usize = 64 * 1024;

impl MemoryGrower for HeapGrower {
    fn page_size(&self) -> usize {
        HEAP_PAGE_SIZE
    }

    fn grow(&mut self, _pages: usize) -> Result<(), GrowError> {
        Ok(())
    }
}

/// Bump arena over host-granted pages.
pub struct Scratch<G: MemoryGrower> {
    grower: G,
    buf: Vec<u8>,
    mark: usize,
}

impl<G: MemoryGrower> Scratch<G> {
    pub fn new(grower: G) -> Self {
        Self {
            grower,
            buf: Vec::new(),
            mark: 0,
        }
    }

    /// Reserve `size` bytes and return their offset. Grows the backing
    /// store by whole pages when needed.
    pub fn alloc(&mut self, size: usize) -> Result<usize, GrowError> {
        let offset = self.mark;
        let needed = offset + size;
        if needed > self.buf.len() {
            let page = self.grower.page_size();
            let pages = (needed - self.buf.len()).div_ceil(page);
            self.grower.grow(pages)?;
            self.buf.resize(self.buf.len() + pages * page, 0);
        }
        self.mark = needed;
        Ok(offset)
    }

    /// Append `bytes` and return their offset.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<usize, GrowError> {
        let offset = self.alloc(bytes.len())?;
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(offset)
    }

    /// Everything written since the last `clear()`.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.mark]
    }

    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.buf[offset..offset + len]
    }

    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buf[offset..offset + len]
    }

    /// Bytes written this tick.
    pub fn used(&self) -> usize {
        self.mark
    }

    /// Bytes of backing memory held. Never shrinks.
    pub fn reserved(&self) -> usize {
        self.buf.len()
    }

    /// Reset the write mark. Pages are retained.
    pub fn clear(&mut self) {
        self.mark = 0;
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Grower with tiny pages and an optional budget, to make growth
    /// arithmetic observable.
    struct CountingGrower {
        page_size: usize,
        pages_granted: usize,
        budget: Option<usize>,
    }

    impl MemoryGrower for CountingGrower {
        fn page_size(&self) -> usize {
            self.page_size
        }

        fn grow(&mut self, pages: usize) -> Result<(), GrowError> {
            if let Some(budget) = self.budget {
                if self.pages_granted + pages > budget {
                    return Err(GrowError::OutOfMemory { pages });
                }
            }
            self.pages_granted += pages;
            Ok(())
        }
    }

    fn grower(page_size: usize, budget: Option<usize>) -> CountingGrower {
        CountingGrower {
            page_size,
            pages_granted: 0,
            budget,
        }
    }

    #[test]
    fn test_growth_is_page_granular() {
        let mut scratch = Scratch::new(grower(16, None));
        let a = scratch.alloc(10).unwrap();
        assert_eq!(a, 0);
        assert_eq!(scratch.reserved(), 16);
        // 10 + 20 = 30 needs one more 16-byte page.
        let b = scratch.alloc(20).unwrap();
        assert_eq!(b, 10);
        assert_eq!(scratch.reserved(), 32);
        assert_eq!(scratch.used(), 30);
    }

    #[test]
    fn test_offsets_stay_valid_across_growth() {
        let mut scratch = Scratch::new(grower(8, None));
        let a = scratch.push_bytes(&[1, 2, 3, 4]).unwrap();
        // Forces several new pages.
        scratch.push_bytes(&[0; 40]).unwrap();
        assert_eq!(scratch.bytes(a, 4), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_clear_keeps_pages() {
        let mut scratch = Scratch::new(grower(16, None));
        scratch.alloc(40).unwrap();
        let reserved = scratch.reserved();
        scratch.clear();
        assert_eq!(scratch.used(), 0);
        assert_eq!(scratch.reserved(), reserved);
        // Reuse after clear starts back at offset 0 without new growth.
        assert_eq!(scratch.alloc(8).unwrap(), 0);
        assert_eq!(scratch.reserved(), reserved);
    }

    #[test]
    fn test_refused_growth_is_an_error() {
        let mut scratch = Scratch::new(grower(16, Some(1)));
        scratch.alloc(16).unwrap();
        assert!(scratch.alloc(1).is_err());
        // The failed alloc did not move the mark.
        assert_eq!(scratch.used(), 16);
    }
}
