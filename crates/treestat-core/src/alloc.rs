//! The instrumented allocator handed to the engine for one parse.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout};
use std::cell::Cell;

use mimalloc::MiMalloc;
use serde::Serialize;
use treestat_html::Allocator;

/// Allocation figures at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationStats {
    /// Calls to `allocate`.
    pub allocations: u64,
    /// Calls to `free`.
    pub frees: u64,
    /// Requested bytes, summed over every allocation.
    pub bytes_allocated: u64,
    /// Granted bytes, summed over every free.
    pub bytes_freed: u64,
    /// Peak of `bytes_allocated - bytes_freed`, sampled on each allocation.
    pub high_water_mark: u64,
}

impl AllocationStats {
    /// Bytes still held. Freed blocks are measured by their granted size,
    /// which can exceed the requested size, so this saturates at zero.
    #[must_use]
    pub const fn live_bytes(&self) -> u64 {
        self.bytes_allocated.saturating_sub(self.bytes_freed)
    }
}

/// Counts every allocation and free the engine makes while it is active,
/// then forwards to [`MiMalloc`].
///
/// Single-threaded: the engine only consults it on the thread that started
/// the parse, so plain [`Cell`]s are enough.
#[derive(Debug, Default)]
pub struct StatCollectingAllocator {
    allocations: Cell<u64>,
    frees: Cell<u64>,
    bytes_allocated: Cell<u64>,
    bytes_freed: Cell<u64>,
    high_water_mark: Cell<u64>,
}

impl StatCollectingAllocator {
    /// An allocator with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The counters so far.
    #[must_use]
    pub fn stats(&self) -> AllocationStats {
        AllocationStats {
            allocations: self.allocations.get(),
            frees: self.frees.get(),
            bytes_allocated: self.bytes_allocated.get(),
            bytes_freed: self.bytes_freed.get(),
            high_water_mark: self.high_water_mark.get(),
        }
    }
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get().saturating_add(by));
}

// SAFETY: both methods end in MiMalloc with the caller's arguments.
unsafe impl Allocator for StatCollectingAllocator {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        bump(&self.allocations, 1);
        bump(&self.bytes_allocated, layout.size() as u64);
        let live = self
            .bytes_allocated
            .get()
            .saturating_sub(self.bytes_freed.get());
        self.high_water_mark
            .set(self.high_water_mark.get().max(live));
        // SAFETY: the caller upholds the `GlobalAlloc::alloc` contract.
        unsafe { MiMalloc.alloc(layout) }
    }

    unsafe fn free(&self, ptr: *mut u8, layout: Layout) {
        bump(&self.frees, 1);
        // SAFETY: `ptr` is a live block from MiMalloc.
        let granted = unsafe { MiMalloc.usable_size(ptr) };
        bump(&self.bytes_freed, granted as u64);
        // SAFETY: the caller upholds the `GlobalAlloc::dealloc` contract.
        unsafe { MiMalloc.dealloc(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_high_water_mark() {
        let allocator = StatCollectingAllocator::new();
        let small = Layout::from_size_align(16, 8).unwrap();
        let large = Layout::from_size_align(100, 8).unwrap();

        unsafe {
            let a = allocator.allocate(small);
            let b = allocator.allocate(large);
            allocator.free(b, large);
            let c = allocator.allocate(small);
            allocator.free(a, small);
            allocator.free(c, small);
        }

        let stats = allocator.stats();
        assert_eq!(stats.allocations, 3);
        assert_eq!(stats.frees, 3);
        assert_eq!(stats.bytes_allocated, 132);
        assert!(stats.bytes_freed >= 132);
        assert_eq!(stats.high_water_mark, 116);
        assert_eq!(stats.live_bytes(), 0);
    }

    #[test]
    fn test_live_bytes_saturates() {
        let stats = AllocationStats {
            bytes_allocated: 10,
            bytes_freed: 16,
            ..AllocationStats::default()
        };
        assert_eq!(stats.live_bytes(), 0);
    }
}
