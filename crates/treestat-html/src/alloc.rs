//! Pluggable memory for parsing.
//!
//! Every allocation the parser makes while building a tree, and every free
//! while tearing one down, goes through the [`Allocator`] named in the
//! [`ParseOptions`](crate::ParseOptions). This works by installing
//! [`RoutingAllocator`] as the global allocator (the default
//! `global-allocator` feature): it forwards to whichever capability is active
//! on the current thread and to [`MiMalloc`] otherwise.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout};
use std::cell::Cell;
use std::marker::PhantomData;

use mimalloc::MiMalloc;

/// A source of memory for one parse.
///
/// # Safety
///
/// `allocate` must return null or a block from [`MiMalloc`] that fits
/// `layout`, and `free` must hand the block back to [`MiMalloc`]. Blocks can
/// cross the boundary of an active scope in either direction, so they have to
/// come from the same heap as everything else.
pub unsafe trait Allocator {
    /// Allocate a block for `layout`.
    ///
    /// # Safety
    ///
    /// Same contract as [`GlobalAlloc::alloc`].
    unsafe fn allocate(&self, layout: Layout) -> *mut u8;

    /// Release a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// Same contract as [`GlobalAlloc::dealloc`].
    unsafe fn free(&self, ptr: *mut u8, layout: Layout);
}

/// The default capability: plain [`MiMalloc`] with no bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

// SAFETY: both methods forward straight to MiMalloc.
unsafe impl Allocator for SystemAllocator {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        // SAFETY: the caller upholds the `GlobalAlloc::alloc` contract.
        unsafe { MiMalloc.alloc(layout) }
    }

    unsafe fn free(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: the caller upholds the `GlobalAlloc::dealloc` contract.
        unsafe { MiMalloc.dealloc(ptr, layout) }
    }
}

thread_local! {
    static ACTIVE: Cell<Option<&'static dyn Allocator>> = const { Cell::new(None) };
}

/// Take the active capability out of its slot. While it is out, nested
/// allocations (from inside the capability itself) fall through to MiMalloc.
fn take_active() -> Option<&'static dyn Allocator> {
    ACTIVE.try_with(Cell::take).ok().flatten()
}

fn put_back(allocator: &'static dyn Allocator) {
    let _ = ACTIVE.try_with(|slot| slot.set(Some(allocator)));
}

/// Global allocator that routes through the thread's active [`Allocator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingAllocator;

// SAFETY: every path ends in MiMalloc, either directly or through an
// `Allocator` whose contract requires it.
unsafe impl GlobalAlloc for RoutingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        match take_active() {
            Some(active) => {
                // SAFETY: forwarded caller contract.
                let ptr = unsafe { active.allocate(layout) };
                put_back(active);
                ptr
            }
            // SAFETY: forwarded caller contract.
            None => unsafe { MiMalloc.alloc(layout) },
        }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        match take_active() {
            Some(active) => {
                // SAFETY: forwarded caller contract.
                let ptr = unsafe { active.allocate(layout) };
                if !ptr.is_null() {
                    // SAFETY: a non-null block fits `layout`.
                    unsafe { ptr.write_bytes(0, layout.size()) };
                }
                put_back(active);
                ptr
            }
            // SAFETY: forwarded caller contract.
            None => unsafe { MiMalloc.alloc_zeroed(layout) },
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        match take_active() {
            Some(active) => {
                // SAFETY: forwarded caller contract.
                unsafe { active.free(ptr, layout) };
                put_back(active);
            }
            // SAFETY: forwarded caller contract.
            None => unsafe { MiMalloc.dealloc(ptr, layout) },
        }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let Some(active) = take_active() else {
            // SAFETY: forwarded caller contract.
            return unsafe { MiMalloc.realloc(ptr, layout, new_size) };
        };
        // SAFETY: `GlobalAlloc::realloc` requires `new_size`, rounded up to
        // `layout.align()`, to not overflow `isize`.
        let new_layout = unsafe { Layout::from_size_align_unchecked(new_size, layout.align()) };
        // SAFETY: forwarded caller contract.
        let new_ptr = unsafe { active.allocate(new_layout) };
        if !new_ptr.is_null() {
            // SAFETY: the old block holds `layout.size()` bytes, the new one
            // `new_size`, and two live blocks cannot overlap.
            unsafe {
                std::ptr::copy_nonoverlapping(ptr, new_ptr, layout.size().min(new_size));
                active.free(ptr, layout);
            }
        }
        put_back(active);
        new_ptr
    }
}

/// While alive, makes `allocator` the thread's active capability. Dropping
/// it restores whatever was active before, so scopes nest.
pub(crate) struct AllocatorScope<'a> {
    previous: Option<&'static dyn Allocator>,
    _allocator: PhantomData<&'a dyn Allocator>,
}

impl<'a> AllocatorScope<'a> {
    pub(crate) fn enter(allocator: &'a dyn Allocator) -> Self {
        // SAFETY: the slot only holds the reference until this scope drops,
        // and the scope cannot outlive 'a. Scopes are never leaked inside
        // this crate.
        let erased =
            unsafe { std::mem::transmute::<&'a dyn Allocator, &'static dyn Allocator>(allocator) };
        let previous = ACTIVE.with(|slot| slot.replace(Some(erased)));
        Self {
            previous,
            _allocator: PhantomData,
        }
    }
}

impl Drop for AllocatorScope<'_> {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_active() -> bool {
        ACTIVE.with(|slot| slot.get().is_some())
    }

    #[test]
    fn test_scope_restores_previous() {
        let outer = SystemAllocator;
        let inner = SystemAllocator;
        assert!(!scope_active());
        {
            let _outer = AllocatorScope::enter(&outer);
            assert!(scope_active());
            {
                let _inner = AllocatorScope::enter(&inner);
                assert!(scope_active());
            }
            assert!(scope_active());
        }
        assert!(!scope_active());
    }

    #[test]
    fn test_system_allocator_round_trip() {
        let layout = Layout::from_size_align(64, 8).unwrap();
        unsafe {
            let ptr = SystemAllocator.allocate(layout);
            assert!(!ptr.is_null());
            ptr.write_bytes(0xAB, 64);
            SystemAllocator.free(ptr, layout);
        }
    }
}
