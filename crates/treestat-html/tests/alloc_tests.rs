//! Integration tests for routing parser memory through a caller's allocator.
#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout};
use std::cell::Cell;

use mimalloc::MiMalloc;
use treestat_html::{Allocator, ParseOptions, destroy_output, parse_with_options};

/// Counts every call that reaches it.
#[derive(Default)]
struct CountingAllocator {
    allocations: Cell<usize>,
    frees: Cell<usize>,
    bytes_allocated: Cell<usize>,
    bytes_freed: Cell<usize>,
}

unsafe impl Allocator for CountingAllocator {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        self.allocations.set(self.allocations.get() + 1);
        self.bytes_allocated
            .set(self.bytes_allocated.get() + layout.size());
        unsafe { MiMalloc.alloc(layout) }
    }

    unsafe fn free(&self, ptr: *mut u8, layout: Layout) {
        self.frees.set(self.frees.get() + 1);
        self.bytes_freed.set(self.bytes_freed.get() + layout.size());
        unsafe { MiMalloc.dealloc(ptr, layout) }
    }
}

const SAMPLE: &str = "<!DOCTYPE html><html><head><title>Sample</title></head>\
    <body><div class=a><p>one <b>two</p>three</b><table>x<tr><td>y</table>\
    <svg><circle r=1 /></svg></div></body></html>";

#[test]
fn test_parse_routes_through_allocator() {
    let counter = CountingAllocator::default();
    let options = ParseOptions {
        allocator: &counter,
        max_errors: None,
    };

    let output = parse_with_options(&options, SAMPLE);
    assert!(counter.allocations.get() > 0);
    assert!(counter.bytes_allocated.get() > 0);
    assert!(counter.frees.get() < counter.allocations.get());

    destroy_output(&options, output);
    assert_eq!(counter.frees.get(), counter.allocations.get());
    assert_eq!(counter.bytes_freed.get(), counter.bytes_allocated.get());
}

#[test]
fn test_allocations_outside_scope_are_not_counted() {
    let counter = CountingAllocator::default();
    let options = ParseOptions {
        allocator: &counter,
        max_errors: None,
    };

    let output = parse_with_options(&options, "<p>hello</p>");
    let seen = counter.allocations.get();

    let unrelated: Vec<String> = (0..32).map(|i| i.to_string()).collect();
    assert_eq!(unrelated.len(), 32);
    assert_eq!(counter.allocations.get(), seen);

    destroy_output(&options, output);
}

#[test]
fn test_larger_input_allocates_more() {
    let small = CountingAllocator::default();
    let large = CountingAllocator::default();
    let large_input = "<p>paragraph</p>".repeat(200);

    let small_options = ParseOptions {
        allocator: &small,
        max_errors: None,
    };
    let large_options = ParseOptions {
        allocator: &large,
        max_errors: None,
    };

    let output = parse_with_options(&small_options, "<p>paragraph</p>");
    destroy_output(&small_options, output);
    let output = parse_with_options(&large_options, &large_input);
    destroy_output(&large_options, output);

    assert!(large.bytes_allocated.get() > small.bytes_allocated.get());
}
