//! Window helpers for partial e-ink updates.
//!
//! Pure logic (no hardware) so it can be unit-tested without flashing.

use alloc::vec::Vec;

use crate::eink::Region;

fn rows(width_bytes: usize, region: Region) -> impl Iterator<Item = core::ops::Range<usize>> {
    let start_byte = region.x as usize / 8;
    let len = region.width_bytes();
    (region.y as usize..region.y as usize + region.h as usize).map(move |y| {
        let start = y * width_bytes + start_byte;
        start..start + len
    })
}

/// Copy the bytes under `region` into a compact row-major buffer.
pub fn extract_region(source: &[u8], width_bytes: usize, region: Region, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(region.buffer_size());
    for range in rows(width_bytes, region) {
        out.extend_from_slice(&source[range]);
    }
}

/// Whether any byte under `region` differs between the two frames.
pub fn region_differs(current: &[u8], last: &[u8], width_bytes: usize, region: Region) -> bool {
    rows(width_bytes, region).any(|range| current[range.clone()] != last[range])
}

/// Copy the bytes under `region` from `source` into `dest`.
pub fn copy_region(source: &[u8], dest: &mut [u8], width_bytes: usize, region: Region) {
    for range in rows(width_bytes, region) {
        dest[range.clone()].copy_from_slice(&source[range]);
    }
}
