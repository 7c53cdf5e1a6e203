//! Page counter arithmetic shared by the Haiku and BSD backends.
//!
//! Kept free of host calls so it builds and is tested everywhere.

use crate::ffi::convert::to_bytes;

/// Pages the kernel has not handed out, as bytes. Haiku reports a page
/// budget and how much of it is in use rather than a free count.
pub fn unused_pages_bytes(max_pages: u64, used_pages: u64, page_size: u64) -> u64 {
    to_bytes(max_pages.saturating_sub(used_pages), page_size)
}

/// Reads `free * pagesize` out of a raw `uvmexp` snapshot.
///
/// Both OpenBSD's `struct uvmexp` (ints) and NetBSD's `struct uvmexp_sysctl`
/// (int64s) open with `pagesize, pagemask, pageshift, npages, free`, all of
/// the same width, so the snapshot is read as an array of that word.
pub fn uvmexp_free_bytes<W>(words: &[W]) -> Option<u64>
where
    W: Copy + Into<i64>,
{
    const PAGESIZE: usize = 0;
    const FREE: usize = 4;

    let page_size: i64 = (*words.get(PAGESIZE)?).into();
    let free: i64 = (*words.get(FREE)?).into();
    if page_size <= 0 || free < 0 {
        return None;
    }

    Some(to_bytes(free as u64, page_size as u64))
}
