use std::mem::MaybeUninit;

use super::counters::unused_pages_bytes;
use super::{page_size, Error, Result};
use crate::ffi::convert::to_bytes;

/// Kernel memory counters, read into a buffer local to this call.
fn system_info() -> Result<libc::system_info> {
    let mut info: MaybeUninit<libc::system_info> = MaybeUninit::uninit();
    // SAFETY: info is a valid out pointer for one system_info.
    let status = unsafe { libc::get_system_info(info.as_mut_ptr()) };
    if status != libc::B_OK {
        return Err(Error::QueryFailed {
            call: "get_system_info",
            detail: format!("status {:#x}", status),
        });
    }

    // SAFETY: B_OK means the kernel filled the structure.
    Ok(unsafe { info.assume_init() })
}

pub fn total() -> Result<u64> {
    let info = system_info()?;
    Ok(to_bytes(info.max_pages as u64, page_size()?))
}

pub fn free() -> Result<u64> {
    let info = system_info()?;
    Ok(unused_pages_bytes(
        info.max_pages as u64,
        info.used_pages as u64,
        page_size()?,
    ))
}

pub fn available() -> Result<u64> {
    free()
}
