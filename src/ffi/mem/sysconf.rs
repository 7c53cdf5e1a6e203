//! Remaining unix targets (Solaris, illumos, ...): page counts from `sysconf`.

use super::{physical_pages_bytes, Result};

pub fn total() -> Result<u64> {
    physical_pages_bytes()
}

#[cfg(any(target_os = "solaris", target_os = "illumos"))]
pub fn free() -> Result<u64> {
    let pages = super::sysconf(libc::_SC_AVPHYS_PAGES, "sysconf(_SC_AVPHYS_PAGES)")?;
    Ok(crate::ffi::convert::to_bytes(pages, super::page_size()?))
}

#[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
pub fn free() -> Result<u64> {
    Err(super::Error::Unsupported("free memory"))
}

pub fn available() -> Result<u64> {
    free()
}
