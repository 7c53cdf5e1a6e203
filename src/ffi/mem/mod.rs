//! Total, free and available physical memory, in bytes.
//!
//! Each call asks the host again; nothing is cached and no state is shared
//! between calls. The plain functions report `0` when the host query fails,
//! which callers should read as "unknown".

#[cfg(windows)]
#[path = "windows.rs"]
mod native;

#[cfg(target_vendor = "apple")]
#[path = "darwin.rs"]
mod native;

#[cfg(any(target_os = "linux", target_os = "android"))]
#[path = "linux.rs"]
mod native;

#[cfg(target_os = "emscripten")]
#[path = "emscripten.rs"]
mod native;

#[cfg(target_os = "psp")]
#[path = "psp.rs"]
mod native;

#[cfg(target_os = "haiku")]
#[path = "haiku.rs"]
mod native;

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd",
    target_os = "netbsd"
))]
#[path = "bsd.rs"]
mod native;

#[cfg(all(
    unix,
    not(any(
        target_vendor = "apple",
        target_os = "linux",
        target_os = "android",
        target_os = "emscripten",
        target_os = "haiku",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "openbsd",
        target_os = "netbsd"
    ))
))]
#[path = "sysconf.rs"]
mod native;

#[cfg(not(any(unix, windows, target_os = "psp")))]
#[path = "unsupported.rs"]
mod native;

#[cfg(any(
    test,
    target_os = "haiku",
    target_os = "openbsd",
    target_os = "netbsd"
))]
mod counters;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{call} failed: {detail}")]
    QueryFailed { call: &'static str, detail: String },
    #[error("{0} is not reported on this platform")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads a `sysconf` variable, treating `-1` as a failed query.
#[cfg(all(
    unix,
    not(any(target_os = "linux", target_os = "android", target_os = "emscripten"))
))]
fn sysconf(name: libc::c_int, call: &'static str) -> Result<u64> {
    // SAFETY: sysconf has no preconditions; unknown names report -1.
    let value = unsafe { libc::sysconf(name) };
    if value < 0 {
        return Err(Error::QueryFailed {
            call,
            detail: std::io::Error::last_os_error().to_string(),
        });
    }

    Ok(value as u64)
}

#[cfg(all(
    unix,
    not(any(target_os = "linux", target_os = "android", target_os = "emscripten"))
))]
fn page_size() -> Result<u64> {
    sysconf(libc::_SC_PAGESIZE, "sysconf(_SC_PAGESIZE)")
}

#[cfg(all(
    unix,
    not(any(target_os = "linux", target_os = "android", target_os = "emscripten"))
))]
#[cfg_attr(target_os = "haiku", allow(dead_code))]
fn physical_pages_bytes() -> Result<u64> {
    let pages = sysconf(libc::_SC_PHYS_PAGES, "sysconf(_SC_PHYS_PAGES)")?;
    Ok(crate::ffi::convert::to_bytes(pages, page_size()?))
}

pub fn try_total_memory() -> Result<u64> {
    let bytes = native::total()?;
    log::trace!("total memory: {} bytes", bytes);
    Ok(bytes)
}

pub fn try_free_memory() -> Result<u64> {
    let bytes = native::free()?;
    log::trace!("free memory: {} bytes", bytes);
    Ok(bytes)
}

/// Memory a new workload could take without pushing the host into swap.
///
/// Only Linux distinguishes this from free memory (it counts reclaimable
/// page cache); elsewhere it is the same figure as [`try_free_memory`].
pub fn try_available_memory() -> Result<u64> {
    let bytes = native::available()?;
    log::trace!("available memory: {} bytes", bytes);
    Ok(bytes)
}

fn or_unknown(op: &str, result: Result<u64>) -> u64 {
    result.unwrap_or_else(|e| {
        log::debug!("{}: {}", op, e);
        0
    })
}

/// Total physical memory in bytes, or `0` if the host could not say.
pub fn total_memory() -> u64 {
    or_unknown("total_memory", try_total_memory())
}

/// Free physical memory in bytes, or `0` if the host could not say.
pub fn free_memory() -> u64 {
    or_unknown("free_memory", try_free_memory())
}

/// Available physical memory in bytes, or `0` if the host could not say.
pub fn available_memory() -> u64 {
    or_unknown("available_memory", try_available_memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_query_reads_as_zero() {
        let failed = Err(Error::QueryFailed {
            call: "sysinfo",
            detail: "simulated".into(),
        });
        assert_eq!(or_unknown("total_memory", failed), 0);
        assert_eq!(
            or_unknown("free_memory", Err(Error::Unsupported("free memory"))),
            0
        );
        assert_eq!(or_unknown("free_memory", Ok(4096)), 4096);
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_vendor = "apple",
        windows,
        target_os = "haiku",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "solaris",
        target_os = "illumos"
    ))]
    #[test]
    fn host_reports_memory() {
        let total = total_memory();
        let free = free_memory();
        assert!(total > 0);
        assert!(free > 0);
        assert!(total >= free, "total {} < free {}", total, free);
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_vendor = "apple",
        windows,
        target_os = "haiku",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "solaris",
        target_os = "illumos"
    ))]
    #[test]
    fn available_fits_in_total() {
        let available = try_available_memory().unwrap();
        assert!(available > 0);
        assert!(available <= total_memory());
    }
}
