//! FreeBSD and DragonFly read the free page count by sysctl name; OpenBSD and
//! NetBSD take a whole `uvmexp` snapshot by MIB.

use super::{physical_pages_bytes, Error, Result};

fn sysctl_failed(call: &'static str) -> Error {
    Error::QueryFailed {
        call,
        detail: std::io::Error::last_os_error().to_string(),
    }
}

pub fn total() -> Result<u64> {
    physical_pages_bytes()
}

#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
pub fn free() -> Result<u64> {
    use std::mem::size_of;
    use std::os::raw::{c_char, c_uint, c_void};

    const V_FREE_COUNT: &[u8] = b"vm.stats.vm.v_free_count\0";

    let mut pages: c_uint = 0;
    let mut len = size_of::<c_uint>();
    // SAFETY: the name is nul-terminated; pages and len describe a buffer
    // of exactly one u_int, which is what the kernel writes for this OID.
    let ret = unsafe {
        libc::sysctlbyname(
            V_FREE_COUNT.as_ptr() as *const c_char,
            &mut pages as *mut c_uint as *mut c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if ret != 0 {
        return Err(sysctl_failed("sysctlbyname(vm.stats.vm.v_free_count)"));
    }

    Ok(crate::ffi::convert::to_bytes(pages as u64, super::page_size()?))
}

#[cfg(any(target_os = "openbsd", target_os = "netbsd"))]
const CTL_VM: libc::c_int = 2;

#[cfg(target_os = "openbsd")]
type UvmWord = i32;
#[cfg(target_os = "openbsd")]
const UVMEXP_MIB: [libc::c_int; 2] = [CTL_VM, 4]; // VM_UVMEXP

#[cfg(target_os = "netbsd")]
type UvmWord = i64;
#[cfg(target_os = "netbsd")]
const UVMEXP_MIB: [libc::c_int; 2] = [CTL_VM, 5]; // VM_UVMEXP2

#[cfg(any(target_os = "openbsd", target_os = "netbsd"))]
pub fn free() -> Result<u64> {
    use std::mem::size_of_val;
    use std::os::raw::c_void;

    use super::counters::uvmexp_free_bytes;

    // Larger than either struct; the kernel reports how much it wrote.
    let mut words = [0 as UvmWord; 256];
    let mut len = size_of_val(&words);
    // SAFETY: the MIB has two entries; words and len describe a writable
    // buffer the kernel fills up to len bytes.
    let ret = unsafe {
        libc::sysctl(
            UVMEXP_MIB.as_ptr(),
            UVMEXP_MIB.len() as libc::c_uint,
            words.as_mut_ptr() as *mut c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if ret != 0 {
        return Err(sysctl_failed("sysctl(vm.uvmexp)"));
    }

    let written = len / std::mem::size_of::<UvmWord>();
    uvmexp_free_bytes(&words[..written]).ok_or_else(|| Error::QueryFailed {
        call: "sysctl(vm.uvmexp)",
        detail: format!("short or malformed snapshot ({} bytes)", len),
    })
}

pub fn available() -> Result<u64> {
    free()
}
