use std::ffi::CStr;
use std::os::raw::c_char;

/// Copies a C string owned by the host into a Rust `String`.
///
/// # Safety
///
/// `ptr` must be null or point at a nul-terminated string that stays valid
/// for the duration of this call.
pub unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// Nul-terminated UTF-16, as the `W` family of Win32 calls expects.
#[cfg(windows)]
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Scales a count of pages (or kB) to bytes, saturating instead of wrapping.
pub fn to_bytes(count: u64, unit: u64) -> u64 {
    count.saturating_mul(unit)
}
