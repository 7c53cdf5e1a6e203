use std::ffi::{c_void, CString};
use std::ptr::{self, NonNull};

use super::{Error, Result};
use crate::ffi::convert::cstr_to_string;

pub type RawHandle = *mut c_void;

#[allow(dead_code)]
pub const INVALID: RawHandle = ptr::null_mut();

pub fn is_valid(raw: RawHandle) -> bool {
    !raw.is_null()
}

fn to_cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidName(s.into()))
}

/// Takes the loader's pending error message, if any. Reading it clears it.
fn take_error() -> Option<String> {
    // SAFETY: dlerror returns null or a thread-local message that stays valid
    // until the next dl* call on this thread; it is copied out right away.
    unsafe { cstr_to_string(libc::dlerror()) }
}

pub fn load(path: &str) -> Result<RawHandle> {
    let c_path = to_cstring(path)?;
    // SAFETY: c_path is nul-terminated and outlives the call.
    let raw = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_LAZY | libc::RTLD_GLOBAL) };
    if raw.is_null() {
        return Err(Error::NotFound {
            name: path.into(),
            detail: take_error().unwrap_or_else(|| "dlopen failed".into()),
        });
    }

    Ok(raw)
}

pub fn resolve(handle: RawHandle, name: &str) -> Result<NonNull<c_void>> {
    let c_name = to_cstring(name)?;
    // Clear anything left over so a null result can be told apart.
    take_error();
    // SAFETY: handle came from dlopen and is non-null; c_name outlives the call.
    let addr = unsafe { libc::dlsym(handle, c_name.as_ptr()) };
    NonNull::new(addr).ok_or_else(|| Error::NotFound {
        name: name.into(),
        detail: take_error().unwrap_or_else(|| "symbol is bound to a null address".into()),
    })
}

pub fn unload(handle: RawHandle) -> Result<()> {
    // SAFETY: handle came from dlopen and is non-null.
    if unsafe { libc::dlclose(handle) } != 0 {
        return Err(Error::Unload {
            detail: take_error().unwrap_or_else(|| "dlclose failed".into()),
        });
    }

    Ok(())
}
