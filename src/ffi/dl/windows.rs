use std::ffi::{c_void, CString};
use std::ptr::{self, NonNull};

use windows::{
    core::{PCSTR, PCWSTR},
    Win32::{
        Foundation::HMODULE,
        System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW},
    },
};

use super::{Error, Result};
use crate::ffi::convert::to_wide;

pub type RawHandle = HMODULE;

#[allow(dead_code)]
pub const INVALID: RawHandle = HMODULE(ptr::null_mut());

pub fn is_valid(raw: RawHandle) -> bool {
    !raw.0.is_null()
}

pub fn load(path: &str) -> Result<RawHandle> {
    if path.contains('\0') {
        return Err(Error::InvalidName(path.into()));
    }
    let wide = to_wide(path);
    // SAFETY: wide is nul-terminated UTF-16 and outlives the call.
    unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| Error::NotFound {
        name: path.into(),
        detail: e.to_string(),
    })
}

pub fn resolve(handle: RawHandle, name: &str) -> Result<NonNull<c_void>> {
    // GetProcAddress only takes ANSI names.
    let c_name = CString::new(name).map_err(|_| Error::InvalidName(name.into()))?;
    // SAFETY: handle came from LoadLibraryW and is non-null; c_name outlives the call.
    let proc = unsafe { GetProcAddress(handle, PCSTR(c_name.as_ptr() as *const u8)) };
    proc.and_then(|f| NonNull::new(f as *mut c_void))
        .ok_or_else(|| Error::NotFound {
            name: name.into(),
            detail: windows::core::Error::from_win32().to_string(),
        })
}

pub fn unload(handle: RawHandle) -> Result<()> {
    // SAFETY: handle came from LoadLibraryW and is non-null.
    unsafe { FreeLibrary(handle) }.map_err(|e| Error::Unload {
        detail: e.to_string(),
    })
}
