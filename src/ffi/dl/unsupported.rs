use std::ffi::c_void;
use std::ptr::NonNull;

use super::{Error, Result};

pub type RawHandle = usize;

#[allow(dead_code)]
pub const INVALID: RawHandle = 0;

pub fn is_valid(raw: RawHandle) -> bool {
    raw != INVALID
}

pub fn load(path: &str) -> Result<RawHandle> {
    Err(Error::NotFound {
        name: path.into(),
        detail: "this target has no dynamic loader".into(),
    })
}

pub fn resolve(_handle: RawHandle, name: &str) -> Result<NonNull<c_void>> {
    Err(Error::NotFound {
        name: name.into(),
        detail: "this target has no dynamic loader".into(),
    })
}

pub fn unload(_handle: RawHandle) -> Result<()> {
    Err(Error::InvalidHandle)
}
