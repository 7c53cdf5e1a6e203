use std::ffi::{c_void, CString};
use std::ptr::{self, NonNull};

use super::{Error, Result};

/// An add-on image id. Negative values are error codes.
pub type RawHandle = libc::image_id;

#[allow(dead_code)]
pub const INVALID: RawHandle = -1;

pub fn is_valid(raw: RawHandle) -> bool {
    raw >= 0
}

fn to_cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidName(s.into()))
}

pub fn load(path: &str) -> Result<RawHandle> {
    let c_path = to_cstring(path)?;
    // SAFETY: c_path is nul-terminated and outlives the call.
    let image = unsafe { libc::load_add_on(c_path.as_ptr()) };
    if image < 0 {
        return Err(Error::NotFound {
            name: path.into(),
            detail: format!("load_add_on returned {:#x}", image),
        });
    }

    Ok(image)
}

pub fn resolve(handle: RawHandle, name: &str) -> Result<NonNull<c_void>> {
    let c_name = to_cstring(name)?;
    let mut location: *mut c_void = ptr::null_mut();
    // SAFETY: handle is a loaded image id, c_name outlives the call and
    // location is a valid out pointer.
    let status = unsafe {
        libc::get_image_symbol(
            handle,
            c_name.as_ptr(),
            libc::B_SYMBOL_TYPE_ANY,
            &mut location,
        )
    };
    if status != libc::B_OK {
        return Err(Error::NotFound {
            name: name.into(),
            detail: format!("get_image_symbol returned {:#x}", status),
        });
    }

    NonNull::new(location).ok_or_else(|| Error::NotFound {
        name: name.into(),
        detail: "symbol is bound to a null address".into(),
    })
}

pub fn unload(handle: RawHandle) -> Result<()> {
    // SAFETY: handle is an image id returned by load_add_on.
    let status = unsafe { libc::unload_add_on(handle) };
    if status != libc::B_OK {
        return Err(Error::Unload {
            detail: format!("unload_add_on returned {:#x}", status),
        });
    }

    Ok(())
}
