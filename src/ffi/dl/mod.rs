//! Load a shared library, resolve symbols from it, unload it.
//!
//! Every operation is a single call into the host loader picked at build
//! time. Two surfaces are offered: the `try_*` functions return a
//! [`Result`] carrying the loader's own diagnostic text, and the plain
//! functions collapse that into `None`/`false` for callers that only care
//! whether it worked.

#[cfg(windows)]
#[path = "windows.rs"]
mod native;

#[cfg(all(target_os = "haiku", not(feature = "dlfcn")))]
#[path = "haiku.rs"]
mod native;

#[cfg(all(unix, not(all(target_os = "haiku", not(feature = "dlfcn")))))]
#[path = "dlfcn.rs"]
mod native;

#[cfg(not(any(unix, windows)))]
#[path = "unsupported.rs"]
mod native;

use std::ffi::c_void;
use std::fmt;
use std::mem;
use std::ptr::NonNull;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0:?} contains an interior nul byte")]
    InvalidName(String),
    #[error("could not find {name:?}: {detail}")]
    NotFound { name: String, detail: String },
    #[error("invalid library handle")]
    InvalidHandle,
    #[error("failed to unload library: {detail}")]
    Unload { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// An opaque reference to a loaded library.
///
/// The handle is a plain token: copying it does not add a load reference,
/// and nothing here keeps it alive. Each successful load must be matched by
/// exactly one unload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(native::RawHandle);

// SAFETY: a handle is an identifier the host loader hands out per process, not
// a pointer we dereference. The loaders themselves are thread safe; callers
// still serialize unload against concurrent resolves on the same handle.
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}

impl Handle {
    /// Wraps a raw handle obtained from the host loader elsewhere.
    ///
    /// # Safety
    ///
    /// `raw` must be a handle the current backend's loader returned and that
    /// has not been fully unloaded, or an invalid value such as null.
    pub unsafe fn from_raw(raw: native::RawHandle) -> Handle {
        Handle(raw)
    }

    pub fn as_raw(self) -> native::RawHandle {
        self.0
    }

    fn is_valid(self) -> bool {
        native::is_valid(self.0)
    }
}

/// The location a symbol name is bound to.
///
/// No type travels with it: the caller knows what the symbol is and casts
/// accordingly. It dangles as soon as the owning library is unloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(NonNull<c_void>);

// SAFETY: the address is only a value; dereferencing it is already unsafe and
// the caller's responsibility.
unsafe impl Send for Address {}
unsafe impl Sync for Address {}

impl Address {
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    pub fn cast<T>(self) -> *mut T {
        self.0.as_ptr() as *mut T
    }

    /// Reinterprets the address as a function pointer type `F`.
    ///
    /// # Safety
    ///
    /// The symbol must really be a function with exactly the signature and
    /// calling convention of `F`, and `F` must be pointer sized.
    pub unsafe fn to_fn<F: Copy>(self) -> F {
        debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*mut c_void>());
        mem::transmute_copy(&self.0.as_ptr())
    }
}

impl fmt::Pointer for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

/// Opens the shared library at `path` with the host loader.
///
/// On dlfcn hosts this binds lazily with global symbol visibility. The
/// library's initializers run before this returns.
pub fn try_load_library(path: &str) -> Result<Handle> {
    let raw = native::load(path)?;
    log::trace!("loaded {:?} as {:?}", path, raw);
    Ok(Handle(raw))
}

/// Looks `name` up in the exports of the library behind `handle`.
pub fn try_get_address(handle: Handle, name: &str) -> Result<Address> {
    if !handle.is_valid() {
        return Err(Error::InvalidHandle);
    }
    let addr = native::resolve(handle.0, name)?;
    log::trace!("resolved {:?} in {:?} to {:p}", name, handle.0, addr);
    Ok(Address(addr))
}

/// Drops one load reference; the host unmaps the library when none are left.
pub fn try_unload_library(handle: Handle) -> Result<()> {
    if !handle.is_valid() {
        return Err(Error::InvalidHandle);
    }
    native::unload(handle.0)?;
    log::trace!("unloaded {:?}", handle.0);
    Ok(())
}

fn sentinel<T>(op: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("{}: {}", op, e);
            None
        }
    }
}

/// `None` if the library cannot be found, parsed or linked.
pub fn load_library(path: &str) -> Option<Handle> {
    sentinel("load_library", try_load_library(path))
}

/// `None` if the handle is invalid or `name` is not exported.
pub fn get_address(handle: Handle, name: &str) -> Option<Address> {
    sentinel("get_address", try_get_address(handle, name))
}

/// `true` if the host loader accepted the unload.
pub fn unload_library(handle: Handle) -> bool {
    sentinel("unload_library", try_unload_library(handle)).is_some()
}

/// Owns one load reference and gives it back on drop.
#[derive(Debug)]
pub struct Library {
    handle: Handle,
}

impl Library {
    pub fn open(path: &str) -> Result<Library> {
        try_load_library(path).map(|handle| Library { handle })
    }

    pub fn get(&self, name: &str) -> Result<Address> {
        try_get_address(self.handle, name)
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Unloads now and reports whether the host accepted it.
    pub fn close(self) -> Result<()> {
        let handle = self.handle;
        mem::forget(self);
        try_unload_library(handle)
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        if let Err(e) = try_unload_library(self.handle) {
            log::debug!("dropping library {:?}: {}", self.handle.0, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::raw::c_int;

    /// A C runtime every supported test host has, exporting `abs`.
    fn c_runtime() -> Option<&'static str> {
        if cfg!(all(target_os = "linux", target_env = "gnu")) {
            Some("libc.so.6")
        } else if cfg!(target_vendor = "apple") {
            Some("/usr/lib/libSystem.B.dylib")
        } else if cfg!(windows) {
            Some("msvcrt.dll")
        } else {
            None
        }
    }

    type AbsFn = unsafe extern "C" fn(c_int) -> c_int;

    #[test]
    fn missing_library_is_none() {
        assert!(load_library("/definitely/not/here/libnothing.so").is_none());
        assert!(matches!(
            try_load_library("libhostshim-does-not-exist.so"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(matches!(
            try_load_library("libc\0.so"),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn non_library_file_fails_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a shared object").unwrap();
        let path = file.path().to_str().unwrap();
        assert!(load_library(path).is_none());
    }

    #[test]
    fn invalid_handle_is_refused() {
        let handle = unsafe { Handle::from_raw(native::INVALID) };
        assert!(get_address(handle, "abs").is_none());
        assert!(!unload_library(handle));
        assert!(matches!(
            try_unload_library(handle),
            Err(Error::InvalidHandle)
        ));
    }

    #[test]
    fn resolve_and_call() {
        let path = match c_runtime() {
            Some(path) => path,
            None => return,
        };

        let handle = load_library(path).expect("c runtime should load");
        let addr = get_address(handle, "abs").expect("abs should be exported");
        let abs: AbsFn = unsafe { addr.to_fn() };
        assert_eq!(unsafe { abs(-42) }, 42);

        assert!(get_address(handle, "abz_not_a_symbol").is_none());
        assert!(matches!(
            try_get_address(handle, "abz_not_a_symbol"),
            Err(Error::NotFound { .. })
        ));
        assert!(unload_library(handle));
    }

    #[test]
    fn library_guard_balances_loads() {
        let path = match c_runtime() {
            Some(path) => path,
            None => return,
        };

        let lib = Library::open(path).unwrap();
        assert!(!lib.get("abs").unwrap().as_ptr().is_null());
        assert!(lib.get("abs\0").is_err());
        lib.close().unwrap();

        // Dropping without close unloads as well.
        let lib = Library::open(path).unwrap();
        let _ = lib.handle();
    }
}
