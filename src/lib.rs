//! Two small facades over the host operating system:
//!
//! - [`dl`]: load a shared library, resolve a symbol to an address, unload it.
//! - [`mem`]: total, free and available physical memory.
//!
//! The backend for each is chosen when the crate is built for a target;
//! there is no runtime dispatch and no state kept between calls.

mod ffi;

pub use ffi::{dl, mem};

pub use dl::{get_address, load_library, unload_library, Address, Handle, Library};
pub use mem::{available_memory, free_memory, total_memory};
