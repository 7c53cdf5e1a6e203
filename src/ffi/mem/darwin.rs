#![allow(non_camel_case_types, dead_code, deprecated)]

use libc::{integer_t, kern_return_t, mach_msg_type_number_t, mach_port_t, natural_t};
use std::mem::{size_of, MaybeUninit};

use super::{page_size, physical_pages_bytes, Error, Result};
use crate::ffi::convert::to_bytes;

type host_t = mach_port_t;
type host_flavor_t = integer_t;

extern "C" {
    fn host_statistics64(
        host_priv: host_t,
        flavor: host_flavor_t,
        host_info64_out: *mut vm_statistics64,
        host_info64_out_cnt: *mut mach_msg_type_number_t,
    ) -> kern_return_t;
}

/// `vm_statistics64` from `<mach/vm_statistics.h>`; counts are in pages.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
struct vm_statistics64 {
    free_count: natural_t,
    active_count: natural_t,
    inactive_count: natural_t,
    wire_count: natural_t,
    zero_fill_count: u64,
    reactivations: u64,
    pageins: u64,
    pageouts: u64,
    faults: u64,
    cow_faults: u64,
    lookups: u64,
    hits: u64,
    purges: u64,
    purgeable_count: natural_t,
    // Already included in free_count.
    speculative_count: natural_t,
    decompressions: u64,
    compressions: u64,
    swapins: u64,
    swapouts: u64,
    compressor_page_count: natural_t,
    throttled_count: natural_t,
    external_page_count: natural_t,
    internal_page_count: natural_t,
    total_uncompressed_pages_in_compressor: u64,
}

const HOST_VM_INFO64_COUNT: mach_msg_type_number_t =
    (size_of::<vm_statistics64>() / size_of::<integer_t>()) as mach_msg_type_number_t;
const HOST_VM_INFO64: host_flavor_t = 4;

/// Snapshot of the VM page counters, taken into a buffer local to this call.
fn vm_statistics() -> Result<vm_statistics64> {
    let mut stats: MaybeUninit<vm_statistics64> = MaybeUninit::uninit();
    let mut count = HOST_VM_INFO64_COUNT;

    // SAFETY: stats is large enough for HOST_VM_INFO64_COUNT integers and count
    // says so; the kernel writes at most that many.
    let ret = unsafe {
        host_statistics64(
            libc::mach_host_self(),
            HOST_VM_INFO64,
            stats.as_mut_ptr(),
            &mut count,
        )
    };

    if ret != libc::KERN_SUCCESS {
        return Err(Error::QueryFailed {
            call: "host_statistics64",
            detail: format!("kern_return_t {}", ret),
        });
    }

    // SAFETY: the call succeeded, so the kernel filled the structure.
    let stats = unsafe { stats.assume_init() };
    log::trace!("{:#?}", stats);
    Ok(stats)
}

pub fn total() -> Result<u64> {
    physical_pages_bytes()
}

pub fn free() -> Result<u64> {
    let stats = vm_statistics()?;
    Ok(to_bytes(stats.free_count as u64, page_size()?))
}

/// Free pages that are not merely speculative, plus file-backed and
/// purgeable pages the kernel can drop on demand.
pub fn available() -> Result<u64> {
    let stats = vm_statistics()?;
    let pages = (stats.free_count as u64).saturating_sub(stats.speculative_count as u64)
        + stats.external_page_count as u64
        + stats.purgeable_count as u64;
    Ok(to_bytes(pages, page_size()?).min(total()?))
}
