use std::mem::size_of;

use windows::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

use super::{Error, Result};

fn memory_status() -> Result<MEMORYSTATUSEX> {
    let mut status = MEMORYSTATUSEX {
        dwLength: size_of::<MEMORYSTATUSEX>() as u32,
        ..Default::default()
    };
    // SAFETY: status is a live, correctly sized MEMORYSTATUSEX.
    unsafe { GlobalMemoryStatusEx(&mut status) }.map_err(|e| Error::QueryFailed {
        call: "GlobalMemoryStatusEx",
        detail: e.to_string(),
    })?;

    Ok(status)
}

pub fn total() -> Result<u64> {
    Ok(memory_status()?.ullTotalPhys)
}

pub fn free() -> Result<u64> {
    Ok(memory_status()?.ullAvailPhys)
}

pub fn available() -> Result<u64> {
    free()
}
