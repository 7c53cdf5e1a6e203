use super::Result;

extern "C" {
    fn sceKernelTotalFreeMemSize() -> u32;
}

/// PSP-1000 units only have 32 MiB but nothing here tells them apart.
const TOTAL_BYTES: u64 = 64 * 1024 * 1024;

pub fn total() -> Result<u64> {
    Ok(TOTAL_BYTES)
}

pub fn free() -> Result<u64> {
    // SAFETY: no arguments, no preconditions.
    Ok(unsafe { sceKernelTotalFreeMemSize() } as u64)
}

pub fn available() -> Result<u64> {
    free()
}
