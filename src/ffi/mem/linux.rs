use nix::sys::sysinfo::{sysinfo, SysInfo};
use std::{cmp, fs};

use super::{Error, Result};
use crate::ffi::convert::to_bytes;

const MEMINFO: &str = "/proc/meminfo";
const MIN_FREE_KBYTES: &str = "/proc/sys/vm/min_free_kbytes";

fn query() -> Result<SysInfo> {
    sysinfo().map_err(|e| Error::QueryFailed {
        call: "sysinfo",
        detail: e.to_string(),
    })
}

pub fn total() -> Result<u64> {
    Ok(query()?.ram_total())
}

pub fn free() -> Result<u64> {
    Ok(query()?.ram_unused())
}

pub fn available() -> Result<u64> {
    let text = fs::read_to_string(MEMINFO).map_err(|e| Error::QueryFailed {
        call: MEMINFO,
        detail: e.to_string(),
    })?;
    let info = MemInfo::parse(&text);
    if let Some(kb) = info.available {
        return Ok(to_bytes(kb, 1024));
    }

    // Kernels before 3.14 have no MemAvailable line.
    let min_free = fs::read_to_string(MIN_FREE_KBYTES)
        .map_err(|e| e.to_string())
        .and_then(|s| s.trim().parse::<u64>().map_err(|e| e.to_string()))
        .map_err(|detail| Error::QueryFailed {
            call: MIN_FREE_KBYTES,
            detail,
        })?;
    info.estimate_available(min_free)
        .map(|kb| to_bytes(kb, 1024))
        .ok_or_else(|| Error::QueryFailed {
            call: MEMINFO,
            detail: "missing MemFree, file LRU or SReclaimable".into(),
        })
}

fn read_number_from_line(s: &str) -> Option<u64> {
    s.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

/// The `/proc/meminfo` fields that matter here, in kB.
#[derive(Debug, Default, PartialEq)]
struct MemInfo {
    available: Option<u64>,
    free: Option<u64>,
    active_file: Option<u64>,
    inactive_file: Option<u64>,
    s_reclaimable: Option<u64>,
}

impl MemInfo {
    fn parse(text: &str) -> MemInfo {
        let mut info = MemInfo::default();
        for line in text.lines() {
            let field = if line.starts_with("MemAvailable:") {
                &mut info.available
            } else if line.starts_with("MemFree:") {
                &mut info.free
            } else if line.starts_with("Active(file):") {
                &mut info.active_file
            } else if line.starts_with("Inactive(file):") {
                &mut info.inactive_file
            } else if line.starts_with("SReclaimable:") {
                &mut info.s_reclaimable
            } else {
                continue;
            };
            *field = read_number_from_line(line);
        }

        info
    }

    /// The kernel's own MemAvailable formula, using `min_free_kbytes * 5 / 4`
    /// as the low watermark.
    fn estimate_available(&self, min_free_kbytes: u64) -> Option<u64> {
        let low = (min_free_kbytes * 5 / 4) as i64;
        let free = self.free? as i64;
        let page_cache = (self.active_file? + self.inactive_file?) as i64;
        let reclaimable = self.s_reclaimable? as i64;

        let estimate = free - low + page_cache - cmp::min(page_cache / 2, low) + reclaimable
            - cmp::min(reclaimable / 2, low);
        Some(cmp::max(estimate, 0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MemTotal:       16318412 kB
MemFree:         1203452 kB
MemAvailable:    9876543 kB
Buffers:          402188 kB
Active(file):    3000000 kB
Inactive(file):  4000000 kB
SReclaimable:     600000 kB
";

    #[test]
    fn parses_relevant_fields() {
        let info = MemInfo::parse(SAMPLE);
        assert_eq!(
            info,
            MemInfo {
                available: Some(9876543),
                free: Some(1203452),
                active_file: Some(3000000),
                inactive_file: Some(4000000),
                s_reclaimable: Some(600000),
            }
        );
    }

    #[test]
    fn estimate_follows_kernel_formula() {
        let info = MemInfo::parse(SAMPLE);
        // low = 80000; 1203452 - 80000 + 7000000 - 80000 + 600000 - 80000
        assert_eq!(info.estimate_available(64000), Some(8563452));
    }

    #[test]
    fn estimate_never_goes_negative() {
        let info = MemInfo {
            free: Some(10),
            active_file: Some(0),
            inactive_file: Some(0),
            s_reclaimable: Some(0),
            ..MemInfo::default()
        };
        assert_eq!(info.estimate_available(1_000_000), Some(0));
    }

    #[test]
    fn estimate_needs_every_field() {
        let info = MemInfo::parse("MemFree: 100 kB\n");
        assert_eq!(info.estimate_available(64000), None);
    }

    #[test]
    fn live_sysinfo_is_consistent() {
        let total = total().unwrap();
        let free = free().unwrap();
        assert!(total > 0);
        assert!(free <= total);
    }
}
