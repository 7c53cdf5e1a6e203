//! Node.js `os` module when running under node, browser hints otherwise.

use std::os::raw::c_char;

use super::{Error, Result};
use crate::ffi::convert::cstr_to_string;

extern "C" {
    fn emscripten_run_script_string(script: *const c_char) -> *mut c_char;
}

const TOTAL_SCRIPT: &[u8] = b"String(Math.floor(\
typeof require === 'function' ? require('os').totalmem() \
: (navigator.deviceMemory || 0) * 1073741824))\0";

const FREE_SCRIPT: &[u8] = b"String(Math.floor(\
typeof require === 'function' ? require('os').freemem() \
: Math.max(0, (navigator.deviceMemory || 0) * 1073741824 \
- ((performance.memory && performance.memory.usedJSHeapSize) || 0))))\0";

fn run_script(call: &'static str, script: &[u8]) -> Result<u64> {
    // SAFETY: script is a nul-terminated literal. The returned buffer is owned
    // by the runtime and valid until the next script call; it is copied first.
    let output = unsafe {
        cstr_to_string(emscripten_run_script_string(
            script.as_ptr() as *const c_char,
        ))
    };
    output
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| "script returned nothing".to_string())
        .and_then(|s| s.parse::<u64>().map_err(|e| format!("{:?}: {}", s, e)))
        .map_err(|detail| Error::QueryFailed { call, detail })
}

pub fn total() -> Result<u64> {
    run_script("os.totalmem", TOTAL_SCRIPT)
}

pub fn free() -> Result<u64> {
    run_script("os.freemem", FREE_SCRIPT)
}

pub fn available() -> Result<u64> {
    free()
}
