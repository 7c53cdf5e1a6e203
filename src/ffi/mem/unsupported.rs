use super::{Error, Result};

pub fn total() -> Result<u64> {
    Err(Error::Unsupported("total memory"))
}

pub fn free() -> Result<u64> {
    Err(Error::Unsupported("free memory"))
}

pub fn available() -> Result<u64> {
    free()
}
