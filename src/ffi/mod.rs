//! Native backends. Everything that touches a host API lives below here.

pub mod convert;
pub mod dl;
pub mod mem;
