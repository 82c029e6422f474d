//! Library components of the `dbf-dump` utility.

pub mod dump;
pub mod logging;
