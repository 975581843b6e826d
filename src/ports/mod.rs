//! Port traits at the I/O seams.

pub mod config_port;
pub mod trade_source_port;
pub mod report_port;
