//! Cycle-level model of a RISC-V node's memory arbitration and serial
//! programming path.

#![warn(missing_docs)]

pub mod arbiter;
pub mod config;
pub mod cpu;
pub mod error;
pub mod mem;
pub mod node;
pub mod parse;
pub mod port;
pub mod prog;
pub mod serial;
pub mod sim;
