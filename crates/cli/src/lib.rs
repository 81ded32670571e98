//! Long-running balanceq clients: consumer, load generator and recorders.
//!
//! The `balanceq` binary wires these to subcommands.

pub mod consume;
pub mod load_gen;
pub mod monitor;
