//! Host platform identity.
//!
//! This module answers one question: which platform package does this
//! machine need? The answer is a [`PlatformKey`] such as `linux-x64-gnu`
//! or `darwin-arm64`, composed from the host OS, the CPU architecture,
//! and (on Linux only) the C library family.

mod key;
mod libc;

pub use key::{PlatformKey, host_cpu, host_os, resolve};
pub use libc::{LibcFamily, LibcProbe, SystemLibcProbe};
