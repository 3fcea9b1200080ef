//! Sampling and derivation layer: raw procfs text in, typed metrics and
//! ordered process records out. Nothing in here knows about rendering.

pub mod cpu;
pub mod monitor;
pub mod process;
pub mod procfs;
pub mod users;

pub use monitor::{Monitor, SystemSnapshot};
pub use procfs::ProcError;

/// Kernel clock ticks per second, for converting jiffies to seconds.
#[cfg(target_os = "linux")]
pub fn clock_ticks_per_second() -> u64 {
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 { hz as u64 } else { 100 }
}

#[cfg(not(target_os = "linux"))]
pub fn clock_ticks_per_second() -> u64 {
    100
}
