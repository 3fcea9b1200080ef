use serde::Serialize;

use super::procfs::ProcFs;
use super::users::UserTable;

/// Cumulative scheduler counters for one process, all in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessTimes {
    pub utime_ticks: u64,
    pub stime_ticks: u64,
    pub cutime_ticks: u64,
    pub cstime_ticks: u64,
    pub starttime_ticks: u64,
}

impl ProcessTimes {
    /// Ticks spent on CPU, own user/kernel time plus reaped children.
    pub fn active_ticks(&self) -> u64 {
        self.utime_ticks + self.stime_ticks + self.cutime_ticks + self.cstime_ticks
    }

    /// Seconds the process has existed, derived from the system uptime and
    /// the boot-relative start time. May come out zero or negative when a
    /// stale uptime reading races a freshly started process; callers guard
    /// on that.
    pub fn uptime_seconds(&self, system_uptime_secs: f64, ticks_per_second: u64) -> f64 {
        let hz = ticks_per_second.max(1) as f64;
        system_uptime_secs - self.starttime_ticks as f64 / hz
    }

    /// Lifetime-average share of one CPU in `[0, 1]`: total active seconds
    /// over total seconds alive. Deliberately not a delta. The system-wide
    /// sampler measures instantaneous load, this measures how busy the
    /// process has been overall.
    pub fn lifetime_utilization(&self, system_uptime_secs: f64, ticks_per_second: u64) -> f64 {
        let uptime = self.uptime_seconds(system_uptime_secs, ticks_per_second);
        if uptime <= 0.0 {
            return 0.0;
        }
        let hz = ticks_per_second.max(1) as f64;
        let active_secs = self.active_ticks() as f64 / hz;
        (active_secs / uptime).clamp(0.0, 1.0)
    }
}

/// Fields of interest from the per-process status file. Every field is
/// individually optional; kernel threads have no Vm lines and a process in
/// teardown may be missing any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStatus {
    pub uid: Option<u32>,
    pub vm_rss_kb: Option<u64>,
    pub state: Option<char>,
}

/// One row of the process table, rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub uid: Option<u32>,
    pub user: Option<String>,
    /// Raw cmdline text, NUL separators included. Empty for kernel threads.
    pub command: String,
    pub state: Option<char>,
    pub cpu_utilization: f64,
    pub ram_megabytes: u64,
    pub uptime_seconds: u64,
}

/// Builds the record for one pid, or `None` when the process vanished
/// between enumeration and read. Any other missing field degrades to its
/// documented default instead of dropping the process.
pub fn sample_process(
    procfs: &ProcFs,
    users: &mut UserTable,
    pid: u32,
    system_uptime_secs: f64,
    ticks_per_second: u64,
) -> Option<ProcessRecord> {
    let times = procfs.process_times(pid)?;
    let status = procfs.process_status(pid).unwrap_or_default();
    let command = procfs.process_cmdline(pid).unwrap_or_default();
    let user = status.uid.and_then(|uid| users.lookup(procfs, uid));

    Some(ProcessRecord {
        pid,
        uid: status.uid,
        user,
        command,
        state: status.state,
        cpu_utilization: times.lifetime_utilization(system_uptime_secs, ticks_per_second),
        ram_megabytes: status.vm_rss_kb.unwrap_or(0) / 1024,
        uptime_seconds: times
            .uptime_seconds(system_uptime_secs, ticks_per_second)
            .max(0.0) as u64,
    })
}
