use serde::Serialize;

use super::clock_ticks_per_second;
use super::cpu::CpuSampler;
use super::process::{ProcessRecord, sample_process};
use super::procfs::{ProcError, ProcFs};
use super::users::UserTable;

/// Everything the display needs for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    /// Instantaneous system CPU fraction in `[0, 1]`.
    pub cpu_utilization: f64,
    /// Used memory fraction in `[0, 1]`.
    pub memory_utilization: f64,
    pub memory_total_kb: u64,
    pub memory_used_kb: u64,
    pub uptime_seconds: u64,
    pub total_processes: usize,
    pub running_processes: usize,
    /// Sorted by descending CPU utilization; ties keep pid order.
    pub processes: Vec<ProcessRecord>,
}

/// Facade over the sampling layer: owns the reader, the CPU sampler state,
/// and the user cache, and assembles a fresh snapshot per tick.
pub struct Monitor {
    procfs: ProcFs,
    sampler: CpuSampler,
    users: UserTable,
    ticks_per_second: u64,
    os_name: Option<String>,
    kernel_version: Option<String>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    pub fn new() -> Self {
        Self::with_procfs(ProcFs::new(), clock_ticks_per_second())
    }

    /// Construction point for tests: fixture tree plus a fixed tick rate.
    pub fn with_procfs(procfs: ProcFs, ticks_per_second: u64) -> Self {
        // The release and version files never change while we run.
        let os_name = procfs.operating_system();
        let kernel_version = procfs.kernel_version();
        Monitor {
            procfs,
            sampler: CpuSampler::new(),
            users: UserTable::new(),
            ticks_per_second,
            os_name,
            kernel_version,
        }
    }

    pub fn operating_system(&self) -> Option<&str> {
        self.os_name.as_deref()
    }

    pub fn kernel_version(&self) -> Option<&str> {
        self.kernel_version.as_deref()
    }

    /// One full sampling pass. Fails only when the process table itself
    /// cannot be enumerated; every other read degrades to its documented
    /// default for this tick.
    pub fn refresh(&mut self) -> Result<SystemSnapshot, ProcError> {
        #[cfg(feature = "perf-tracing")]
        let _refresh_span = tracing::debug_span!("monitor.refresh").entered();

        let pids = self.procfs.process_ids()?;

        let cpu_utilization = match self.procfs.system_cpu() {
            Ok(snapshot) => self.sampler.utilization(&snapshot),
            // Malformed or unreadable: value unavailable this tick. The
            // sampler keeps its previous state so the next good reading
            // still measures a real interval.
            Err(_) => 0.0,
        };

        let memory = self.procfs.memory().unwrap_or_default();
        let uptime = self.procfs.uptime().unwrap_or(0.0);

        let mut processes = Vec::with_capacity(pids.len());
        for &pid in &pids {
            if let Some(record) = sample_process(
                &self.procfs,
                &mut self.users,
                pid,
                uptime,
                self.ticks_per_second,
            ) {
                processes.push(record);
            }
        }
        sort_by_cpu(&mut processes);

        let running_processes = processes.iter().filter(|p| p.state == Some('R')).count();

        Ok(SystemSnapshot {
            cpu_utilization,
            memory_utilization: memory.utilization(),
            memory_total_kb: memory.total_kb,
            memory_used_kb: memory.used_kb(),
            uptime_seconds: uptime.max(0.0) as u64,
            total_processes: pids.len(),
            running_processes,
            processes,
        })
    }
}

/// Descending utilization, stable so enumeration order breaks ties.
/// Utilizations are guarded finite, which makes `partial_cmp` total here.
pub fn sort_by_cpu(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| {
        b.cpu_utilization
            .partial_cmp(&a.cpu_utilization)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
