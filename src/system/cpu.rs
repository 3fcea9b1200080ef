/// One reading of the aggregate `cpu` line: ten jiffie counters, all
/// cumulative since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSnapshot {
    /// Time in user mode.
    pub user: u64,
    /// Time in user mode at low priority.
    pub nice: u64,
    /// Time in kernel mode.
    pub system: u64,
    /// Time idle.
    pub idle: u64,
    /// Time waiting for I/O to complete.
    pub iowait: u64,
    /// Time servicing hardware interrupts.
    pub irq: u64,
    /// Time servicing soft interrupts.
    pub softirq: u64,
    /// Time stolen by the hypervisor.
    pub steal: u64,
    /// Time running guest VMs.
    pub guest: u64,
    /// Time running niced guest VMs.
    pub guest_nice: u64,
}

impl CpuSnapshot {
    /// Jiffies spent doing work. Guest time is already folded into
    /// `user`/`nice` by the kernel, so it is not added again.
    pub fn active_jiffies(&self) -> u64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.steal
    }

    pub fn idle_jiffies(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn total_jiffies(&self) -> u64 {
        self.active_jiffies() + self.idle_jiffies()
    }
}

/// Derives instantaneous CPU utilization from successive snapshots. Each
/// sampler owns its previous-sample pair, so independent instances never
/// interfere.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSampler {
    prev_active: u64,
    prev_total: u64,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utilization in `[0, 1]` over the interval since the previous call.
    /// The first call measures against zero and therefore reports the
    /// since-boot average; callers wanting an instantaneous first reading
    /// should discard it.
    pub fn utilization(&mut self, snapshot: &CpuSnapshot) -> f64 {
        let active = snapshot.active_jiffies();
        let total = snapshot.total_jiffies();
        let delta_active = active.saturating_sub(self.prev_active);
        let delta_total = total.saturating_sub(self.prev_total);
        self.prev_active = active;
        self.prev_total = total;
        if delta_total == 0 {
            0.0
        } else {
            // A counter reset can leave delta_active > delta_total for one
            // interval; the reported fraction stays within bounds.
            (delta_active as f64 / delta_total as f64).clamp(0.0, 1.0)
        }
    }
}
