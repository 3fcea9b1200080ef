use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::cpu::CpuSnapshot;
use super::process::{ProcessStatus, ProcessTimes};

#[derive(Debug)]
pub enum ProcError {
    /// The process table directory itself cannot be enumerated. Without
    /// pids the monitor has nothing to show, so this one is fatal.
    ProcRootUnreadable { path: PathBuf, source: io::Error },
    /// A pseudo-file that must exist could not be read this tick.
    Unreadable { path: PathBuf, source: io::Error },
    /// The aggregate cpu line did not carry exactly ten counters.
    MalformedCpuLine { fields: usize },
}

impl ProcError {
    /// Only a missing process table aborts the polling loop; everything
    /// else degrades to documented defaults for the current tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcError::ProcRootUnreadable { .. })
    }
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcError::ProcRootUnreadable { path, source } => {
                write!(f, "cannot enumerate process table {}: {source}", path.display())
            }
            ProcError::Unreadable { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ProcError::MalformedCpuLine { fields } => {
                write!(f, "cpu stat line has {fields} counters, expected 10")
            }
        }
    }
}

impl std::error::Error for ProcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcError::ProcRootUnreadable { source, .. } | ProcError::Unreadable { source, .. } => {
                Some(source)
            }
            ProcError::MalformedCpuLine { .. } => None,
        }
    }
}

/// System memory totals from the first two meminfo lines, in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MemoryInfo {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb)
    }

    /// Used fraction in `[0, 1]`; 0.0 when the total is zero.
    pub fn utilization(&self) -> f64 {
        if self.total_kb == 0 {
            0.0
        } else {
            self.used_kb() as f64 / self.total_kb as f64
        }
    }
}

/// Stateless reader over the kernel's pseudo-file tree. Every operation
/// opens one file, parses one fixed layout, and returns typed data or a
/// safe default. Roots are injectable so tests can point at a fixture
/// tree instead of a live system.
#[derive(Debug, Clone)]
pub struct ProcFs {
    proc_root: PathBuf,
    os_release_path: PathBuf,
    passwd_path: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/etc/os-release", "/etc/passwd")
    }

    pub fn with_roots(
        proc_root: impl Into<PathBuf>,
        os_release: impl Into<PathBuf>,
        passwd: impl Into<PathBuf>,
    ) -> Self {
        ProcFs {
            proc_root: proc_root.into(),
            os_release_path: os_release.into(),
            passwd_path: passwd.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// Pretty name of the installed distribution, if the release file
    /// carries one.
    pub fn operating_system(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.os_release_path).ok()?;
        parse_os_release(&contents)
    }

    /// Kernel release string, the third token of the version line.
    pub fn kernel_version(&self) -> Option<String> {
        let contents = fs::read_to_string(self.proc_root.join("version")).ok()?;
        parse_kernel_version(&contents)
    }

    /// All live pids, sorted ascending. Entries are accepted only when the
    /// directory name is entirely decimal digits.
    pub fn process_ids(&self) -> Result<Vec<u32>, ProcError> {
        let entries =
            fs::read_dir(&self.proc_root).map_err(|source| ProcError::ProcRootUnreadable {
                path: self.proc_root.clone(),
                source,
            })?;

        let mut pids = Vec::new();
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str()
                && !name.is_empty()
                && name.bytes().all(|b| b.is_ascii_digit())
                && let Ok(pid) = name.parse::<u32>()
            {
                pids.push(pid);
            }
        }
        pids.sort_unstable();
        Ok(pids)
    }

    pub fn system_cpu(&self) -> Result<CpuSnapshot, ProcError> {
        let path = self.proc_root.join("stat");
        let contents = fs::read_to_string(&path)
            .map_err(|source| ProcError::Unreadable { path, source })?;
        parse_cpu_line(contents.lines().next().unwrap_or(""))
    }

    pub fn memory(&self) -> Option<MemoryInfo> {
        let contents = fs::read_to_string(self.proc_root.join("meminfo")).ok()?;
        parse_meminfo(&contents)
    }

    /// Seconds since boot, the first field of the uptime file.
    pub fn uptime(&self) -> Option<f64> {
        let contents = fs::read_to_string(self.proc_root.join("uptime")).ok()?;
        parse_uptime(&contents)
    }

    /// `None` means the process vanished between enumeration and read, or
    /// its stat line was unparseable. Either way the pid is skipped for
    /// this tick.
    pub fn process_times(&self, pid: u32) -> Option<ProcessTimes> {
        let contents = fs::read_to_string(self.pid_file(pid, "stat")).ok()?;
        parse_process_stat_line(contents.lines().next()?)
    }

    pub fn process_status(&self, pid: u32) -> Option<ProcessStatus> {
        let contents = fs::read_to_string(self.pid_file(pid, "status")).ok()?;
        Some(parse_process_status(&contents))
    }

    /// Raw cmdline contents with NUL argument separators preserved; the
    /// display layer decides how to reformat them. Empty is a valid result
    /// (kernel threads).
    pub fn process_cmdline(&self, pid: u32) -> Option<String> {
        let bytes = fs::read(self.pid_file(pid, "cmdline")).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn user_name(&self, uid: u32) -> Option<String> {
        let contents = fs::read_to_string(&self.passwd_path).ok()?;
        parse_passwd(&contents, uid)
    }

    fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(name)
    }
}

pub fn parse_os_release(contents: &str) -> Option<String> {
    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
            let cleaned = value.trim().trim_matches('"').replace('_', " ");
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
        }
    }
    None
}

pub fn parse_kernel_version(contents: &str) -> Option<String> {
    contents
        .lines()
        .next()?
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
}

/// Parses the aggregate `cpu` line. Exactly ten integer counters must
/// follow the label; any other shape is a platform-incompatibility
/// sentinel and is rejected.
pub fn parse_cpu_line(line: &str) -> Result<CpuSnapshot, ProcError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("cpu") {
        return Err(ProcError::MalformedCpuLine { fields: 0 });
    }

    let mut values = [0u64; 10];
    let mut count = 0;
    for token in parts {
        let Ok(value) = token.parse::<u64>() else {
            return Err(ProcError::MalformedCpuLine { fields: count });
        };
        if count == values.len() {
            return Err(ProcError::MalformedCpuLine { fields: count + 1 });
        }
        values[count] = value;
        count += 1;
    }
    if count != values.len() {
        return Err(ProcError::MalformedCpuLine { fields: count });
    }

    Ok(CpuSnapshot {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values[7],
        guest: values[8],
        guest_nice: values[9],
    })
}

pub fn parse_meminfo(contents: &str) -> Option<MemoryInfo> {
    let mut lines = contents.lines();
    let total_kb = parse_kb_line(lines.next()?, "MemTotal:")?;
    let free_kb = parse_kb_line(lines.next()?, "MemFree:")?;
    Some(MemoryInfo { total_kb, free_kb })
}

fn parse_kb_line(line: &str, key: &str) -> Option<u64> {
    let rest = line.strip_prefix(key)?;
    rest.split_whitespace().next()?.parse().ok()
}

pub fn parse_uptime(contents: &str) -> Option<f64> {
    contents.split_whitespace().next()?.parse().ok()
}

/// Parses one per-process stat line. The comm field sits in parentheses
/// and may itself contain spaces and parentheses, so positional counting
/// resumes after the last `)`; the remainder starts at field 3.
pub fn parse_process_stat_line(line: &str) -> Option<ProcessTimes> {
    let close = line.rfind(')')?;
    let fields: Vec<&str> = line.get(close + 1..)?.split_whitespace().collect();
    // stat(5) numbers fields from 1.
    let take = |position: usize| -> Option<u64> { fields.get(position - 3)?.parse().ok() };

    Some(ProcessTimes {
        utime_ticks: take(14)?,
        stime_ticks: take(15)?,
        cutime_ticks: take(16)?,
        cstime_ticks: take(17)?,
        starttime_ticks: take(22)?,
    })
}

/// Extracts `Uid`, `VmRSS`, and `State` from the key/value status lines.
/// VmRSS (resident pages) is the field of record, not VmSize, which
/// measures reserved address space and overstates real usage. Kernel
/// threads have no Vm lines at all, so every field is optional.
pub fn parse_process_status(contents: &str) -> ProcessStatus {
    let mut status = ProcessStatus::default();
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("Uid:") {
            status.uid = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(rest) = line.strip_prefix("VmRSS:") {
            status.vm_rss_kb = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(rest) = line.strip_prefix("State:") {
            status.state = rest.trim_start().chars().next();
        }
    }
    status
}

pub fn parse_passwd(contents: &str, uid: u32) -> Option<String> {
    for line in contents.lines() {
        let mut fields = line.split(':');
        let (Some(name), Some(_), Some(entry_uid)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if entry_uid.parse() == Ok(uid) {
            return Some(name.to_string());
        }
    }
    None
}
