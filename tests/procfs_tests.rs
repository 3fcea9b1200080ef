use std::fs;
use std::path::PathBuf;

use proctop::system::procfs::{ProcError, ProcFs};

/// Fixture procfs tree in a unique temp directory, removed on drop.
struct Fixture {
    root: PathBuf,
}

impl Fixture {
    fn new(label: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "proctop-procfs-{label}-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::create_dir_all(root.join("proc")).unwrap();
        Fixture { root }
    }

    fn procfs(&self) -> ProcFs {
        ProcFs::with_roots(
            self.root.join("proc"),
            self.root.join("os-release"),
            self.root.join("passwd"),
        )
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.root.join(rel)).unwrap();
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn process_ids_are_numeric_entries_sorted() {
    let fx = Fixture::new("pids");
    fx.mkdir("proc/100");
    fx.mkdir("proc/3");
    fx.mkdir("proc/12");
    fx.mkdir("proc/sys");
    fx.write("proc/uptime", "1.0 1.0\n");
    fx.write("proc/stat", "cpu 1 0 0 1 0 0 0 0 0 0\n");

    let pids = fx.procfs().process_ids().unwrap();
    assert_eq!(pids, [3, 12, 100]);
}

#[test]
fn missing_proc_root_is_fatal() {
    let procfs = ProcFs::with_roots("/nonexistent/proc", "/nonexistent/r", "/nonexistent/p");
    let err = procfs.process_ids().unwrap_err();
    assert!(matches!(err, ProcError::ProcRootUnreadable { .. }));
    assert!(err.is_fatal());
}

#[test]
fn system_cpu_reads_the_aggregate_line() {
    let fx = Fixture::new("cpu");
    fx.write(
        "proc/stat",
        "cpu  4705 356 584 3699 23 13 456 0 0 0\n\
         cpu0 2352 178 292 1849 11 6 228 0 0 0\n\
         intr 114930548 113199788 3 0 5 263 0 4\n",
    );

    let snap = fx.procfs().system_cpu().unwrap();
    assert_eq!(snap.user, 4705);
    assert_eq!(snap.idle, 3699);
    assert_eq!(snap.active_jiffies(), 4705 + 356 + 584 + 13 + 456);
}

#[test]
fn missing_stat_file_is_unreadable_not_fatal() {
    let fx = Fixture::new("nostat");
    let err = fx.procfs().system_cpu().unwrap_err();
    assert!(matches!(err, ProcError::Unreadable { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn truncated_cpu_line_reports_field_count() {
    let fx = Fixture::new("badcpu");
    fx.write("proc/stat", "cpu 1 2 3 4 5\n");
    let err = fx.procfs().system_cpu().unwrap_err();
    assert!(matches!(err, ProcError::MalformedCpuLine { fields: 5 }));
    assert!(!err.is_fatal());
}

#[test]
fn memory_and_uptime_read_from_fixture() {
    let fx = Fixture::new("mem");
    fx.write(
        "proc/meminfo",
        "MemTotal:       16316412 kB\nMemFree:         8255712 kB\nMemAvailable: 1 kB\n",
    );
    fx.write("proc/uptime", "35435.72 129371.14\n");

    let procfs = fx.procfs();
    let mem = procfs.memory().unwrap();
    assert_eq!(mem.total_kb, 16316412);
    assert_eq!(mem.used_kb(), 16316412 - 8255712);
    assert_eq!(procfs.uptime(), Some(35435.72));
}

#[test]
fn missing_optional_files_read_none() {
    let fx = Fixture::new("none");
    let procfs = fx.procfs();
    assert_eq!(procfs.memory(), None);
    assert_eq!(procfs.uptime(), None);
    assert_eq!(procfs.operating_system(), None);
    assert_eq!(procfs.kernel_version(), None);
    assert_eq!(procfs.user_name(0), None);
}

#[test]
fn per_process_files_read_through() {
    let fx = Fixture::new("pid");
    fx.write(
        "proc/42/stat",
        "42 (worker (v2)) R 1 42 42 0 -1 4194304 100 0 0 0 \
         50 25 10 5 20 0 1 0 2000 10000000 150 18446744073709551615\n",
    );
    fx.write(
        "proc/42/status",
        "Name:\tworker\nState:\tR (running)\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t    5288 kB\n",
    );
    fx.write("proc/42/cmdline", "/usr/bin/worker\0--threads\04\0");

    let procfs = fx.procfs();
    let times = procfs.process_times(42).unwrap();
    assert_eq!(times.utime_ticks, 50);
    assert_eq!(times.starttime_ticks, 2000);

    let status = procfs.process_status(42).unwrap();
    assert_eq!(status.uid, Some(1000));
    assert_eq!(status.vm_rss_kb, Some(5288));
    assert_eq!(status.state, Some('R'));

    // NUL separators come through untouched.
    let cmdline = procfs.process_cmdline(42).unwrap();
    assert_eq!(cmdline, "/usr/bin/worker\0--threads\04\0");
}

#[test]
fn vanished_pid_reads_none() {
    let fx = Fixture::new("gone");
    let procfs = fx.procfs();
    assert_eq!(procfs.process_times(999), None);
    assert_eq!(procfs.process_status(999), None);
    assert_eq!(procfs.process_cmdline(999), None);
}

#[test]
fn release_and_version_files() {
    let fx = Fixture::new("release");
    fx.write(
        "os-release",
        "NAME=\"Debian GNU/Linux\"\nPRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n",
    );
    fx.write(
        "proc/version",
        "Linux version 6.1.0-25-amd64 (debian-kernel@lists.debian.org) (gcc-12)\n",
    );

    let procfs = fx.procfs();
    assert_eq!(
        procfs.operating_system().as_deref(),
        Some("Debian GNU/Linux 12 (bookworm)")
    );
    assert_eq!(procfs.kernel_version().as_deref(), Some("6.1.0-25-amd64"));
}

#[test]
fn user_name_scans_the_password_file() {
    let fx = Fixture::new("users");
    fx.write(
        "passwd",
        "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000:Alice:/home/alice:/bin/zsh\n",
    );

    let procfs = fx.procfs();
    assert_eq!(procfs.user_name(1000).as_deref(), Some("alice"));
    assert_eq!(procfs.user_name(7777), None);
}
