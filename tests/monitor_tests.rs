use std::fs;
use std::path::PathBuf;

use proctop::system::monitor::Monitor;
use proctop::system::procfs::ProcFs;

/// Full fixture tree: system files plus three processes. Pid 30 burns the
/// most CPU, pid 20 looks like a kernel thread, pid 10 is an ordinary
/// sleeping process.
struct Fixture {
    root: PathBuf,
}

impl Fixture {
    fn new(label: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "proctop-monitor-{label}-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::create_dir_all(root.join("proc")).unwrap();
        Fixture { root }
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn monitor(&self) -> Monitor {
        let procfs = ProcFs::with_roots(
            self.root.join("proc"),
            self.root.join("os-release"),
            self.root.join("passwd"),
        );
        Monitor::with_procfs(procfs, 100)
    }

    fn populate(&self) {
        self.write("proc/stat", "cpu 100 0 0 300 0 0 0 0 0 0\n");
        self.write("proc/meminfo", "MemTotal: 8000 kB\nMemFree: 2000 kB\n");
        self.write("proc/uptime", "200.0 800.0\n");
        self.write(
            "proc/version",
            "Linux version 6.8.0-45-generic (build@host) (gcc 13)\n",
        );
        self.write("os-release", "PRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n");
        self.write(
            "passwd",
            "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/sh\n",
        );

        // pid 10: sleeping, 1 active second over a 100 s lifetime.
        self.write(
            "proc/10/stat",
            "10 (bash) S 1 10 10 0 -1 4194304 100 0 0 0 \
             60 40 0 0 20 0 1 0 10000 10000000 150 18446744073709551615\n",
        );
        self.write(
            "proc/10/status",
            "Name:\tbash\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t5120 kB\n",
        );
        self.write("proc/10/cmdline", "/bin/bash\0");

        // pid 20: kernel thread, no cmdline bytes, no Vm lines.
        self.write(
            "proc/20/stat",
            "20 (kworker/0:1) I 2 0 0 0 -1 69238880 0 0 0 0 \
             0 0 0 0 20 0 1 0 0 0 0 18446744073709551615\n",
        );
        self.write(
            "proc/20/status",
            "Name:\tkworker/0:1\nState:\tI (idle)\nUid:\t0\t0\t0\t0\n",
        );
        self.write("proc/20/cmdline", "");

        // pid 30: running hot, 50 active seconds over a 100 s lifetime.
        self.write(
            "proc/30/stat",
            "30 (cruncher) R 1 30 30 0 -1 4194304 100 0 0 0 \
             3000 2000 0 0 20 0 1 0 10000 50000000 2560 18446744073709551615\n",
        );
        self.write(
            "proc/30/status",
            "Name:\tcruncher\nState:\tR (running)\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t204800 kB\n",
        );
        self.write("proc/30/cmdline", "/usr/bin/cruncher\0--jobs\08\0");
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn refresh_assembles_a_full_snapshot() {
    let fx = Fixture::new("full");
    fx.populate();
    let mut monitor = fx.monitor();

    assert_eq!(
        monitor.operating_system(),
        Some("Ubuntu 22.04.4 LTS")
    );
    assert_eq!(monitor.kernel_version(), Some("6.8.0-45-generic"));

    let snapshot = monitor.refresh().unwrap();

    // First sample measures against zero: 100 active / 400 total.
    assert!((snapshot.cpu_utilization - 0.25).abs() < 1e-9);
    assert!((snapshot.memory_utilization - 0.75).abs() < 1e-9);
    assert_eq!(snapshot.memory_total_kb, 8000);
    assert_eq!(snapshot.memory_used_kb, 6000);
    assert_eq!(snapshot.uptime_seconds, 200);
    assert_eq!(snapshot.total_processes, 3);
    assert_eq!(snapshot.running_processes, 1);

    // Descending CPU: cruncher (0.5), bash (0.01), kworker (0.0).
    let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, [30, 10, 20]);

    let cruncher = &snapshot.processes[0];
    assert!((cruncher.cpu_utilization - 0.5).abs() < 1e-9);
    assert_eq!(cruncher.user.as_deref(), Some("alice"));
    assert_eq!(cruncher.state, Some('R'));
    assert_eq!(cruncher.ram_megabytes, 200);
    assert_eq!(cruncher.uptime_seconds, 100);
    assert_eq!(cruncher.command, "/usr/bin/cruncher\0--jobs\08\0");

    let kworker = &snapshot.processes[2];
    assert_eq!(kworker.command, "");
    assert_eq!(kworker.ram_megabytes, 0);
    assert_eq!(kworker.uptime_seconds, 200);
}

#[test]
fn second_refresh_measures_the_interval() {
    let fx = Fixture::new("delta");
    fx.populate();
    let mut monitor = fx.monitor();

    monitor.refresh().unwrap();

    // 50 active and 50 idle jiffies elapse between samples.
    fx.write("proc/stat", "cpu 150 0 0 350 0 0 0 0 0 0\n");
    let snapshot = monitor.refresh().unwrap();
    assert!((snapshot.cpu_utilization - 0.5).abs() < 1e-9);
}

#[test]
fn identical_cpu_readings_report_zero() {
    let fx = Fixture::new("idle");
    fx.populate();
    let mut monitor = fx.monitor();

    monitor.refresh().unwrap();
    let snapshot = monitor.refresh().unwrap();
    assert_eq!(snapshot.cpu_utilization, 0.0);
}

#[test]
fn vanished_pid_is_counted_but_not_listed() {
    let fx = Fixture::new("vanish");
    fx.populate();
    // Directory exists at enumeration time but its stat file is gone.
    fs::create_dir_all(fx.root.join("proc/40")).unwrap();

    let mut monitor = fx.monitor();
    let snapshot = monitor.refresh().unwrap();

    assert_eq!(snapshot.total_processes, 4);
    assert_eq!(snapshot.processes.len(), 3);
    assert!(snapshot.processes.iter().all(|p| p.pid != 40));
}

#[test]
fn unreadable_system_files_degrade_to_defaults() {
    let fx = Fixture::new("degrade");
    fx.populate();
    fs::remove_file(fx.root.join("proc/stat")).unwrap();
    fs::remove_file(fx.root.join("proc/meminfo")).unwrap();
    fs::remove_file(fx.root.join("proc/uptime")).unwrap();

    let mut monitor = fx.monitor();
    let snapshot = monitor.refresh().unwrap();

    assert_eq!(snapshot.cpu_utilization, 0.0);
    assert_eq!(snapshot.memory_utilization, 0.0);
    assert_eq!(snapshot.uptime_seconds, 0);
    // Processes still sampled; with zero uptime their lifetimes clamp.
    assert_eq!(snapshot.total_processes, 3);
}

#[test]
fn missing_process_table_aborts_the_refresh() {
    let fx = Fixture::new("fatal");
    fx.populate();
    fs::remove_dir_all(fx.root.join("proc")).unwrap();

    let mut monitor = fx.monitor();
    let err = monitor.refresh().unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn unresolvable_uid_leaves_user_unset() {
    let fx = Fixture::new("nouser");
    fx.populate();
    fx.write("passwd", "root:x:0:0:root:/root:/bin/bash\n");

    let mut monitor = fx.monitor();
    let snapshot = monitor.refresh().unwrap();
    let bash = snapshot.processes.iter().find(|p| p.pid == 10).unwrap();
    assert_eq!(bash.user, None);
    assert_eq!(bash.uid, Some(1000));
}
