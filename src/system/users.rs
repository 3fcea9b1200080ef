use std::collections::HashMap;

use super::procfs::ProcFs;

/// Caches uid lookups across refresh cycles. Misses are cached too, so a
/// uid with no passwd entry is not re-scanned every tick.
#[derive(Debug, Default)]
pub struct UserTable {
    cache: HashMap<u32, Option<String>>,
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, procfs: &ProcFs, uid: u32) -> Option<String> {
        self.cache
            .entry(uid)
            .or_insert_with(|| procfs.user_name(uid))
            .clone()
    }

    #[cfg(test)]
    fn cached(&self, uid: u32) -> Option<&Option<String>> {
        self.cache.get(&uid)
    }
}
