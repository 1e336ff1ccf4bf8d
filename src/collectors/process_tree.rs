use std::collections::HashMap;
use std::hash::Hash;

use crate::collectors::bytes_to_mb;
use crate::utils::errors::MonitoringError;
use log::debug;
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};

/// Summed usage of a process and all of its descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeUsage {
    pub cpu_percent: f64,
    pub memory_mb: f64,
    pub processes: usize,
}

/// CPU and resident memory of a process tree rooted at one pid.
pub struct ProcessTree {
    root: Pid,
    system: System,
}

impl ProcessTree {
    /// The process table is refreshed once here so that the first
    /// `usage()` call already reports CPU since construction.
    pub fn new(pid: u32) -> Self {
        let mut tree = Self {
            root: Pid::from_u32(pid),
            system: System::new(),
        };
        tree.refresh();
        tree
    }

    fn refresh(&mut self) {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .without_tasks(),
        );
    }

    pub fn usage(&mut self) -> Result<TreeUsage, MonitoringError> {
        self.refresh();

        let root_alive = self
            .system
            .process(self.root)
            .is_some_and(|process| process.status() != ProcessStatus::Zombie);
        if !root_alive {
            return Err(MonitoringError::ProcessVanished(self.root.as_u32()));
        }

        let pids = collect_descendants(
            self.root,
            self.system
                .processes()
                .iter()
                .map(|(pid, process)| (*pid, process.parent())),
        );

        let mut usage = TreeUsage::default();
        let mut memory_bytes = 0u64;
        for pid in &pids {
            // Children may exit between the refresh and here; exited
            // children no longer use anything.
            let Some(process) = self.system.process(*pid) else {
                continue;
            };
            if process.status() == ProcessStatus::Zombie {
                continue;
            }
            usage.cpu_percent += process.cpu_usage() as f64;
            memory_bytes += process.memory();
            usage.processes += 1;
        }
        usage.memory_mb = bytes_to_mb(memory_bytes);

        debug!(
            "Process tree {}: {} processes, {:.1}% CPU, {:.1} MB",
            self.root, usage.processes, usage.cpu_percent, usage.memory_mb
        );
        Ok(usage)
    }
}

/// Returns `root` followed by all of its recursive children, breadth first.
pub fn collect_descendants<P, I>(root: P, parents: I) -> Vec<P>
where
    P: Copy + Eq + Hash,
    I: IntoIterator<Item = (P, Option<P>)>,
{
    let mut children: HashMap<P, Vec<P>> = HashMap::new();
    for (pid, parent) in parents {
        if let Some(parent) = parent {
            // A process listed as its own parent (pid 0 on some platforms) would loop forever
            if parent != pid {
                children.entry(parent).or_default().push(pid);
            }
        }
    }

    let mut tree = vec![root];
    let mut next = 0;
    while next < tree.len() {
        if let Some(kids) = children.remove(&tree[next]) {
            tree.extend(kids);
        }
        next += 1;
    }
    tree
}
