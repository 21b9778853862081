//! 内核对象

mod heap;
mod process;

pub use heap::KernelHeap;
pub use process::Process;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fs::{DevFs, ProcFS, SysFS};
use vfs::ChrdevTable;

use crate::KernelConfig;

/// 内核：设备注册表、伪文件系统与内核堆
#[derive(Debug)]
pub struct Kernel {
    config: KernelConfig,
    chrdev: ChrdevTable,
    devfs: DevFs,
    sysfs: SysFS,
    procfs: ProcFS,
    heap: KernelHeap,
    next_pid: AtomicUsize,
}

impl Kernel {
    /// 启动一个空内核
    pub fn new(config: KernelConfig) -> Arc<Self> {
        log::info!(
            "kernel: dynamic majors {:?}, heap limit {} bytes, max fds {}",
            config.dynamic_majors,
            config.heap_limit,
            config.max_fds
        );
        Arc::new(Self {
            chrdev: ChrdevTable::with_dynamic_majors(config.dynamic_majors.clone()),
            devfs: DevFs::new(),
            sysfs: SysFS::new(),
            procfs: ProcFS::new(),
            heap: KernelHeap::new(config.heap_limit),
            next_pid: AtomicUsize::new(1),
            config,
        })
    }

    /// 启动参数
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// 字符设备注册表
    pub fn chrdev(&self) -> &ChrdevTable {
        &self.chrdev
    }

    /// `/dev`
    pub fn devfs(&self) -> &DevFs {
        &self.devfs
    }

    /// `/sys`
    pub fn sysfs(&self) -> &SysFS {
        &self.sysfs
    }

    /// `/proc`
    pub fn procfs(&self) -> &ProcFS {
        &self.procfs
    }

    /// 内核堆
    pub fn heap(&self) -> &KernelHeap {
        &self.heap
    }

    /// 创建一个用户进程
    pub fn spawn_process(self: &Arc<Self>) -> Process {
        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        Process::new(pid, self.clone())
    }
}
