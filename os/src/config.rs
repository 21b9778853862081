//! 内核配置

use core::ops::RangeInclusive;

use ::log::LevelFilter;
use vfs::chrdev_major;

/// 默认每进程最大文件描述符数
pub const DEFAULT_MAX_FDS: usize = 4096;

/// 默认内核堆上限（字节）
pub const DEFAULT_HEAP_LIMIT: usize = 16 * 1024 * 1024;

/// 内核启动参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// 字符设备动态 major 区间
    pub dynamic_majors: RangeInclusive<u32>,
    /// 内核堆上限（字节），驱动的分配都记在这里
    pub heap_limit: usize,
    /// 每进程最大文件描述符数
    pub max_fds: usize,
    /// 日志级别
    pub log_level: LevelFilter,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            dynamic_majors: chrdev_major::DYNAMIC_FIRST..=chrdev_major::DYNAMIC_LAST,
            heap_limit: DEFAULT_HEAP_LIMIT,
            max_fds: DEFAULT_MAX_FDS,
            log_level: if cfg!(debug_assertions) {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        }
    }
}
