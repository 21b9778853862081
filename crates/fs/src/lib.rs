//! # 伪文件系统模块 (FS)
//!
//! 本模块提供驱动向用户态暴露自身所需的三种伪文件系统：
//!
//! - **[devfs](devfs)**: 设备节点名到设备号的映射
//! - **[sysfs](sysfs)**: class/device/attribute 三层设备树
//! - **[procfs](proc)**: 由驱动回调提供内容的 proc 条目
//!
//! 三者打开后都返回 `Arc<dyn vfs::File>`，由进程的文件描述符表持有。

#![no_std]
#![doc = "伪文件系统实现"]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod devfs;
pub mod proc;
pub mod sysfs;

pub use devfs::DevFs;
pub use proc::{ProcEntry, ProcFS, ProcFile, ProcOps};
pub use sysfs::{AttrFile, Class, Device, DeviceAttribute, SysFS};

use vfs::FsError;

/// 校验单个目录项名字：非空且不含 `/`
pub(crate) fn check_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name.contains('/') {
        return Err(FsError::InvalidArgument);
    }
    if name.len() > 255 {
        return Err(FsError::NameTooLong);
    }
    Ok(())
}
