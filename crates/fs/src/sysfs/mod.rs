//! Sysfs 虚拟文件系统
//!
//! 提供与 Linux 兼容的 `/sys/class/<class>/<device>/<attr>` 三层结构，
//! 驱动通过 [`DeviceAttribute`] 提供属性文件的 show/store 回调。

mod attr;
mod sysfs;

pub use attr::{AttrFile, DeviceAttribute};
pub use sysfs::{Class, Device, SysFS};

