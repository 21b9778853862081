//! 路径解析与打开
//!
//! 模型中没有通用的目录树，只有三个挂载点：
//!
//! - `/dev/<name>`：devfs 节点 -> 设备号 -> cdev 绑定的驱动
//! - `/proc/<name>`：proc 条目
//! - `/sys/...`：sysfs 属性文件

use std::sync::Arc;

use uapi::fcntl::OpenFlags;
use vfs::{File, FsError};

use crate::Kernel;

impl Kernel {
    /// 按绝对路径打开文件
    pub fn open(&self, path: &str, flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
        if let Some(name) = path.strip_prefix("/dev/") {
            let dev = self.devfs().lookup(name)?;
            let driver = self.chrdev().lookup(dev).ok_or(FsError::NoDevice)?;
            return driver.open(dev, flags);
        }
        if let Some(name) = path.strip_prefix("/proc/") {
            return self.procfs().open(name, flags);
        }
        if let Some(rest) = path.strip_prefix("/sys/") {
            return self.sysfs().open(rest, flags);
        }
        Err(FsError::NotFound)
    }

    /// 路径是否存在
    pub fn exists(&self, path: &str) -> bool {
        if let Some(name) = path.strip_prefix("/dev/") {
            return self.devfs().lookup(name).is_ok();
        }
        if let Some(name) = path.strip_prefix("/proc/") {
            return self.procfs().lookup(name).is_some();
        }
        if let Some(rest) = path.strip_prefix("/sys/class/") {
            let mut parts = rest.split('/').filter(|p| !p.is_empty());
            return match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(class), None, _, _) => self.sysfs().class(class).is_some(),
                (Some(class), Some(device), None, _) => self
                    .sysfs()
                    .class(class)
                    .and_then(|c| c.device(device))
                    .is_some(),
                (Some(class), Some(device), Some(attr), None) => {
                    self.sysfs().lookup_attr(class, device, attr).is_ok()
                }
                _ => false,
            };
        }
        false
    }
}
