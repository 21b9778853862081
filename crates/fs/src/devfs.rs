//! /dev 节点表
//!
//! 仅记录“节点名 -> 设备号”，打开时由调用方到字符设备注册表中查找驱动。

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use sync::SpinLock;
use vfs::FsError;

use crate::check_name;

/// devfs 节点表
#[derive(Debug, Default)]
pub struct DevFs {
    nodes: SpinLock<BTreeMap<String, u64>>,
}

impl DevFs {
    /// 创建空的节点表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建字符设备节点 `/dev/<name>`
    pub fn mknod(&self, name: &str, dev: u64) -> Result<(), FsError> {
        check_name(name)?;
        let mut nodes = self.nodes.lock();
        if nodes.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        nodes.insert(name.to_string(), dev);
        log::debug!("devfs: mknod /dev/{} -> {:#x}", name, dev);
        Ok(())
    }

    /// 删除仍指向 `dev` 的节点 `name`，节点不存在或已改指别的设备时返回 `false`
    pub fn unlink(&self, name: &str, dev: u64) -> bool {
        let mut nodes = self.nodes.lock();
        if nodes.get(name) != Some(&dev) {
            return false;
        }
        nodes.remove(name);
        log::debug!("devfs: unlink /dev/{}", name);
        true
    }

    /// 查找节点对应的设备号
    pub fn lookup(&self, name: &str) -> Result<u64, FsError> {
        self.nodes.lock().get(name).copied().ok_or(FsError::NotFound)
    }

    /// 列出全部节点
    pub fn list(&self) -> Vec<(String, u64)> {
        self.nodes
            .lock()
            .iter()
            .map(|(name, dev)| (name.clone(), *dev))
            .collect()
    }
}
