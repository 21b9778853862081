//! DriverOps trait 实现
//!
//! 此模块为 hello crate 的 [`DriverOps`] 提供 os crate 的具体实现。

use std::sync::Arc;

use fs::{DeviceAttribute, ProcOps};
use hello::DriverOps;
use vfs::{CharDriver, FsError};

use crate::Kernel;

/// 驱动注册服务实现
#[derive(Debug)]
pub struct KernelDriverOps {
    kernel: Arc<Kernel>,
}

impl KernelDriverOps {
    /// 绑定到内核
    pub fn new(kernel: Arc<Kernel>) -> Self {
        Self { kernel }
    }
}

impl DriverOps for KernelDriverOps {
    fn alloc_chrdev_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u64, FsError> {
        self.kernel.chrdev().alloc_region(first_minor, count, name)
    }

    fn unregister_chrdev_region(&self, base: u64, count: u32) {
        if !self.kernel.chrdev().unregister_region(base, count) {
            log::debug!("chrdev: region {:#x} (+{}) already released", base, count);
        }
    }

    fn reserve_memory(&self, size: usize) -> Result<(), FsError> {
        self.kernel.heap().reserve(size)
    }

    fn release_memory(&self, size: usize) {
        self.kernel.heap().release(size);
    }

    fn cdev_add(&self, base: u64, count: u32, driver: Arc<dyn CharDriver>) -> Result<(), FsError> {
        self.kernel.chrdev().cdev_add(base, count, driver)
    }

    fn cdev_del(&self, base: u64) {
        self.kernel.chrdev().cdev_del(base);
    }

    fn class_create(&self, name: &str) -> Result<(), FsError> {
        self.kernel.sysfs().class_create(name).map(|_| ())
    }

    fn class_destroy(&self, name: &str) {
        self.kernel.sysfs().class_destroy(name);
    }

    fn device_create(&self, class: &str, devt: u64, name: &str) -> Result<(), FsError> {
        let class = self.kernel.sysfs().class(class).ok_or(FsError::NotFound)?;
        class.device_create(devt, name)?;
        if let Err(e) = self.kernel.devfs().mknod(name, devt) {
            class.device_destroy(devt);
            return Err(e);
        }
        Ok(())
    }

    fn device_destroy(&self, class: &str, devt: u64, name: &str) {
        if let Some(class) = self.kernel.sysfs().class(class) {
            class.device_destroy(devt);
        }
        if !self.kernel.devfs().unlink(name, devt) {
            log::warn!("devfs: /dev/{} no longer refers to {:#x}, left in place", name, devt);
        }
    }

    fn device_create_file(
        &self,
        class: &str,
        device: &str,
        attr: Arc<dyn DeviceAttribute>,
    ) -> Result<(), FsError> {
        self.kernel
            .sysfs()
            .class(class)
            .and_then(|c| c.device(device))
            .ok_or(FsError::NotFound)?
            .create_file(attr)
    }

    fn device_remove_file(&self, class: &str, device: &str, attr: &Arc<dyn DeviceAttribute>) {
        if let Some(device) = self.kernel.sysfs().class(class).and_then(|c| c.device(device)) {
            device.remove_file(attr);
        }
    }

    fn proc_create(&self, name: &str, mode: u16, ops: Arc<dyn ProcOps>) -> Result<(), FsError> {
        self.kernel.procfs().create_entry(name, mode, ops)
    }

    fn proc_remove(&self, name: &str, ops: &Arc<dyn ProcOps>) {
        if !self.kernel.procfs().remove_entry(name, ops) {
            log::warn!("procfs: /proc/{} is not ours any more, left in place", name);
        }
    }
}
