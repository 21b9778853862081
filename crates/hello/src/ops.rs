//! 驱动所需的内核服务接口
//!
//! 驱动只通过 [`DriverOps`] 向内核注册自己，具体实现由内核在加载模块时注入。
//! 所有 `*_remove` / `*_destroy` / `*_del` 方法对不存在的目标静默返回。
//! 节点、属性与 proc 条目的删除带上注册时的身份（设备号或回调对象），
//! 同名条目若已换了主人则保持不动。

use alloc::sync::Arc;
use fs::{DeviceAttribute, ProcOps};
use vfs::{CharDriver, FsError};

/// 内核为驱动提供的注册服务
pub trait DriverOps: Send + Sync {
    /// 动态分配设备号区间（`alloc_chrdev_region`），返回起始设备号
    fn alloc_chrdev_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u64, FsError>;

    /// 释放设备号区间（`unregister_chrdev_region`）
    fn unregister_chrdev_region(&self, base: u64, count: u32);

    /// 向内核堆申请 `size` 字节（`kmalloc` 的记账部分）
    fn reserve_memory(&self, size: usize) -> Result<(), FsError>;

    /// 归还 [`DriverOps::reserve_memory`] 申请的字节
    fn release_memory(&self, size: usize);

    /// 把设备号区间绑定到驱动（`cdev_add`）
    fn cdev_add(&self, base: u64, count: u32, driver: Arc<dyn CharDriver>) -> Result<(), FsError>;

    /// 解除绑定（`cdev_del`）
    fn cdev_del(&self, base: u64);

    /// 创建设备类（`class_create`）
    fn class_create(&self, name: &str) -> Result<(), FsError>;

    /// 销毁设备类（`class_destroy`）
    fn class_destroy(&self, name: &str);

    /// 在类下创建设备，同时创建 `/dev/<name>` 节点（`device_create`）
    fn device_create(&self, class: &str, devt: u64, name: &str) -> Result<(), FsError>;

    /// 销毁设备及其 `/dev/<name>` 节点（`device_destroy`），节点仅在仍指向 `devt` 时删除
    fn device_destroy(&self, class: &str, devt: u64, name: &str);

    /// 为设备挂载属性文件（`device_create_file`）
    fn device_create_file(
        &self,
        class: &str,
        device: &str,
        attr: Arc<dyn DeviceAttribute>,
    ) -> Result<(), FsError>;

    /// 移除属性文件（`device_remove_file`），只删除 `attr` 这个对象本身
    fn device_remove_file(&self, class: &str, device: &str, attr: &Arc<dyn DeviceAttribute>);

    /// 创建 `/proc/<name>`
    fn proc_create(&self, name: &str, mode: u16, ops: Arc<dyn ProcOps>) -> Result<(), FsError>;

    /// 删除 `/proc/<name>`，条目的回调必须是 `ops`
    fn proc_remove(&self, name: &str, ops: &Arc<dyn ProcOps>);
}
