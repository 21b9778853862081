//! 驱动接入

mod ops_impl;

pub use ops_impl::KernelDriverOps;

use std::sync::Arc;

use hello::DriverOps;

use crate::Kernel;

impl Kernel {
    /// 为驱动提供注册服务
    pub fn driver_ops(self: &Arc<Self>) -> Arc<dyn DriverOps> {
        Arc::new(KernelDriverOps::new(self.clone()))
    }
}
