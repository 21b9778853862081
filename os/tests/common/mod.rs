//! 集成测试共用的路径常量与启动函数

use std::sync::Arc;

use hello::{HelloConfig, HelloModule};
use os::{Kernel, KernelConfig};

pub const DEV: &str = "/dev/hello";
pub const ATTR: &str = "/sys/class/hello/hello/val";
pub const PROC: &str = "/proc/hello";

/// 启动默认内核并加载 hello 模块
pub fn boot() -> (Arc<Kernel>, HelloModule) {
    os::log::init();
    let kernel = Kernel::new(KernelConfig::default());
    let module = HelloModule::init(kernel.driver_ops(), HelloConfig::default()).unwrap();
    (kernel, module)
}
