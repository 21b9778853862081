//! # hello 硬件抽象层
//!
//! 用户态的薄封装：打开 `/dev/hello`，把寄存器读写包装成 [`HelloDevice::set_val`]
//! 与 [`HelloDevice::get_val`]。系统调用通过 [`DeviceIo`] 注入，便于在宿主上测试。

mod device;
mod error;
mod io;

pub use device::{HelloDevice, HelloModule, ModuleInfo};
pub use error::HalError;
pub use io::DeviceIo;

/// 硬件模块 id
pub const HELLO_HARDWARE_MODULE_ID: &str = "hello";
