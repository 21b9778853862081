//! 宿主机上的内核模型
//!
//! 把 `vfs` / `fs` 提供的注册表组装成一个 [`Kernel`]，为 hello 驱动实现
//! [`hello::DriverOps`]，并以 [`Process`] 的形式为用户态 HAL 提供系统调用。
//! “内核线程”即普通的宿主线程，多个线程可以同时通过各自的 [`Process`] 访问设备。

pub mod config;
pub mod device;
pub mod kernel;
pub mod log;
pub mod vfs;

pub use config::KernelConfig;
pub use kernel::{Kernel, KernelHeap, Process};
