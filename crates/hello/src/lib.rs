//! # hello 寄存器设备驱动
//!
//! 驱动只维护一个 `i32` 寄存器，通过三个相互独立的访问面暴露给用户态：
//!
//! - 字符设备 `/dev/hello`：按本机字节序读写 4 字节
//! - sysfs 属性 `/sys/class/hello/hello/val`：十进制文本
//! - proc 条目 `/proc/hello`：十进制文本
//!
//! 三个访问面共享同一个 [`RegisterStore`]，所有读写都在它的睡眠锁内完成。
//! [`HelloModule`] 负责按固定顺序注册各访问面，并在失败或卸载时逆序撤销。
//!
//! 驱动不直接依赖内核的具体实现，所有注册动作都经由 [`DriverOps`] 完成。

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod ops;
pub mod store;
pub mod surface;

pub use config::HelloConfig;
pub use error::HelloError;
pub use lifecycle::{HelloModule, LifecycleState};
pub use ops::DriverOps;
pub use store::{RegisterGuard, RegisterStore};
pub use surface::{HelloCharDriver, HelloFile, HelloProcOps, ValAttribute};
