//! 寄存器的三个访问面
//!
//! 每个访问面只负责自身的编码方式，读写都以“获取锁 -> 编解码 -> 释放锁”的形式
//! 落到共享的 [`crate::RegisterStore`] 上。

mod attr;
mod chrdev;
mod proc;
pub mod text;

pub use attr::ValAttribute;
pub use chrdev::{HelloCharDriver, HelloFile};
pub use proc::HelloProcOps;
