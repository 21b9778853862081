//! 内核虚拟文件系统层
//!
//! 此 crate 提供设备驱动与用户态之间的会话层抽象，包括：
//!
//! - [`File`] trait - 打开文件的操作接口
//! - [`CharDriver`] trait - 字符设备驱动接口
//! - [`ChrdevTable`] - 字符设备号区间与 cdev 绑定表
//! - [`FDTable`] - 文件描述符表
//! - [`dev`] - 设备号编码

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod dev;
pub mod error;
pub mod ops;

mod chrdev;
mod fd_table;
mod file;

// Re-export ops
pub use ops::CharDriver;

// Re-export error
pub use error::FsError;

// Re-export dev
pub use dev::{major, makedev, minor};

// Re-export file
pub use file::File;

// Re-export fd_table
pub use fd_table::FDTable;

// Re-export chrdev
pub use chrdev::{CharDevRegion, ChrdevTable, chrdev_major};

// Re-export uapi types for convenience
pub use uapi::fcntl::OpenFlags;
