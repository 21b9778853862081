//! ProcFS - 驱动可扩展的 /proc 条目
//!
//! 驱动通过 [`ProcFS::create_entry`] 注册一个 [`ProcOps`]，用户态打开 `/proc/<name>`
//! 得到 [`ProcFile`]，其读写转发给驱动回调。

pub mod proc;

pub use proc::{ProcEntry, ProcFS, ProcFile, ProcOps};
