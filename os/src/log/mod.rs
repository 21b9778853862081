//! 内核日志
//!
//! 各 crate 通过 `log` 门面打日志，这里提供输出到 stderr 的带颜色实现。

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// stderr 日志输出
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => 31, // Red
            Level::Warn => 93,  // BrightYellow
            Level::Info => 37,  // White
            Level::Debug => 32, // Green
            Level::Trace => 90, // BrightBlack
        };
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "\u{1B}[{}m[{:>5}] {}\u{1B}[0m",
            color,
            record.level(),
            record.args(),
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: Logger = Logger;

/// 以默认级别安装日志，可重复调用
pub fn init() {
    init_with_level(crate::KernelConfig::default().log_level);
}

/// 以指定级别安装日志
///
/// 只有第一次调用会安装 logger，之后的调用只调整级别。
pub fn init_with_level(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
