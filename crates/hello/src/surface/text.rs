//! 文本访问面（sysfs 属性与 proc 条目）共用的编解码

use alloc::format;

/// 按 `"%d\n"` 格式化到 `page`，超出部分截断，返回写入字节数
pub fn format_value(val: i32, page: &mut [u8]) -> usize {
    let text = format!("{}\n", val);
    let n = text.len().min(page.len());
    page[..n].copy_from_slice(&text.as_bytes()[..n]);
    n
}

/// 尽力解析十进制整数（`simple_strtol(buf, NULL, 10)` 语义）
///
/// 可选的单个前导 `-`，随后读取到第一个非数字字节为止。不跳过空白，也不接受 `+`，
/// 这类输入得到 0。累加在 64 位上回绕，结果截断为 `i32`。
pub fn parse_value(buf: &[u8]) -> i32 {
    let (negative, digits) = match buf.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, buf),
    };

    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u64, |acc, &b| acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0')));

    let val = if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    val as i32
}
