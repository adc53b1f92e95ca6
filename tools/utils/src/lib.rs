//! 命令行工具依赖的通用组件.

use std::io;

pub mod loader;

const SEP: &str = "--------------------------------------------------------";

/// 向 `w` 写入简单分隔线.
#[inline]
pub fn sep_to<W: io::Write>(mut w: W) -> io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 解析形如 `ff230f` 或 `#FF230F` 的 RGB 十六进制颜色.
pub fn parse_rgb(hex: &str) -> Result<[u8; 3], String> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(format!("'{hex}' is not a 6-digit hex colour"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[2 * i..2 * i + 2], 16)
            .map_err(|e| format!("'{hex}' is not a 6-digit hex colour: {e}"))
    };
    Ok([channel(0)?, channel(1)?, channel(2)?])
}
