//! 对 `vol-berry` 读取接口的更一层封装, 以及缓存目录的确定.

use std::env;
use std::path::{Path, PathBuf};
use vol_berry::{FigureResult, GrayRaster, Volume};

/// 指定缓存目录的环境变量.
pub const CACHE_DIR_ENV: &str = "VOL_BERRY_CACHE_DIR";

/// 获取缓存目录.
///
/// 1. 若 `explicit` 非空, 则返回它;
/// 2. 若环境变量 `$VOL_BERRY_CACHE_DIR` 非空, 则返回其值;
/// 3. 否则, 返回用户缓存目录下的 `vol-berry` (例如 `$HOME/.cache/vol-berry`).
///
/// 三者都无法确定时返回 `None`.
pub fn cache_dir_from_env_or_home(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(d) = explicit {
        return Some(d.to_owned());
    }
    match env::var(CACHE_DIR_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => dirs::cache_dir().map(|d| d.join("vol-berry")),
    }
}

/// 读取体数据.
#[inline]
pub fn volume<P: AsRef<Path>>(path: P) -> FigureResult<Volume> {
    Volume::open(path)
}

/// 读取可选的坐标轴标签图.
pub fn labels(path: Option<&Path>) -> FigureResult<Option<GrayRaster>> {
    path.map(GrayRaster::open).transpose()
}
