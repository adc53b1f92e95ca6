//! 渲染结果缓存.
//!
//! 同一体数据在相同 `(size_x, size_y, slice_xy, slice_yz)` 下的投影与竖直参考线可以直接复用.
//! 缓存是注入到流水线中的协作者, 核心算法本身不访问文件系统.

use crate::{FigureError, FigureResult, GrayRaster, ImgWrite};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 缓存键.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CacheKey {
    /// 体数据名, 见 [`crate::Volume::name`]. 可以为空.
    pub volume: String,
    /// 输出宽度.
    pub size_x: usize,
    /// 输出高度.
    pub size_y: usize,
    /// 沿 x 轴的切片位置.
    pub slice_xy: usize,
    /// 沿 z 轴的切片位置.
    pub slice_yz: usize,
}

impl CacheKey {
    /// 文件名主干, 形如 `_liver_800_600_145_145`. 体数据名为空时省略该段.
    pub fn file_stem(&self) -> String {
        let sizes = format!(
            "_{}_{}_{}_{}",
            self.size_x, self.size_y, self.slice_xy, self.slice_yz
        );
        if self.volume.is_empty() {
            sizes
        } else {
            format!("_{}{sizes}", self.volume)
        }
    }
}

/// 可缓存的投影种类.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RasterKind {
    /// 角切片投影.
    CornerSlices,
    /// 反向角投影.
    InverseCorner,
}

impl RasterKind {
    /// 文件名前缀.
    pub const fn prefix(&self) -> &'static str {
        match self {
            RasterKind::CornerSlices => "corner_slices",
            RasterKind::InverseCorner => "inverse_corner",
        }
    }
}

/// 渲染结果缓存. 所有方法都只需要共享引用, 以便在多帧之间共用.
///
/// `load_*` 在未命中时返回 `Ok(None)`.
pub trait RenderCache {
    /// 读取投影.
    fn load_raster(&self, kind: RasterKind, key: &CacheKey) -> FigureResult<Option<GrayRaster>>;

    /// 保存投影.
    fn store_raster(&self, kind: RasterKind, key: &CacheKey, raster: &GrayRaster) -> FigureResult<()>;

    /// 读取竖直参考线.
    fn load_line(&self, key: &CacheKey) -> FigureResult<Option<usize>>;

    /// 保存竖直参考线.
    fn store_line(&self, key: &CacheKey, line: usize) -> FigureResult<()>;
}

impl<C: RenderCache + ?Sized> RenderCache for &C {
    fn load_raster(&self, kind: RasterKind, key: &CacheKey) -> FigureResult<Option<GrayRaster>> {
        (**self).load_raster(kind, key)
    }

    fn store_raster(&self, kind: RasterKind, key: &CacheKey, raster: &GrayRaster) -> FigureResult<()> {
        (**self).store_raster(kind, key, raster)
    }

    fn load_line(&self, key: &CacheKey) -> FigureResult<Option<usize>> {
        (**self).load_line(key)
    }

    fn store_line(&self, key: &CacheKey, line: usize) -> FigureResult<()> {
        (**self).store_line(key, line)
    }
}

/// 不缓存任何内容.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCache;

impl RenderCache for NoCache {
    fn load_raster(&self, _: RasterKind, _: &CacheKey) -> FigureResult<Option<GrayRaster>> {
        Ok(None)
    }

    fn store_raster(&self, _: RasterKind, _: &CacheKey, _: &GrayRaster) -> FigureResult<()> {
        Ok(())
    }

    fn load_line(&self, _: &CacheKey) -> FigureResult<Option<usize>> {
        Ok(None)
    }

    fn store_line(&self, _: &CacheKey, _: usize) -> FigureResult<()> {
        Ok(())
    }
}

/// 进程内缓存.
#[derive(Debug, Default)]
pub struct MemoryCache {
    rasters: Mutex<HashMap<(RasterKind, CacheKey), GrayRaster>>,
    lines: Mutex<HashMap<CacheKey, usize>>,
}

impl MemoryCache {
    /// 创建空缓存.
    pub fn new() -> Self {
        Self::default()
    }

    /// 已缓存的投影个数.
    pub fn raster_count(&self) -> usize {
        self.rasters.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl RenderCache for MemoryCache {
    fn load_raster(&self, kind: RasterKind, key: &CacheKey) -> FigureResult<Option<GrayRaster>> {
        let map = self.rasters.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(&(kind, key.clone())).cloned())
    }

    fn store_raster(&self, kind: RasterKind, key: &CacheKey, raster: &GrayRaster) -> FigureResult<()> {
        let mut map = self.rasters.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert((kind, key.clone()), raster.clone());
        Ok(())
    }

    fn load_line(&self, key: &CacheKey) -> FigureResult<Option<usize>> {
        let map = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).copied())
    }

    fn store_line(&self, key: &CacheKey, line: usize) -> FigureResult<()> {
        let mut map = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.clone(), line);
        Ok(())
    }
}

/// 以目录为存储的缓存. 投影保存为无损 PNG, 竖直参考线保存为单行整数文本.
///
/// 目录在第一次写入时创建.
#[derive(Clone, Debug)]
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    /// 以 `dir` 为缓存目录.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
        }
    }

    /// 缓存目录.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 投影的缓存文件路径.
    pub fn raster_path(&self, kind: RasterKind, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}{}.png", kind.prefix(), key.file_stem()))
    }

    /// 竖直参考线的缓存文件路径.
    pub fn line_path(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("vertical_line{}.txt", key.file_stem()))
    }
}

impl RenderCache for FsCache {
    fn load_raster(&self, kind: RasterKind, key: &CacheKey) -> FigureResult<Option<GrayRaster>> {
        let path = self.raster_path(kind, key);
        if !path.is_file() {
            return Ok(None);
        }
        let raster = GrayRaster::open(&path)?;
        log::debug!("Cache hit: {}", path.display());
        Ok(Some(raster))
    }

    fn store_raster(&self, kind: RasterKind, key: &CacheKey, raster: &GrayRaster) -> FigureResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.raster_path(kind, key);
        raster.save(&path)?;
        log::info!("Cached {:?} at {}", kind, path.display());
        Ok(())
    }

    fn load_line(&self, key: &CacheKey) -> FigureResult<Option<usize>> {
        let path = self.line_path(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let first = text.lines().next().unwrap_or_default().trim();
        let line = first
            .parse::<usize>()
            .map_err(|e| FigureError::CorruptedCache {
                path: path.clone(),
                reason: format!("'{first}' is not a column index: {e}"),
            })?;
        log::debug!("Cache hit: {} = {line}", path.display());
        Ok(Some(line))
    }

    fn store_line(&self, key: &CacheKey, line: usize) -> FigureResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.line_path(key);
        let mut f = fs::File::create(&path)?;
        writeln!(f, "{line}")?;
        log::info!("Cached vertical line {line} at {}", path.display());
        Ok(())
    }
}
