//! 运行时错误.

use crate::Idx2d;
use std::path::PathBuf;
use thiserror::Error;

/// 轮廓无法闭合的具体原因.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineDefect {
    /// 外部泛洪的种子 `(0, 0)` 不是背景像素.
    SeedNotBackground,

    /// 竖直参考线两侧的列不在图像范围内.
    ///
    /// 第一个参数是参考线, 第二个参数是图像宽度.
    LineOutOfRange(usize, usize),

    /// 扫描参考线时没有找到左侧内部种子 (`posL`).
    LeftInteriorNotFound,

    /// 扫描参考线时没有找到右侧内部种子 (`posR`).
    RightInteriorNotFound,

    /// 内部种子落在外部背景上. 参考线贴着剪影的边缘时会出现这种情况,
    /// 此时填充会淹没整个背景.
    SeedOutsideSilhouette(Idx2d),
}

/// 该 crate 的统一错误类型.
#[derive(Debug, Error)]
pub enum FigureError {
    /// 区域的轴索引不是 0, 1 或 2.
    #[error("invalid axis {0}: a volume only has axes 0, 1 and 2")]
    InvalidAxis(usize),

    /// 切片位置超出体数据范围.
    #[error("slice {pos} is out of range on axis {axis} (extent {extent})")]
    SliceOutOfRange {
        /// 轴.
        axis: usize,
        /// 切片位置.
        pos: usize,
        /// 该轴长度.
        extent: usize,
    },

    /// 两个栅格的形状 (高, 宽) 不一致.
    #[error("raster shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// 期望形状.
        expected: Idx2d,
        /// 实际形状.
        actual: Idx2d,
    },

    /// 投影图上没有任何非零像素, 无法定位竖直参考线.
    #[error("no visible pixel in projection, vertical line is undefined")]
    NoVisiblePixels,

    /// 轮廓无法闭合.
    #[error("outline not closable: {0:?}")]
    OutlineNotClosable(OutlineDefect),

    /// 投影变换不可逆.
    #[error("projection transform is singular (determinant {0})")]
    SingularTransform(f64),

    /// 体数据文件不存在.
    #[error("volume file '{}' does not exist", .0.display())]
    VolumeNotFound(PathBuf),

    /// 不支持的体数据文件格式.
    #[error("unsupported volume format '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// 文件中的数据不是三维的.
    #[error("expected a 3D volume, got dimensions {0:?}")]
    NotThreeDimensional(Vec<usize>),

    /// 缓存内容损坏.
    #[error("corrupted cache entry '{}': {reason}", path.display())]
    CorruptedCache {
        /// 缓存文件路径.
        path: PathBuf,
        /// 原因.
        reason: String,
    },

    /// NIfTI 读取错误.
    #[error(transparent)]
    Nifti(#[from] nifti::NiftiError),

    /// NPY 读取错误.
    #[error(transparent)]
    Npy(#[from] ndarray_npy::ReadNpyError),

    /// 图像编解码错误.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// 底层 I/O 错误.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 该 crate 的 `Result` 别名.
pub type FigureResult<T> = Result<T, FigureError>;
