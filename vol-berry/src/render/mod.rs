//! 投影渲染. 把遮挡后的体数据经仿射变换投影为 8-bit 灰度图.
//!
//! 核心算法只依赖 [`Renderer`] trait; [`MaxIntensityRenderer`] 是随库提供的实现.

mod affine;
mod mip;
mod sample;

pub use affine::Affine3;
pub use mip::MaxIntensityRenderer;

use crate::{FigureResult, GrayRaster, Volume};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 插值方式.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Interpolation {
    /// 最近邻.
    Nearest,

    /// 三线性.
    #[default]
    Linear,

    /// 三次 (Catmull-Rom).
    Cubic,
}

/// 一次投影的全部参数.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionRequest {
    /// 输出宽度.
    pub width: usize,

    /// 输出高度.
    pub height: usize,

    /// 以体数据中心为原点的仿射变换.
    pub transform: Affine3,

    /// 插值方式.
    pub interpolation: Interpolation,

    /// 映射到 0 的强度.
    pub min: f32,

    /// 映射到 255 的强度.
    pub max: f32,
}

impl ProjectionRequest {
    /// 创建强度窗口为 `[0, 1]` 的投影请求.
    pub fn new(width: usize, height: usize, transform: Affine3, interpolation: Interpolation) -> Self {
        Self {
            width,
            height,
            transform,
            interpolation,
            min: 0.0,
            max: 1.0,
        }
    }

    /// 设置强度窗口.
    pub fn with_window(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// 替换插值方式.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

/// 投影渲染器.
pub trait Renderer {
    /// 把 `volume` 按 `request` 投影为分辨率 `(request.height, request.width)` 的灰度图.
    fn project(&self, volume: &Volume, request: &ProjectionRequest) -> FigureResult<GrayRaster>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    #[inline]
    fn project(&self, volume: &Volume, request: &ProjectionRequest) -> FigureResult<GrayRaster> {
        (**self).project(volume, request)
    }
}
