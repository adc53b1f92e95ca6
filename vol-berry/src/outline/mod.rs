//! 轮廓提取. 把一张遮挡后的灰度投影图变为闭合的 8-bit 轮廓图.
//!
//! 流程依次为:
//!
//! 1. 二值化;
//! 2. 从 `(0, 0)` 泛洪标记外部背景;
//! 3. 4-邻接边缘检测, 得到单像素的浮点边缘图;
//! 4. 沿竖直参考线闭合缺口;
//! 5. 以低不透明度填充轮廓内部;
//! 6. 高斯平滑;
//! 7. 线性量化到 0..=255.
//!
//! 可选地再合并一张坐标轴标签图, 参见 [`merge_labels`].

mod close;
mod fill;
mod gauss;
mod labels;
mod mask;
mod quantize;

pub use labels::merge_labels;
pub use mask::OutlineMask;

use crate::consts::label::is_exterior;
use crate::consts::outline::{LABEL_ATTENUATION, LABEL_GAIN, SIGMA};
use crate::{FigureError, FigureResult, GrayRaster, OutlineDefect};
use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 轮廓提取参数.
///
/// 不同的投影组合方式需要不同的二值化阈值和内部填充强度,
/// 因此这些值都由调用方显式选择. 常用组合见 [`OutlineParams::CORNER`]
/// 和 [`OutlineParams::DIM`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutlineParams {
    /// 二值化阈值. 严格大于它的像素为前景.
    pub threshold: u8,

    /// 内部填充值为 `1 / fill_denominator`.
    pub fill_denominator: f32,

    /// 高斯平滑标准差. 不大于 0 时跳过平滑.
    pub sigma: f64,

    /// 合并标签时轮廓值的放大倍数.
    pub label_gain: f32,

    /// 合并标签时标签值的衰减除数.
    pub label_attenuation: f32,
}

impl OutlineParams {
    /// 用于角切片投影.
    pub const CORNER: Self = Self {
        threshold: 15,
        fill_denominator: 15.0,
        sigma: SIGMA,
        label_gain: LABEL_GAIN,
        label_attenuation: LABEL_ATTENUATION,
    };

    /// 用于较暗的投影组合 (更低的阈值与更淡的内部).
    pub const DIM: Self = Self {
        threshold: 5,
        fill_denominator: 30.0,
        ..Self::CORNER
    };

    /// 内部填充值.
    #[inline]
    pub fn fill_value(&self) -> f32 {
        1.0 / self.fill_denominator
    }
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self::CORNER
    }
}

/// 一次轮廓提取的全部结果.
#[derive(Clone, Debug)]
pub struct Outline {
    /// 二值化并完成外部泛洪后的标签图.
    pub mask: OutlineMask,

    /// 平滑前的浮点轮廓图: 边缘与参考线为 `1.0`,
    /// 内部为 [`OutlineParams::fill_value`], 其余为 `0.0`.
    pub trace: Array2<f32>,

    /// 平滑并量化后的轮廓图. 若提供了标签图, 则已合并标签.
    pub raster: GrayRaster,

    /// 内部填充的像素个数.
    pub interior: usize,
}

/// 轮廓提取器.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OutlineExtractor {
    params: OutlineParams,
}

impl OutlineExtractor {
    /// 以给定参数创建提取器.
    #[inline]
    pub fn new(params: OutlineParams) -> Self {
        Self { params }
    }

    /// 提取器参数.
    #[inline]
    pub fn params(&self) -> &OutlineParams {
        &self.params
    }

    /// 从投影图 `projection` 提取轮廓. `vertical_line` 为竖直参考线所在的列.
    ///
    /// # 注意
    ///
    /// - `(0, 0)` 不是背景, 参考线两侧的列越界, 沿参考线找不到两侧内部,
    ///   或者内部种子落在外部背景上时, 返回 `Err(FigureError::OutlineNotClosable)`;
    /// - `labels` 与投影图形状不一致时返回 `Err(FigureError::ShapeMismatch)`.
    pub fn extract(
        &self,
        projection: &GrayRaster,
        vertical_line: usize,
        labels: Option<&GrayRaster>,
    ) -> FigureResult<Outline> {
        if let Some(labels) = labels {
            projection.ensure_same_shape(labels)?;
        }
        let p = &self.params;

        let mut mask = OutlineMask::binarize(projection, p.threshold);
        let exterior = mask.fill_exterior()?;

        let mut trace = mask.boundary();
        let seeds = close::close_vertical_gap(&mut trace, vertical_line)?;
        // 合法的种子只能是前景或被包围的背景.
        if let Some(seed) = [seeds.0, seeds.1]
            .into_iter()
            .find(|&s| mask.get(s).map_or(true, is_exterior))
        {
            return Err(FigureError::OutlineNotClosable(
                OutlineDefect::SeedOutsideSilhouette(seed),
            ));
        }
        let interior = close::fill_interior(&mut trace, seeds, p.fill_value());
        log::debug!(
            "Outline at line {vertical_line}: {exterior} exterior pixels, {interior} interior pixels"
        );

        let mut smoothed = trace.clone();
        gauss::gauss_smooth(&mut smoothed, p.sigma);
        let mut raster = quantize::rescale_to_u8(&smoothed);
        if let Some(labels) = labels {
            raster = merge_labels(&raster, labels, p.label_gain, p.label_attenuation)?;
        }

        Ok(Outline {
            mask,
            trace,
            raster,
            interior,
        })
    }
}
