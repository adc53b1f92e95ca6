//! 轮廓提取用的逐像素标签图.

use super::fill::{flood_fill, neighbour4};
use crate::consts::label::*;
use crate::{FigureError, FigureResult, GrayRaster, Idx2d, OutlineDefect};
use ndarray::{Array2, ArrayView2};
use std::ops::Index;

/// 轮廓提取过程中的逐像素标签图.
///
/// 每个像素恰好属于 `BACKGROUND`, `FOREGROUND`, `EXTERIOR` 三类之一.
/// `EXTERIOR` 只能由 [`OutlineMask::fill_exterior`] 从 `(0, 0)` 泛洪得到.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineMask {
    data: Array2<u8>,
}

impl Index<Idx2d> for OutlineMask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl OutlineMask {
    /// 二值化. 严格大于 `threshold` 的像素为前景, 其余为背景.
    pub fn binarize(projection: &GrayRaster, threshold: u8) -> Self {
        let data = projection
            .array_view()
            .mapv(|p| if p > threshold { FOREGROUND } else { BACKGROUND });
        Self { data }
    }

    /// 从 `(0, 0)` 出发 4-邻接泛洪, 把所有可达的背景像素标记为外部背景.
    /// 返回被标记的像素个数.
    ///
    /// # 注意
    ///
    /// 种子 `(0, 0)` 不是背景 (包括已经泛洪过的情形) 时,
    /// 返回 `Err(FigureError::OutlineNotClosable(OutlineDefect::SeedNotBackground))`,
    /// 并且不修改标签图.
    pub fn fill_exterior(&mut self) -> FigureResult<usize> {
        match self.data.get((0, 0)) {
            Some(&p) if is_background(p) => Ok(flood_fill(&mut self.data, (0, 0), EXTERIOR)),
            _ => Err(FigureError::OutlineNotClosable(
                OutlineDefect::SeedNotBackground,
            )),
        }
    }

    /// 边缘检测.
    ///
    /// 对于每个外部背景像素, 检查它沿两个轴方向偏移 `+1` 与 `-1` 的 4 个邻居
    /// (图像以外视为外部背景). 只要其中有前景像素, 就在输出图的对应位置写入 `1.0`.
    /// 其它位置保持 `0.0`.
    ///
    /// 输出是一条贴着前景外侧的单像素细线.
    pub fn boundary(&self) -> Array2<f32> {
        let mut trace = Array2::<f32>::zeros(self.data.dim());
        for (pos, &p) in self.data.indexed_iter() {
            if is_exterior(p) && self.is_n4_containing(pos, FOREGROUND) {
                trace[pos] = 1.0;
            }
        }
        trace
    }

    /// `pos` 的 4-邻居中是否有值为 `value` 的像素. 越界的邻居被忽略.
    fn is_n4_containing(&self, pos: Idx2d, value: u8) -> bool {
        neighbour4(pos)
            .into_iter()
            .any(|p| self.data.get(p) == Some(&value))
    }

    /// 标签图的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置的标签. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<u8> {
        self.data.get(pos).copied()
    }

    /// 统计标签为 `label` 的像素个数.
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|&&p| p == label).count()
    }

    /// 以 8-bit 灰度图表示前景: 前景为 255, 其它为 0.
    pub fn foreground_raster(&self) -> GrayRaster {
        GrayRaster::from(self.data.mapv(|p| if is_foreground(p) { u8::MAX } else { 0 }))
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }
}
