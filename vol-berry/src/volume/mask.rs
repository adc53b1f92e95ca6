//! 区域遮挡.

use ndarray::{s, Axis};

use super::{Region, RegionSet, Volume};
use crate::consts::axis::NDIM;
use crate::{FigureError, FigureResult};

/// 遮挡实现块
impl Volume {
    /// 将 `regions` 所有区间之交确定的子块中的体素全部设置为 `value`,
    /// 子块以外的体素保持不变. 返回被写入的体素个数.
    ///
    /// - 只有一个区间时相当于 "涂掉一个平板", 多个区间时相当于 "涂掉一个子块";
    /// - 区间上界超出体数据范围时自动截断;
    /// - 交集为空时什么也不做, 返回 0.
    pub fn mask_regions(&mut self, regions: &RegionSet, value: f32) -> usize {
        let Some([x, y, z]) = regions.bounds(self.shape()) else {
            return 0;
        };
        let mut block = self.data.slice_mut(s![x, y, z]);
        block.fill(value);
        block.len()
    }

    /// 将第 `axis` 轴上 `[from, to)` 的平板设置为 `value`. 返回被写入的体素个数.
    #[inline]
    pub fn mask_slab(&mut self, axis: usize, from: usize, to: usize, value: f32) -> FigureResult<usize> {
        let region = Region::new(axis, from, to)?;
        Ok(self.mask_regions(&RegionSet::slab(region), value))
    }

    /// 将第 `axis` 轴上位于 `pos` 的超平面切片设置为 `value`.
    /// `pos` 越界时返回 `Err(FigureError::SliceOutOfRange)`.
    pub fn set_plane(&mut self, axis: usize, pos: usize, value: f32) -> FigureResult<usize> {
        if axis >= NDIM {
            return Err(FigureError::InvalidAxis(axis));
        }
        let extent = self.extent(axis);
        if pos >= extent {
            return Err(FigureError::SliceOutOfRange { axis, pos, extent });
        }
        let mut plane = self.data.index_axis_mut(Axis(axis), pos);
        plane.fill(value);
        Ok(plane.len())
    }
}
