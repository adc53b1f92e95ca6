//! 预置的遮挡方案.
//!
//! `slice_xy` 始终作用于 x 轴 (轴 0), `slice_yz` 始终作用于 z 轴 (轴 2).

use super::{Region, RegionSet, Volume};
use crate::consts::axis::{X, Z};
use crate::{FigureError, FigureResult};

/// 体数据遮挡方案. 所有方案都以 0 填充被遮挡的体素.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskPlan {
    /// 只保留两张相交的切片所构成的 "角":
    /// 涂掉 `x < slice_xy` 与 `z > slice_yz` 两个平板,
    /// 再涂掉 `x > slice_xy && z < slice_yz` 的子块.
    CornerSlices,

    /// 只保留两张切片的交线, 用于定位竖直参考线.
    VerticalLine,

    /// 只涂掉 `x > slice_xy && z < slice_yz` 的子块, 露出体数据内部的角.
    InverseCorner,
}

impl MaskPlan {
    /// 为形状为 `(nx, _, nz)` 的体数据生成该方案的全部区间组.
    pub fn region_sets(
        &self,
        (nx, _, nz): crate::Idx3d,
        slice_xy: usize,
        slice_yz: usize,
    ) -> FigureResult<Vec<RegionSet>> {
        let (after_xy, after_yz) = (slice_xy.saturating_add(1), slice_yz.saturating_add(1));
        let corner = RegionSet::slab(Region::new(X, after_xy, nx)?).and(Region::new(Z, 0, slice_yz)?);
        let sets = match self {
            MaskPlan::CornerSlices => vec![
                RegionSet::slab(Region::new(X, 0, slice_xy)?),
                RegionSet::slab(Region::new(Z, after_yz, nz)?),
                corner,
            ],
            MaskPlan::VerticalLine => vec![
                RegionSet::slab(Region::new(X, 0, slice_xy)?),
                RegionSet::slab(Region::new(X, after_xy, nx)?),
                RegionSet::slab(Region::new(Z, 0, slice_yz)?),
                RegionSet::slab(Region::new(Z, after_yz, nz)?),
                corner,
            ],
            MaskPlan::InverseCorner => vec![corner],
        };
        Ok(sets)
    }
}

impl Volume {
    /// 在体数据上就地执行遮挡方案 `plan`. 返回被写入的体素总数 (重叠部分重复计数).
    ///
    /// `slice_xy` 或 `slice_yz` 越界时返回 `Err(FigureError::SliceOutOfRange)`.
    pub fn apply_plan(&mut self, plan: MaskPlan, slice_xy: usize, slice_yz: usize) -> FigureResult<usize> {
        for (axis, pos) in [(X, slice_xy), (Z, slice_yz)] {
            let extent = self.extent(axis);
            if pos >= extent {
                return Err(FigureError::SliceOutOfRange { axis, pos, extent });
            }
        }
        let written: usize = plan
            .region_sets(self.shape(), slice_xy, slice_yz)?
            .iter()
            .map(|set| self.mask_regions(set, 0.0))
            .sum();
        log::debug!("{plan:?} at ({slice_xy}, {slice_yz}) masked {written} voxels");
        Ok(written)
    }
}
