//! 轴向半开区间及其合取.

use crate::consts::axis::NDIM;
use crate::{FigureError, FigureResult, Idx3d};
use std::ops::Range;

/// 沿单个轴的半开区间 `[from, to)`.
///
/// 轴索引在构造时校验. `from >= to` 是合法的空区间, 遮挡时不产生任何效果.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    axis: usize,
    from: usize,
    to: usize,
}

impl Region {
    /// 构建区间. `axis` 不是 0, 1, 2 时返回 `Err(FigureError::InvalidAxis)`.
    pub fn new(axis: usize, from: usize, to: usize) -> FigureResult<Self> {
        if axis >= NDIM {
            return Err(FigureError::InvalidAxis(axis));
        }
        Ok(Self { axis, from, to })
    }

    /// 区间所在轴.
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// 下界 (包含).
    #[inline]
    pub fn from(&self) -> usize {
        self.from
    }

    /// 上界 (不包含).
    #[inline]
    pub fn to(&self) -> usize {
        self.to
    }

    /// 是否为空区间.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

/// 若干 [`Region`] 的合取. 被遮挡的子块是所有区间的 **交**, 而不是并.
///
/// 同一个轴上出现多个区间时, 取它们的交集.
/// 空集合不约束任何轴, 即对应整个体数据.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// 空集合.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 只包含一个区间, 即 "涂掉一个平板".
    #[inline]
    pub fn slab(region: Region) -> Self {
        Self {
            regions: vec![region],
        }
    }

    /// 追加一个区间.
    #[inline]
    pub fn and(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// 区间个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// 是否不含任何区间.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// 迭代所有区间.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// 在形状为 `shape` 的体数据上求交集, 返回三个轴上的范围.
    /// 上界会被截断到体数据范围内. 交集为空时返回 `None`.
    pub fn bounds(&self, (x, y, z): Idx3d) -> Option<[Range<usize>; NDIM]> {
        let mut b = [0..x, 0..y, 0..z];
        for r in self.regions.iter() {
            let cur = &mut b[r.axis];
            cur.start = cur.start.max(r.from);
            cur.end = cur.end.min(r.to);
        }
        b.iter().all(|r| r.start < r.end).then_some(b)
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, RegionSet};
    use crate::FigureError;

    #[test]
    fn test_invalid_axis() {
        assert!(matches!(Region::new(3, 0, 1), Err(FigureError::InvalidAxis(3))));
        assert!(Region::new(2, 0, 1).is_ok());
    }

    #[test]
    fn test_bounds_clamp_and_intersect() {
        let set = RegionSet::slab(Region::new(0, 2, 100).unwrap())
            .and(Region::new(0, 0, 6).unwrap())
            .and(Region::new(2, 1, 3).unwrap());
        assert_eq!(set.bounds((10, 4, 8)), Some([2..6, 0..4, 1..3]));
    }

    #[test]
    fn test_bounds_empty() {
        let set = RegionSet::slab(Region::new(1, 5, 5).unwrap());
        assert!(set.iter().all(Region::is_empty));
        assert_eq!(set.bounds((10, 10, 10)), None);

        // 截断后为空.
        let set = RegionSet::slab(Region::new(1, 12, 20).unwrap());
        assert_eq!(set.bounds((10, 10, 10)), None);
    }

    #[test]
    fn test_empty_set_is_everything() {
        assert_eq!(RegionSet::new().bounds((2, 3, 4)), Some([0..2, 0..3, 0..4]));
    }
}
