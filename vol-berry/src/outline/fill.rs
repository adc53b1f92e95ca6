//! 4-邻接泛洪填充.

use crate::Idx2d;
use ndarray::Array2;
use std::collections::VecDeque;

/// 获得 `(h, w)` 的 4-邻居索引. 不检查越界; 越界的分量会变得非常大, 交给 `get` 过滤.
#[inline]
pub(crate) fn neighbour4((h, w): Idx2d) -> [Idx2d; 4] {
    [
        (h.wrapping_sub(1), w),
        (h.saturating_add(1), w),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
    ]
}

/// 从 `seed` 出发, 把与种子值相等且 4-连通的像素全部替换为 `value`.
/// 返回被替换的像素个数.
///
/// 种子越界或种子值已经等于 `value` 时什么也不做, 返回 0.
pub(crate) fn flood_fill<T: Copy + PartialEq>(data: &mut Array2<T>, seed: Idx2d, value: T) -> usize {
    let Some(&target) = data.get(seed) else {
        return 0;
    };
    if target == value {
        return 0;
    }

    // 入队时即写入新值, 因此无需额外的 visited 集合.
    let mut q = VecDeque::with_capacity(64);
    data[seed] = value;
    q.push_back(seed);
    let mut count = 1usize;

    while let Some(cur) = q.pop_front() {
        for neigh in neighbour4(cur) {
            if let Some(p) = data.get_mut(neigh) {
                if *p == target {
                    *p = value;
                    count += 1;
                    q.push_back(neigh);
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::flood_fill;
    use ndarray::array;

    #[test]
    fn test_flood_fill_four_connected() {
        let mut a = array![[0u8, 0, 1, 0], [0, 1, 0, 0], [1, 0, 0, 1], [0, 0, 1, 0]];
        // 对角相邻不算连通.
        assert_eq!(flood_fill(&mut a, (0, 0), 5), 3);
        assert_eq!(a, array![[5u8, 5, 1, 0], [5, 1, 0, 0], [1, 0, 0, 1], [0, 0, 1, 0]]);

        assert_eq!(flood_fill(&mut a, (1, 2), 7), 7);
        assert_eq!(a[(3, 0)], 7);
        assert_eq!(a[(3, 3)], 0);
    }

    #[test]
    fn test_flood_fill_degenerate_seed() {
        let mut a = array![[0.5f32, 0.5], [0.5, 0.0]];
        assert_eq!(flood_fill(&mut a, (0, 0), 0.5), 0);
        assert_eq!(flood_fill(&mut a, (2, 0), 1.0), 0);
        assert_eq!(flood_fill(&mut a, (0, 1), 1.0), 3);
        assert_eq!(a[(1, 1)], 0.0);
    }
}
