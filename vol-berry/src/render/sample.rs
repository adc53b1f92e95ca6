//! 体数据在实数坐标上的插值采样. 体数据以外的体素视为 0.

use super::Interpolation;
use ndarray::ArrayView3;

/// 一个轴上的插值抽头: 起始整数坐标, 权重以及有效权重个数.
type Taps = (isize, [f64; 4], usize);

#[inline]
fn taps(x: f64, interpolation: Interpolation) -> Taps {
    match interpolation {
        Interpolation::Nearest => (x.round() as isize, [1.0, 0.0, 0.0, 0.0], 1),
        Interpolation::Linear => {
            let f = x.floor();
            let t = x - f;
            (f as isize, [1.0 - t, t, 0.0, 0.0], 2)
        }
        Interpolation::Cubic => {
            let f = x.floor();
            (f as isize - 1, catmull_rom(x - f), 4)
        }
    }
}

/// Catmull-Rom 三次卷积核在 `t` 处的 4 个权重, `t` 属于 `[0, 1)`.
#[inline]
fn catmull_rom(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

#[inline]
fn voxel(data: &ArrayView3<'_, f32>, x: isize, y: isize, z: isize) -> f64 {
    if x < 0 || y < 0 || z < 0 {
        return 0.0;
    }
    data.get((x as usize, y as usize, z as usize))
        .map_or(0.0, |v| f64::from(*v))
}

/// 在体素坐标 `p = (x, y, z)` 处采样.
pub(crate) fn sample(data: &ArrayView3<'_, f32>, p: [f64; 3], interpolation: Interpolation) -> f32 {
    let (nx, ny, nz) = data.dim();
    let outside = |v: f64, n: usize| v < -2.0 || v > n as f64 + 1.0;
    if outside(p[0], nx) || outside(p[1], ny) || outside(p[2], nz) {
        return 0.0;
    }

    let (x0, wx, lx) = taps(p[0], interpolation);
    let (y0, wy, ly) = taps(p[1], interpolation);
    let (z0, wz, lz) = taps(p[2], interpolation);

    let mut acc = 0.0;
    for (i, &a) in wx.iter().enumerate().take(lx) {
        for (j, &b) in wy.iter().enumerate().take(ly) {
            let ab = a * b;
            if ab == 0.0 {
                continue;
            }
            for (k, &c) in wz.iter().enumerate().take(lz) {
                if c != 0.0 {
                    acc += ab * c * voxel(data, x0 + i as isize, y0 + j as isize, z0 + k as isize);
                }
            }
        }
    }
    acc as f32
}

#[cfg(test)]
mod tests {
    use super::{catmull_rom, sample};
    use crate::render::Interpolation;
    use ndarray::Array3;

    #[test]
    fn test_catmull_rom_partition_of_unity() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let w = catmull_rom(t);
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(catmull_rom(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sample_on_grid_is_exact() {
        let a = Array3::from_shape_fn((4, 5, 6), |(x, y, z)| (x * 100 + y * 10 + z) as f32);
        let v = a.view();
        for interp in [Interpolation::Nearest, Interpolation::Linear, Interpolation::Cubic] {
            assert_eq!(sample(&v, [1.0, 2.0, 3.0], interp), 123.0);
            assert_eq!(sample(&v, [-5.0, 2.0, 3.0], interp), 0.0);
        }
    }

    #[test]
    fn test_sample_between_voxels() {
        let a = Array3::from_shape_fn((4, 4, 4), |(x, _, _)| x as f32);
        let v = a.view();
        assert_eq!(sample(&v, [1.4, 1.0, 1.0], Interpolation::Nearest), 1.0);
        assert_eq!(sample(&v, [1.6, 1.0, 1.0], Interpolation::Nearest), 2.0);
        assert!((sample(&v, [1.25, 1.0, 1.0], Interpolation::Linear) - 1.25).abs() < 1e-6);
        // Catmull-Rom 能精确重建线性函数 (远离边界时).
        assert!((sample(&v, [1.5, 1.0, 1.0], Interpolation::Cubic) - 1.5).abs() < 1e-6);

        // 越过边界后逐渐衰减为 0.
        assert!((sample(&v, [3.5, 1.0, 1.0], Interpolation::Linear) - 1.5).abs() < 1e-6);
    }
}
