//! 可分离高斯平滑. 图像以外的像素视为 0.

use ndarray::{Array2, ArrayViewMut1, Axis};

/// 归一化的一维高斯核, 长度为 `2 * radius + 1`.
#[derive(Debug, Clone)]
pub(crate) struct GaussKernel1d {
    radius: usize,
    taps: Vec<f32>,
}

impl GaussKernel1d {
    /// 构造标准差为 `sigma` 的高斯核. 半径取 `max(1, round(3 * sigma))`.
    ///
    /// `sigma` 不是正的有限数时返回 `None`.
    pub(crate) fn new(sigma: f64) -> Option<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return None;
        }
        let radius = ((3.0 * sigma + 0.5) as usize).max(1);
        let two_sigma2 = 2.0 * sigma * sigma;
        let raw: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-(x * x) / two_sigma2).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        let taps = raw.into_iter().map(|v| (v / sum) as f32).collect();
        Some(Self { radius, taps })
    }

    #[inline]
    pub(crate) fn radius(&self) -> usize {
        self.radius
    }

    /// 对一条 lane 做零延拓卷积. `buf` 是与 lane 等长的临时缓冲.
    fn convolve_lane(&self, mut lane: ArrayViewMut1<'_, f32>, buf: &mut Vec<f32>) {
        buf.clear();
        buf.extend(lane.iter().copied());
        let n = buf.len() as isize;
        let r = self.radius as isize;
        for (i, out) in lane.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &kv) in self.taps.iter().enumerate() {
                let idx = i as isize + k as isize - r;
                if (0..n).contains(&idx) {
                    acc += buf[idx as usize] * kv;
                }
            }
            *out = acc;
        }
    }
}

/// 就地对 `raster` 做标准差为 `sigma` 的高斯平滑, 先沿行再沿列.
///
/// `sigma <= 0` 时不做任何修改.
pub(crate) fn gauss_smooth(raster: &mut Array2<f32>, sigma: f64) {
    let Some(kernel) = GaussKernel1d::new(sigma) else {
        return;
    };
    let mut buf = Vec::with_capacity(raster.nrows().max(raster.ncols()));
    for axis in [Axis(1), Axis(0)] {
        for lane in raster.lanes_mut(axis) {
            kernel.convolve_lane(lane, &mut buf);
        }
    }
}
