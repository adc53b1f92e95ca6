//! 最大强度投影渲染器.

use super::sample::sample;
use super::{Affine3, ProjectionRequest, Renderer};
use crate::{FigureResult, GrayRaster, Idx2d, Volume};
use cfg_if::cfg_if;
use ndarray::{Array2, Zip};

/// 最大强度投影 (MIP) 渲染器.
///
/// 体数据中心被平移到原点, 施加请求中的变换后, 再平移到输出图像的中心.
/// 每个输出像素沿观察方向 (变换后的 z 轴) 以固定步长采样, 取最大值,
/// 最后把强度窗口 `[min, max]` 线性映射到 `[0, 255]`.
///
/// 恒等变换且输出尺寸与体数据一致时, 像素 `(y, x)` 恰好看向体素列 `(x, y, ·)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaxIntensityRenderer {
    step: f64,
}

impl Default for MaxIntensityRenderer {
    fn default() -> Self {
        Self { step: 1.0 }
    }
}

impl MaxIntensityRenderer {
    /// 以观察方向上的采样步长 `step` 创建渲染器. `step` 不是正数时使用 1.
    pub fn new(step: f64) -> Self {
        let step = if step > 0.0 { step } else { 1.0 };
        Self { step }
    }

    /// 从体素坐标到屏幕坐标的完整变换.
    fn screen_transform(volume: &Volume, request: &ProjectionRequest) -> Affine3 {
        let (nx, ny, nz) = volume.shape();
        let half = |n: usize| (n as f64 - 1.0) / 2.0;
        Affine3::identity()
            .translate([-half(nx), -half(ny), -half(nz)])
            .then(&request.transform)
            .translate([half(request.width), half(request.height), 0.0])
    }

    /// 体数据包围盒在屏幕空间中覆盖的深度采样点.
    fn depth_samples(&self, volume: &Volume, to_screen: &Affine3) -> Vec<f64> {
        let (nx, ny, nz) = volume.shape();
        let last = |n: usize| n.saturating_sub(1) as f64;
        let (lo, hi) = (0..8)
            .map(|i| {
                let corner = [
                    if i & 1 == 0 { 0.0 } else { last(nx) },
                    if i & 2 == 0 { 0.0 } else { last(ny) },
                    if i & 4 == 0 { 0.0 } else { last(nz) },
                ];
                to_screen.apply(corner)[2]
            })
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| (lo.min(z), hi.max(z)));
        let n = ((hi - lo) / self.step).floor() as usize + 1;
        (0..n).map(|k| lo + k as f64 * self.step).collect()
    }
}

impl Renderer for MaxIntensityRenderer {
    fn project(&self, volume: &Volume, request: &ProjectionRequest) -> FigureResult<GrayRaster> {
        let to_screen = Self::screen_transform(volume, request);
        let to_volume = to_screen.inverse()?;
        let depth = self.depth_samples(volume, &to_screen);

        let data = volume.data();
        let interpolation = request.interpolation;
        let min = request.min;
        let width = request.max - request.min;
        let scale = if width > 0.0 { 255.0 / width } else { 0.0 };

        let render_pixel = |(h, w): Idx2d| -> u8 {
            let brightest = depth
                .iter()
                .map(|&z| sample(&data, to_volume.apply([w as f64, h as f64, z]), interpolation))
                .fold(f32::MIN, f32::max);
            ((brightest - min) * scale).round().clamp(0.0, 255.0) as u8
        };

        let mut out = Array2::<u8>::zeros((request.height, request.width));
        cfg_if! {
            if #[cfg(feature = "rayon")] {
                Zip::indexed(&mut out).par_for_each(|pos, v| *v = render_pixel(pos));
            } else {
                Zip::indexed(&mut out).for_each(|pos, v| *v = render_pixel(pos));
            }
        }
        log::debug!(
            "Projected {:?} to {}x{} with {} depth samples ({:?})",
            volume.shape(),
            request.width,
            request.height,
            depth.len(),
            interpolation
        );
        Ok(GrayRaster::from(out))
    }
}
