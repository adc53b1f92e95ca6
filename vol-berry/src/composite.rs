//! 灰度底图与彩色轮廓的叠加合成.

use crate::consts::composite::{BOOST, OVERLAY};
use crate::{FigureResult, GrayRaster, Idx2d, RgbRaster};
use image::Rgb;
use itertools::izip;
use ndarray::Array2;

/// 逐像素的叠加权重, 取值 `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMap {
    data: Array2<f32>,
}

impl WeightMap {
    /// 由 8-bit 轮廓图得到权重: `w = pixel / 255`.
    pub fn from_raster(outline: &GrayRaster) -> Self {
        let data = outline.array_view().mapv(|p| f32::from(p) / 255.0);
        Self { data }
    }

    /// 分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置的权重. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<f32> {
        self.data.get(pos).copied()
    }
}

/// 叠加合成器. 保存叠加色与底图亮度提升倍数.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutlineCompositor {
    overlay: [u8; 3],
    boost: f32,
}

impl Default for OutlineCompositor {
    fn default() -> Self {
        Self::new(OVERLAY, BOOST)
    }
}

impl OutlineCompositor {
    /// 以叠加色 `overlay` 和亮度提升倍数 `boost` 创建合成器.
    #[inline]
    pub fn new(overlay: [u8; 3], boost: f32) -> Self {
        Self { overlay, boost }
    }

    /// 合成. 对每个像素, 设底图亮度为 `i = min(255, round(base * boost))`,
    /// 权重为 `w`, 叠加色各通道占比为 `f[c] = overlay[c] / 255`, 则
    ///
    /// `out[c] = round(max(i - i * w * (其它两个通道的 f 之和), 255 * w * f[c]))`.
    ///
    /// 即 "压制后的底图" 与 "按权重增强的叠加色" 取大, 而不是线性 alpha 混合.
    /// 输出不带 alpha 通道.
    ///
    /// # 注意
    ///
    /// `base` 与 `outline` 形状不一致时返回 `Err(FigureError::ShapeMismatch)`.
    pub fn composite(&self, base: &GrayRaster, outline: &GrayRaster) -> FigureResult<RgbRaster> {
        base.ensure_same_shape(outline)?;
        let weights = WeightMap::from_raster(outline);
        let frac = self.overlay.map(|c| f32::from(c) / 255.0);

        let (height, width) = base.shape();
        let mut out = RgbRaster::new(width as u32, height as u32);
        for (&b, &w, pix) in izip!(base.iter(), weights.data.iter(), out.pixels_mut()) {
            let i = (f32::from(b) * self.boost).round().min(255.0);
            let wi = w * 255.0;
            let channel = |c: usize| {
                let others: f32 = (0..3).filter(|&o| o != c).map(|o| frac[o]).sum();
                (i - i * w * others).max(wi * frac[c]).round().clamp(0.0, 255.0) as u8
            };
            *pix = Rgb([channel(0), channel(1), channel(2)]);
        }
        Ok(out)
    }
}

/// 以默认叠加色和亮度提升倍数合成, 参见 [`OutlineCompositor::composite`].
pub fn composite(base: &GrayRaster, outline: &GrayRaster) -> FigureResult<RgbRaster> {
    OutlineCompositor::default().composite(base, outline)
}

#[cfg(test)]
mod tests {
    use super::{composite, OutlineCompositor, WeightMap};
    use crate::{FigureError, GrayRaster};
    use ndarray::Array2;

    fn gradient() -> GrayRaster {
        GrayRaster::from(Array2::from_shape_fn((4, 64), |(h, w)| (h * 64 + w) as u8))
    }

    #[test]
    fn test_zero_weight_returns_boosted_base() {
        let base = gradient();
        let out = composite(&base, &GrayRaster::zeros(base.shape())).unwrap();
        for ((h, w), &b) in base.indexed_iter() {
            let i = (f32::from(b) * 1.076).round().min(255.0) as u8;
            assert_eq!(out.get_pixel(w as u32, h as u32).0, [i, i, i]);
        }
        // 亮部被截断到 255.
        assert_eq!(out.get_pixel(63, 3).0, [255, 255, 255]);
    }

    #[test]
    fn test_full_weight_red_overlay() {
        let base = gradient();
        let outline = GrayRaster::from(Array2::from_elem(base.shape(), 255u8));
        let out = OutlineCompositor::new([255, 0, 0], 1.076)
            .composite(&base, &outline)
            .unwrap();
        for pix in out.pixels() {
            let [r, g, b] = pix.0;
            assert_eq!(r, 255);
            assert_eq!(g, 0);
            assert_eq!(b, 0);
        }
    }

    #[test]
    fn test_half_weight_red_overlay() {
        let base = GrayRaster::from(Array2::from_elem((1, 1), 200u8));
        let outline = GrayRaster::from(Array2::from_elem((1, 1), 51u8));
        let out = OutlineCompositor::new([255, 0, 0], 1.0).composite(&base, &outline).unwrap();
        // w = 0.2: 红色通道无压制, 其它两个通道被压制 20%.
        assert_eq!(out.get_pixel(0, 0).0, [200, 160, 160]);
    }

    #[test]
    fn test_shape_mismatch() {
        let base = GrayRaster::zeros((3, 3));
        assert!(matches!(
            composite(&base, &GrayRaster::zeros((3, 4))),
            Err(FigureError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_weight_map() {
        let mut r = GrayRaster::zeros((2, 2));
        r[(1, 0)] = 255;
        r[(0, 1)] = 51;
        let m = WeightMap::from_raster(&r);
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get((1, 0)), Some(1.0));
        assert_eq!(m.get((0, 1)), Some(0.2));
        assert_eq!(m.get((2, 0)), None);
    }
}
