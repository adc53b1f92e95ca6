//! 坐标轴标签图的合并.

use crate::{FigureResult, GrayRaster};

/// 把已经渲染好的坐标轴标签图 `labels` 合并进轮廓图 `outline`.
///
/// 逐像素取 `max(min(255, round(o * gain)), round(l / attenuation))`.
/// 两图形状不一致时返回 `Err(FigureError::ShapeMismatch)`.
pub fn merge_labels(
    outline: &GrayRaster,
    labels: &GrayRaster,
    gain: f32,
    attenuation: f32,
) -> FigureResult<GrayRaster> {
    outline.ensure_same_shape(labels)?;
    let mut merged = outline.clone();
    for (o, &l) in merged.iter_mut().zip(labels.iter()) {
        let boosted = (f32::from(*o) * gain).round().min(255.0);
        let faded = (f32::from(l) / attenuation).round().min(255.0);
        *o = boosted.max(faded) as u8;
    }
    Ok(merged)
}
