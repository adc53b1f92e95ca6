//! 竖直参考线定位.

use crate::{FigureError, FigureResult, GrayRaster};

/// 计算投影图中所有非零像素横坐标的平均值, 四舍五入到整数列.
///
/// 输入通常是只保留两张切片交线的投影 (参见 [`crate::volume::MaskPlan::VerticalLine`]).
///
/// # 注意
///
/// 没有任何非零像素时返回 `Err(FigureError::NoVisiblePixels)`.
pub fn vertical_line(projection: &GrayRaster) -> FigureResult<usize> {
    let (sum, count) = projection
        .indexed_iter()
        .filter(|(_, &p)| p > 0)
        .fold((0u64, 0u64), |(sum, count), ((_, w), _)| (sum + w as u64, count + 1));
    if count == 0 {
        return Err(FigureError::NoVisiblePixels);
    }
    Ok((sum as f64 / count as f64).round() as usize)
}
