//! 沿竖直参考线闭合轮廓, 并填充轮廓内部.

use super::fill::flood_fill;
use crate::{FigureError, FigureResult, Idx2d, OutlineDefect};
use ndarray::Array2;

/// 边缘图中表示 "有边缘" 的值.
const EDGE: f32 = 1.0;

/// 边缘图中表示 "空白" 的值.
const BLANK: f32 = 0.0;

/// 沿第 `line` 列自上而下扫描边缘图 `trace`, 闭合轮廓在该列上的缺口.
///
/// 每遇到一个边缘像素就翻转一次 "在内部" 标志. 在内部时:
///
/// 1. 记录左侧相邻列第一次出现空白像素的行 (`posL`),
///   以及右侧相邻列第一次出现空白像素的行 (`posR`);
/// 2. 把参考线上的像素置为边缘.
///
/// 返回两侧内部种子 `((posL, line - 1), (posR, line + 1))`.
///
/// # 注意
///
/// - `line` 两侧的列必须都在图像内, 否则返回
///   `OutlineNotClosable(LineOutOfRange)`, 且不修改 `trace`;
/// - 没有找到 `posL` 或 `posR` 时, 返回对应的 `OutlineNotClosable` 错误.
///   此时 `trace` 可能已被修改.
pub(crate) fn close_vertical_gap(trace: &mut Array2<f32>, line: usize) -> FigureResult<(Idx2d, Idx2d)> {
    let (height, width) = trace.dim();
    if line == 0 || line + 1 >= width {
        return Err(FigureError::OutlineNotClosable(
            OutlineDefect::LineOutOfRange(line, width),
        ));
    }

    let mut inside = false;
    let mut pos_l = None;
    let mut pos_r = None;
    for h in 0..height {
        if trace[(h, line)] == EDGE {
            inside = !inside;
        }
        if !inside {
            continue;
        }
        if pos_l.is_none() && trace[(h, line - 1)] == BLANK {
            pos_l = Some(h);
        }
        if pos_r.is_none() && trace[(h, line + 1)] == BLANK {
            pos_r = Some(h);
        }
        trace[(h, line)] = EDGE;
    }

    let left = pos_l.ok_or(FigureError::OutlineNotClosable(
        OutlineDefect::LeftInteriorNotFound,
    ))?;
    let right = pos_r.ok_or(FigureError::OutlineNotClosable(
        OutlineDefect::RightInteriorNotFound,
    ))?;
    Ok(((left, line - 1), (right, line + 1)))
}

/// 以 `value` 从两个种子出发泛洪填充轮廓内部. 返回被填充的像素总数.
///
/// 两个种子落在同一连通区域时, 第二次填充什么也不做.
pub(crate) fn fill_interior(trace: &mut Array2<f32>, (left, right): (Idx2d, Idx2d), value: f32) -> usize {
    flood_fill(trace, left, value) + flood_fill(trace, right, value)
}
