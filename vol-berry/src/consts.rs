//! 通用常量.

/// 轮廓掩膜 ([`crate::outline::OutlineMask`]) 的像素标签.
pub mod label {
    /// 背景. 二值化后未超过阈值的像素.
    pub const BACKGROUND: u8 = 0;

    /// 前景. 二值化后超过阈值的像素.
    pub const FOREGROUND: u8 = 1;

    /// 外部背景. 只能由种子 `(0, 0)` 泛洪到达.
    pub const EXTERIOR: u8 = 2;

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// 像素是否是前景?
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        matches!(p, FOREGROUND)
    }

    /// 像素是否是外部背景?
    #[inline]
    pub const fn is_exterior(p: u8) -> bool {
        matches!(p, EXTERIOR)
    }
}

/// 体数据的三个轴.
pub mod axis {
    /// x 轴 (`slice_xy` 作用的轴).
    pub const X: usize = 0;

    /// y 轴.
    pub const Y: usize = 1;

    /// z 轴 (`slice_yz` 作用的轴).
    pub const Z: usize = 2;

    /// 体数据维数.
    pub const NDIM: usize = 3;
}

/// 轮廓提取的默认参数.
pub mod outline {
    /// 高斯平滑的默认标准差 (像素).
    pub const SIGMA: f64 = 0.6;

    /// 合并坐标轴标签时轮廓值的放大倍数.
    pub const LABEL_GAIN: f32 = 1.25;

    /// 合并坐标轴标签时标签值的衰减除数.
    pub const LABEL_ATTENUATION: f32 = 1.1;
}

/// 叠加合成的默认参数.
pub mod composite {
    /// 底图亮度提升倍数.
    pub const BOOST: f32 = 1.076;

    /// 默认叠加色 (偏橙的红色).
    pub const OVERLAY: [u8; 3] = [255, 35, 15];
}

/// 默认视图参数, 与论文插图的取值一致.
pub mod view {
    /// 输出宽度.
    pub const SIZE_X: usize = 800;

    /// 输出高度.
    pub const SIZE_Y: usize = 600;

    /// 沿 x 轴的切片位置.
    pub const SLICE_XY: usize = 145;

    /// 沿 z 轴的切片位置.
    pub const SLICE_YZ: usize = 145;

    /// 绕 y 轴旋转角 (度).
    pub const ROTATE_Y_DEG: f64 = 38.0;

    /// 绕 x 轴旋转角 (度).
    pub const ROTATE_X_DEG: f64 = 15.0;

    /// 均匀缩放倍数.
    pub const SCALE: f64 = 0.7;
}
