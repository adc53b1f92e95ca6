#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 从 3D 标量体数据生成可用于论文插图的 2D 栅格图像:
//! 遮挡后的灰度投影、可见结构的轮廓, 以及两者合成的彩色叠加图.
//!
//! # 注意
//!
//! 1. 该 crate 只处理 3 维体数据, 体素值以 `f32` 保存.
//! 2. 所有核心操作都是单线程、同步的纯函数 (或就地修改).
//!   并行只发生在相互独立的帧之间, 参见 [`pipeline::FigurePipeline`].
//! 3. 投影渲染本身由 [`render::Renderer`] trait 抽象, 核心算法不依赖具体实现.
//!
//! # 模块概览
//!
//! ### 体数据区域遮挡 ✅
//!
//! 把若干轴向半开区间之交所确定的子块填充为给定值, 用来 "切出" 体数据的一个角.
//!
//! 实现位于 `vol-berry/src/volume`.
//!
//! ### 轮廓提取 ✅
//!
//! 二值化, 外部泛洪, 4-邻接边缘检测, 竖直扫描线补缺, 内部填充,
//! 高斯平滑以及量化到 8-bit.
//!
//! 实现位于 `vol-berry/src/outline`.
//!
//! ### 竖直参考线定位 ✅
//!
//! 对投影图中所有非零像素的横坐标取 (四舍五入的) 平均值.
//!
//! 实现位于 `vol-berry/src/locate.rs`.
//!
//! ### 叠加合成 ✅
//!
//! 将灰度底图和轮廓权重图按 "压制底图 / 增强叠加色取最大" 的规则合成为 RGB 图像.
//!
//! 实现位于 `vol-berry/src/composite.rs`.
//!
//! ### 投影渲染 ✅
//!
//! 仿射变换 + 插值的最大强度投影, 作为外部渲染器的一个可运行实现.
//!
//! 实现位于 `vol-berry/src/render`.
//!
//! ### 缓存与流水线 ✅
//!
//! 以体数据名与 `(size_x, size_y, slice_xy, slice_yz)` 为键的可注入缓存,
//! 以及由配置结构驱动的单一流水线.
//!
//! 实现位于 `vol-berry/src/cache.rs` 与 `vol-berry/src/pipeline.rs`.

/// 二维索引 `(行, 列)`, 即 `(y, x)`.
pub type Idx2d = (usize, usize);

/// 三维索引 `(x, y, z)`.
pub type Idx3d = (usize, usize, usize);

pub mod consts;

mod error;

pub use error::{FigureError, FigureResult, OutlineDefect};

pub mod volume;

pub mod raster;

pub mod outline;

pub mod locate;

pub mod composite;

pub mod render;

pub mod cache;

pub mod pipeline;

pub mod prelude;

pub use raster::{GrayRaster, ImgWrite, RgbRaster};
pub use volume::{Region, RegionSet, Volume};
