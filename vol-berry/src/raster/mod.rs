//! 2D 栅格. 行优先, 以 `(行, 列)` = `(y, x)` 索引.

mod core;
mod save;

pub use self::core::GrayRaster;
pub use save::ImgWrite;

/// 打包的 RGB 栅格. 合成结果不携带 alpha 通道.
pub type RgbRaster = image::RgbImage;
