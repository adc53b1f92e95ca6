//! 栅格的持久化存储.

use super::{GrayRaster, RgbRaster};
use image::ImageResult;
use std::path::Path;

/// 表明一个可以按原样持久化存储的栅格.
///
/// 格式由路径扩展名决定; 缓存和命令行工具都使用无损的 PNG.
pub trait ImgWrite {
    /// 将栅格保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

impl ImgWrite for GrayRaster {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image().save(path)
    }
}

impl ImgWrite for RgbRaster {
    #[inline]
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        image::RgbImage::save(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::ImgWrite;
    use crate::GrayRaster;

    #[test]
    fn test_save_and_open_png() {
        let mut r = GrayRaster::zeros((4, 5));
        r[(3, 1)] = 200;
        r[(0, 4)] = 17;
        let path = std::env::temp_dir().join(format!("vol-berry-save-{}.png", std::process::id()));
        r.save(&path).unwrap();
        assert_eq!(GrayRaster::open(&path).unwrap(), r);
        std::fs::remove_file(path).unwrap();
    }
}
