//! 灰度栅格的核心结构.

use crate::{FigureError, FigureResult, Idx2d};
use image::{GrayImage, Luma};
use ndarray::iter::{Iter, IterMut};
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Ix2};
use std::ops::{Index, IndexMut};
use std::path::Path;

/// 拥有所有权的 8-bit 灰度栅格.
///
/// 渲染器的投影结果、轮廓图和坐标轴标签图都以该结构表示.
/// 一旦由上一阶段产出, 下一阶段只读取它.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrayRaster {
    data: Array2<u8>,
}

impl Index<Idx2d> for GrayRaster {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for GrayRaster {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Array2<u8>> for GrayRaster {
    #[inline]
    fn from(data: Array2<u8>) -> Self {
        Self { data }
    }
}

impl From<&GrayImage> for GrayRaster {
    fn from(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let data = Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            img.get_pixel(x as u32, y as u32).0[0]
        });
        Self { data }
    }
}

impl GrayRaster {
    /// 创建形状为 `(高, 宽)` 的全黑栅格.
    #[inline]
    pub fn zeros(shape: Idx2d) -> Self {
        Self {
            data: Array2::zeros(shape),
        }
    }

    /// 从图片文件读取, 任何颜色格式都会被转换为 8-bit 灰度.
    pub fn open<P: AsRef<Path>>(path: P) -> FigureResult<Self> {
        let img = image::open(path.as_ref())?.to_luma8();
        Ok(Self::from(&img))
    }

    /// 转换为 `image` crate 的灰度图.
    pub fn to_gray_image(&self) -> GrayImage {
        let (height, width) = self.shape();
        let mut buf = GrayImage::new(width as u32, height as u32);
        for ((h, w), &pix) in self.indexed_iter() {
            buf.put_pixel(w as u32, h as u32, Luma([pix]));
        }
        buf
    }

    /// 栅格的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 栅格的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 栅格的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 像素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断一个索引是否合法 (未越界).
    #[inline]
    pub fn check(&self, (h, w): Idx2d) -> bool {
        let (h_len, w_len) = self.shape();
        h < h_len && w < w_len
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&u8> {
        self.data.get(pos)
    }

    /// 获取可以迭代像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, u8, Ix2> {
        self.data.iter()
    }

    /// 获取可以迭代并修改像素的迭代器.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, u8, Ix2> {
        self.data.iter_mut()
    }

    /// 以行优先规则, 获取能迭代所有 `(索引, 像素值)` 的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
        self.data.indexed_iter()
    }

    /// 非零像素个数.
    #[inline]
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&p| p != 0).count()
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    /// 获得底层数据的一份可变 shallow copy.
    #[inline]
    pub fn array_view_mut(&mut self) -> ArrayViewMut2<'_, u8> {
        self.data.view_mut()
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array2<u8> {
        self.data
    }

    /// 检查 `other` 与自身形状一致, 否则返回 `Err(FigureError::ShapeMismatch)`.
    pub fn ensure_same_shape(&self, other: &GrayRaster) -> FigureResult<()> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(FigureError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            })
        }
    }
}
