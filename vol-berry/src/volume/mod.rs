//! 3D 标量体数据及其区域遮挡操作.

use std::ops::{Index, IndexMut};
use std::path::Path;

use ndarray::{Array3, ArrayView3, ArrayViewMut3, Axis, Ix3};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

use crate::{FigureError, FigureResult, Idx3d};

mod mask;
mod plan;
mod region;

pub use plan::MaskPlan;
pub use region::{Region, RegionSet};

/// 3D 标量体数据. 体素值以 `f32` 保存, 按 `(x, y, z)` 索引.
///
/// 轴顺序与 nifti 的原生布局一致, 因此读取时不做任何轴置换.
/// 形状在创建后固定, 数据可就地修改.
///
/// `name` 用于区分缓存, 由 [`Volume::open`] 设置为去掉扩展名的文件名.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f32>,
    name: String,
}

impl Index<Idx3d> for Volume {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for Volume {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Array3<f32>> for Volume {
    #[inline]
    fn from(data: Array3<f32>) -> Self {
        Self {
            data,
            name: String::new(),
        }
    }
}

impl Volume {
    /// 创建形状为 `(x, y, z)` 的全零体数据.
    #[inline]
    pub fn zeros(shape: Idx3d) -> Self {
        Self::from(Array3::zeros(shape))
    }

    /// 设置名字.
    #[inline]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// 名字. 未命名时为空串.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 打开体数据文件. 支持 nifti (`.nii`, `.nii.gz`) 和 numpy (`.npy`) 格式.
    ///
    /// - 文件不存在时返回 `Err(FigureError::VolumeNotFound)`;
    /// - 扩展名无法识别时返回 `Err(FigureError::UnsupportedFormat)`;
    /// - 数据不是三维 (或末维为 1 的四维) 时返回 `Err(FigureError::NotThreeDimensional)`.
    pub fn open<P: AsRef<Path>>(path: P) -> FigureResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FigureError::VolumeNotFound(path.to_owned()));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let lower = file_name.to_ascii_lowercase();
        let Some(ext) = [".nii.gz", ".nii", ".npy"].into_iter().find(|e| lower.ends_with(e)) else {
            return Err(FigureError::UnsupportedFormat(path.to_owned()));
        };

        let data = if ext == ".npy" {
            ndarray_npy::read_npy::<_, Array3<f32>>(path)?
        } else {
            Self::read_nifti(path)?
        };
        log::debug!("Loaded volume {:?} from {}", data.dim(), path.display());
        let name = &file_name[..file_name.len() - ext.len()];
        Ok(Self::from(data).with_name(name))
    }

    fn read_nifti(path: &Path) -> FigureResult<Array3<f32>> {
        let obj = ReaderOptions::new().read_file(path)?;

        // [W, H, z] 原样保留, 即 (x, y, z).
        let mut data = obj.into_volume().into_ndarray::<f32>()?;

        // 单时间点的 4D 文件退化为 3D.
        while data.ndim() > 3 && data.shape().last() == Some(&1) {
            let last = Axis(data.ndim() - 1);
            data = data.index_axis_move(last, 0);
        }
        let dims = data.shape().to_vec();
        data.into_dimensionality::<Ix3>()
            .map_err(|_| FigureError::NotThreeDimensional(dims))
    }

    /// 形状 `(x, y, z)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 第 `axis` 轴的长度. 越界时 panic.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.data.len_of(Axis(axis))
    }

    /// 体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 检查索引是否合法.
    #[inline]
    pub fn check(&self, (x0, y0, z0): Idx3d) -> bool {
        let (x, y, z) = self.shape();
        x0 < x && y0 < y && z0 < z
    }

    /// 获取给定位置的体素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<f32> {
        self.data.get(pos).copied()
    }

    /// 统计值等于 `value` 的体素个数.
    pub fn count(&self, value: f32) -> usize {
        self.data.iter().filter(|v| **v == value).count()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut3<'_, f32> {
        self.data.view_mut()
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array3<f32> {
        self.data
    }
}
