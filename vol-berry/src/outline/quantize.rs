//! 浮点栅格到 8-bit 的线性量化.

use crate::GrayRaster;
use itertools::{Itertools, MinMaxResult};
use ndarray::Array2;
use ordered_float::OrderedFloat;

/// 把 `raster` 的 `[min, max]` 线性映射到 `[0, 255]` 并四舍五入.
///
/// 所有像素相等 (包括空栅格) 时输出全 0.
pub(crate) fn rescale_to_u8(raster: &Array2<f32>) -> GrayRaster {
    let (min, max) = match raster.iter().map(|v| OrderedFloat(*v)).minmax() {
        MinMaxResult::MinMax(min, max) if min < max => (min.0, max.0),
        _ => return GrayRaster::zeros(raster.dim()),
    };
    let scale = f32::from(u8::MAX) / (max - min);
    GrayRaster::from(raster.mapv(|v| ((v - min) * scale).round().clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::rescale_to_u8;
    use ndarray::{array, Array2};

    #[test]
    fn test_rescale_full_range() {
        let r = rescale_to_u8(&array![[0.5f32, 1.0], [0.75, 0.5]]);
        assert_eq!(r.into_raw(), array![[0u8, 255], [128, 0]]);
    }

    #[test]
    fn test_constant_raster_maps_to_zero() {
        let r = rescale_to_u8(&Array2::from_elem((2, 3), 0.3f32));
        assert_eq!(r.count_nonzero(), 0);
        assert_eq!(r.shape(), (2, 3));

        let r = rescale_to_u8(&Array2::zeros((1, 1)));
        assert_eq!(r.count_nonzero(), 0);
    }
}
