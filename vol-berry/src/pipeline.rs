//! 插图流水线: 遮挡, 投影, 定位参考线, 提取轮廓, 合成.
//!
//! 所有可调参数都集中在 [`FigureConfig`] 中, 不同的插图风格只是不同的配置.

use crate::cache::{CacheKey, RasterKind, RenderCache};
use crate::composite::OutlineCompositor;
use crate::consts::{composite, view};
use crate::outline::{Outline, OutlineExtractor, OutlineParams};
use crate::render::{Affine3, Interpolation, ProjectionRequest, Renderer};
use crate::volume::MaskPlan;
use crate::{locate, FigureResult, GrayRaster, RgbRaster, Volume};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 视图参数: 输出尺寸, 切片位置与投影方式.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewSpec {
    /// 输出宽度.
    pub size_x: usize,
    /// 输出高度.
    pub size_y: usize,
    /// 沿 x 轴的切片位置.
    pub slice_xy: usize,
    /// 沿 z 轴的切片位置.
    pub slice_yz: usize,
    /// 以体数据中心为原点的仿射变换.
    pub transform: Affine3,
    /// 插值方式. 定位竖直参考线时总是使用最近邻.
    pub interpolation: Interpolation,
}

impl Default for ViewSpec {
    /// 论文插图的视图: 800x600, 切片 145/145, 绕 y 轴 38 度, 绕 x 轴 15 度, 缩放 0.7.
    fn default() -> Self {
        Self {
            size_x: view::SIZE_X,
            size_y: view::SIZE_Y,
            slice_xy: view::SLICE_XY,
            slice_yz: view::SLICE_YZ,
            transform: Affine3::turntable(view::ROTATE_Y_DEG, view::ROTATE_X_DEG, view::SCALE),
            interpolation: Interpolation::Cubic,
        }
    }
}

impl ViewSpec {
    /// 体数据名为 `volume` 时的缓存键.
    #[inline]
    pub fn cache_key(&self, volume: &str) -> CacheKey {
        CacheKey {
            volume: volume.to_owned(),
            size_x: self.size_x,
            size_y: self.size_y,
            slice_xy: self.slice_xy,
            slice_yz: self.slice_yz,
        }
    }

    /// 以给定插值方式构造投影请求.
    #[inline]
    pub fn request(&self, interpolation: Interpolation) -> ProjectionRequest {
        ProjectionRequest::new(self.size_x, self.size_y, self.transform, interpolation)
    }

    /// 替换切片位置.
    #[inline]
    pub fn with_slices(mut self, slice_xy: usize, slice_yz: usize) -> Self {
        self.slice_xy = slice_xy;
        self.slice_yz = slice_yz;
        self
    }
}

/// 流水线的全部配置.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FigureConfig {
    /// 视图.
    pub view: ViewSpec,
    /// 轮廓提取参数.
    pub outline: OutlineParams,
    /// 叠加色.
    pub overlay: [u8; 3],
    /// 底图亮度提升倍数.
    pub boost: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            view: ViewSpec::default(),
            outline: OutlineParams::CORNER,
            overlay: composite::OVERLAY,
            boost: composite::BOOST,
        }
    }
}

/// 一帧插图的全部产物.
#[derive(Clone, Debug)]
pub struct Figure {
    /// 反向角投影, 即合成的底图.
    pub image: GrayRaster,
    /// 8-bit 轮廓图.
    pub outline: GrayRaster,
    /// 彩色合成图.
    pub combined: RgbRaster,
    /// 竖直参考线所在的列.
    pub vertical_line: usize,
}

/// 插图流水线.
///
/// 渲染器和缓存都是注入的协作者. 每种遮挡方案都在源体数据的一份拷贝上执行,
/// 源体数据本身从不被修改.
#[derive(Debug)]
pub struct FigurePipeline<R, C> {
    renderer: R,
    cache: C,
    config: FigureConfig,
}

impl<R: Renderer, C: RenderCache> FigurePipeline<R, C> {
    /// 创建流水线.
    pub fn new(renderer: R, cache: C, config: FigureConfig) -> Self {
        Self {
            renderer,
            cache,
            config,
        }
    }

    /// 配置.
    #[inline]
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// 缓存.
    #[inline]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// 在 `volume` 的拷贝上执行遮挡方案 `plan`, 然后投影.
    fn render_plan(&self, volume: &Volume, plan: MaskPlan, interpolation: Interpolation) -> FigureResult<GrayRaster> {
        let view = &self.config.view;
        let mut masked = volume.clone();
        masked.apply_plan(plan, view.slice_xy, view.slice_yz)?;
        self.renderer.project(&masked, &view.request(interpolation))
    }

    /// 先查缓存, 未命中时渲染并写回.
    fn cached_plan(&self, volume: &Volume, kind: RasterKind, plan: MaskPlan) -> FigureResult<GrayRaster> {
        let key = self.config.view.cache_key(volume.name());
        if let Some(raster) = self.cache.load_raster(kind, &key)? {
            return Ok(raster);
        }
        let raster = self.render_plan(volume, plan, self.config.view.interpolation)?;
        self.cache.store_raster(kind, &key, &raster)?;
        Ok(raster)
    }

    /// 角切片投影: 只保留两张相交切片构成的角.
    pub fn corner_slices(&self, volume: &Volume) -> FigureResult<GrayRaster> {
        self.cached_plan(volume, RasterKind::CornerSlices, MaskPlan::CornerSlices)
    }

    /// 反向角投影: 挖去体数据的一个角, 露出内部.
    pub fn inverse_corner(&self, volume: &Volume) -> FigureResult<GrayRaster> {
        self.cached_plan(volume, RasterKind::InverseCorner, MaskPlan::InverseCorner)
    }

    /// 竖直参考线: 只保留两张切片的交线, 以最近邻插值投影后定位.
    pub fn vertical_line(&self, volume: &Volume) -> FigureResult<usize> {
        let key = self.config.view.cache_key(volume.name());
        if let Some(line) = self.cache.load_line(&key)? {
            return Ok(line);
        }
        let projection = self.render_plan(volume, MaskPlan::VerticalLine, Interpolation::Nearest)?;
        let line = locate::vertical_line(&projection)?;
        self.cache.store_line(&key, line)?;
        Ok(line)
    }

    /// 对角切片投影提取轮廓.
    pub fn outline(
        &self,
        volume: &Volume,
        vertical_line: usize,
        labels: Option<&GrayRaster>,
    ) -> FigureResult<Outline> {
        let projection = self.corner_slices(volume)?;
        OutlineExtractor::new(self.config.outline).extract(&projection, vertical_line, labels)
    }

    /// 以配置中的叠加色合成底图与轮廓.
    pub fn composite(&self, image: &GrayRaster, outline: &GrayRaster) -> FigureResult<RgbRaster> {
        OutlineCompositor::new(self.config.overlay, self.config.boost).composite(image, outline)
    }

    /// 完整运行一帧.
    pub fn run(&self, volume: &Volume, labels: Option<&GrayRaster>) -> FigureResult<Figure> {
        let vertical_line = self.vertical_line(volume)?;
        let image = self.inverse_corner(volume)?;
        let outline = self.outline(volume, vertical_line, labels)?.raster;
        let combined = self.composite(&image, &outline)?;
        log::info!(
            "Rendered figure at slices ({}, {}), vertical line {vertical_line}",
            self.config.view.slice_xy,
            self.config.view.slice_yz
        );
        Ok(Figure {
            image,
            outline,
            combined,
            vertical_line,
        })
    }
}

#[cfg(feature = "rayon")]
impl<R: Renderer + Sync, C: RenderCache + Sync> FigurePipeline<R, C> {
    /// 并行渲染多帧, 每帧对应一组 `(slice_xy, slice_yz)`. 结果与 `frames` 一一对应.
    ///
    /// 帧之间互相独立, 共享同一个渲染器与缓存. 任意一帧失败则返回错误.
    pub fn par_run_frames(&self, volume: &Volume, frames: &[(usize, usize)]) -> FigureResult<Vec<Figure>> {
        frames
            .par_iter()
            .map(|&(slice_xy, slice_yz)| {
                let config = FigureConfig {
                    view: self.config.view.with_slices(slice_xy, slice_yz),
                    ..self.config
                };
                FigurePipeline::new(&self.renderer, &self.cache, config).run(volume, None)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FigureConfig, FigurePipeline, ViewSpec};
    use crate::cache::{MemoryCache, NoCache, RasterKind, RenderCache};
    use crate::render::{Affine3, Interpolation, MaxIntensityRenderer};
    use crate::{FigureError, OutlineDefect, Volume};
    use ndarray::s;

    /// 64^3 的体数据, 中心是边长 20 的立方体 `[22, 42)^3`.
    fn cube() -> Volume {
        let mut v = Volume::zeros((64, 64, 64));
        v.data_mut().slice_mut(s![22..42, 22..42, 22..42]).fill(1.0);
        v
    }

    fn config() -> FigureConfig {
        FigureConfig {
            view: ViewSpec {
                size_x: 64,
                size_y: 64,
                slice_xy: 32,
                slice_yz: 32,
                transform: Affine3::identity(),
                interpolation: Interpolation::Linear,
            },
            ..FigureConfig::default()
        }
    }

    fn pipeline<C: RenderCache>(cache: C) -> FigurePipeline<MaxIntensityRenderer, C> {
        FigurePipeline::new(MaxIntensityRenderer::default(), cache, config())
    }

    #[test]
    fn test_default_view() {
        let view = ViewSpec::default();
        assert_eq!((view.size_x, view.size_y), (800, 600));
        assert_eq!((view.slice_xy, view.slice_yz), (145, 145));
        assert_eq!(view.transform, Affine3::turntable(38.0, 15.0, 0.7));
    }

    #[test]
    fn test_projections_of_cube() {
        let v = cube();
        let p = pipeline(NoCache);

        // 两张切片的交线在 x = 32 处.
        assert_eq!(p.vertical_line(&v).unwrap(), 32);

        // 角切片: x = 32 平面 (z <= 32) 与 z = 32 平面 (x >= 32),
        // 沿 z 轴投影后只剩 x 属于 [32, 42) 的部分.
        let corner = p.corner_slices(&v).unwrap();
        assert_eq!(corner.count_nonzero(), 10 * 20);
        assert_eq!(corner[(22, 32)], 255);
        assert_eq!(corner[(22, 31)], 0);

        // 挖去一个角后, 沿 z 轴仍能看到完整的立方体截面.
        let inverse = p.inverse_corner(&v).unwrap();
        assert_eq!(inverse.count_nonzero(), 20 * 20);

        // 源体数据不被修改.
        assert_eq!(v, cube());
    }

    /// 端到端: 平滑前, 填充区域 (参考线 + 内部) 恰好等于剪影面积,
    /// 边缘环恰好等于剪影的 4-邻接外周长. 平滑并量化后, 非零像素数介于
    /// `面积 + 周长` 与 "剪影向外膨胀 3 像素" 的面积之间.
    #[test]
    fn test_end_to_end_outline_tolerance() {
        let v = cube();
        let p = pipeline(NoCache);
        let (area, perimeter) = (10 * 20, 2 * 10 + 2 * 20);

        let outline = p.outline(&v, 37, None).unwrap();
        let edges = outline.trace.iter().filter(|x| **x == 1.0).count();
        assert_eq!(outline.interior + 20, area);
        assert_eq!(edges, perimeter + 20);
        assert_eq!(
            outline.trace.iter().filter(|x| **x != 0.0).count(),
            area + perimeter
        );

        let nonzero = outline.raster.count_nonzero();
        let dilated = (10 + 6) * (20 + 6);
        assert!(
            (area + perimeter..=dilated).contains(&nonzero),
            "nonzero = {nonzero}"
        );
    }

    /// 轮廓非零像素数应落在的区间, 见 `test_end_to_end_outline_tolerance`.
    fn outline_bounds(width: usize, height: usize) -> std::ops::RangeInclusive<usize> {
        let (area, perimeter) = (width * height, 2 * (width + height));
        area + perimeter..=(width + 6) * (height + 6)
    }

    /// 恒等视图下, 竖直参考线恰好压在角切片剪影的最左列上, 左侧种子落在剪影外.
    #[test]
    fn test_run_with_located_line_is_not_closable() {
        let p = pipeline(NoCache);
        assert!(matches!(
            p.run(&cube(), None),
            Err(FigureError::OutlineNotClosable(OutlineDefect::SeedOutsideSilhouette((21, 31))))
        ));
    }

    #[test]
    fn test_run_uses_cache() {
        let v = cube();
        let cache = MemoryCache::new();
        let key = config().view.cache_key(v.name());
        cache.store_line(&key, 37).unwrap();

        let p = pipeline(&cache);
        let figure = p.run(&v, None).unwrap();
        assert_eq!(figure.vertical_line, 37);
        assert_eq!(figure.image.count_nonzero(), 400);
        assert_eq!(figure.combined.dimensions(), (64, 64));
        assert_eq!(cache.raster_count(), 2);

        // 轮廓覆盖 10x20 的剪影, 且与单独提取的结果一致.
        assert!(outline_bounds(10, 20).contains(&figure.outline.count_nonzero()));
        assert_eq!(figure.outline, p.outline(&v, 37, None).unwrap().raster);

        // 第二次运行完全由缓存提供投影.
        let again = p.run(&v, None).unwrap();
        assert_eq!(again.outline, figure.outline);
        assert!(cache.load_raster(RasterKind::CornerSlices, &key).unwrap().is_some());

        // 轮廓像素被染成叠加色, 远离轮廓处保持底图的灰度.
        let [r, g, b] = figure.combined.get_pixel(30, 22).0;
        assert!(r > g && g >= b);
        assert_eq!(figure.combined.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_cache_separates_volumes() {
        let small = cube().with_name("small");
        let mut large = Volume::zeros((64, 64, 64)).with_name("large");
        large.data_mut().slice_mut(s![10..54, 10..54, 10..54]).fill(1.0);

        let cache = MemoryCache::new();
        let p = pipeline(&cache);
        assert_eq!(p.inverse_corner(&small).unwrap().count_nonzero(), 20 * 20);
        assert_eq!(p.inverse_corner(&large).unwrap().count_nonzero(), 44 * 44);
        assert_eq!(p.inverse_corner(&small).unwrap().count_nonzero(), 20 * 20);
        assert_eq!(cache.raster_count(), 2);
    }

    #[test]
    fn test_slice_out_of_range() {
        let v = cube();
        let mut config = config();
        config.view.slice_yz = 64;
        let p = FigurePipeline::new(MaxIntensityRenderer::default(), NoCache, config);
        assert!(matches!(
            p.vertical_line(&v),
            Err(FigureError::SliceOutOfRange { axis: 2, pos: 64, extent: 64 })
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_run_frames() {
        let v = cube();
        let frames = [(32, 32), (30, 34)];

        // 参考线取剪影内部的列.
        let cache = MemoryCache::new();
        for (&(slice_xy, slice_yz), line) in frames.iter().zip([37, 36]) {
            let key = config().view.with_slices(slice_xy, slice_yz).cache_key(v.name());
            cache.store_line(&key, line).unwrap();
        }
        let figures = pipeline(&cache).par_run_frames(&v, &frames).unwrap();
        let lines: Vec<usize> = figures.iter().map(|f| f.vertical_line).collect();
        assert_eq!(lines, vec![37, 36]);
        assert!(figures.iter().all(|f| f.image.shape() == (64, 64)));

        // 剪影分别为 x 属于 [32, 42) 和 [30, 42), y 属于 [22, 42).
        assert!(outline_bounds(10, 20).contains(&figures[0].outline.count_nonzero()));
        assert!(outline_bounds(12, 20).contains(&figures[1].outline.count_nonzero()));
        assert!(figures[1].outline.count_nonzero() > figures[0].outline.count_nonzero());

        // 自行定位的参考线都压在剪影边缘上.
        assert!(matches!(
            pipeline(NoCache).par_run_frames(&v, &frames),
            Err(FigureError::OutlineNotClosable(OutlineDefect::SeedOutsideSilhouette(_)))
        ));
    }
}
