//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::{FigureError, FigureResult, OutlineDefect};

pub use crate::raster::{GrayRaster, ImgWrite, RgbRaster};
pub use crate::volume::{MaskPlan, Region, RegionSet, Volume};

pub use crate::outline::{merge_labels, Outline, OutlineExtractor, OutlineMask, OutlineParams};

pub use crate::locate::vertical_line;

pub use crate::composite::{composite, OutlineCompositor, WeightMap};

pub use crate::render::{Affine3, Interpolation, MaxIntensityRenderer, ProjectionRequest, Renderer};

pub use crate::cache::{CacheKey, FsCache, MemoryCache, NoCache, RasterKind, RenderCache};

pub use crate::pipeline::{Figure, FigureConfig, FigurePipeline, ViewSpec};

pub use crate::consts::label::{BACKGROUND, EXTERIOR, FOREGROUND};
