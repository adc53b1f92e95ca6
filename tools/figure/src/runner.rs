//! 程序运行函数.

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use utils::loader;
use vol_berry::prelude::*;

pub type CliError = Box<dyn std::error::Error>;
pub type CliResult<T> = Result<T, CliError>;

/// 从 3D 体数据生成带轮廓叠加的论文插图.
#[derive(Debug, Parser)]
#[command(name = "figure", version)]
pub struct Cli {
    /// 体数据文件 (`.nii`, `.nii.gz` 或 `.npy`).
    pub volume: PathBuf,

    /// 输出目录.
    #[arg(long, short, default_value = ".")]
    pub out_dir: PathBuf,

    /// 缓存目录. 缺省时依次尝试 `$VOL_BERRY_CACHE_DIR` 与用户缓存目录.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// 不使用缓存.
    #[arg(long)]
    pub no_cache: bool,

    /// 输出宽度.
    #[arg(long, default_value_t = 800)]
    pub size_x: usize,

    /// 输出高度.
    #[arg(long, default_value_t = 600)]
    pub size_y: usize,

    /// 沿 x 轴的切片位置.
    #[arg(long, default_value_t = 145)]
    pub slice_xy: usize,

    /// 沿 z 轴的切片位置.
    #[arg(long, default_value_t = 145)]
    pub slice_yz: usize,

    /// 绕 y 轴旋转角 (度).
    #[arg(long, default_value_t = 38.0, allow_negative_numbers = true)]
    pub rotate_y: f64,

    /// 绕 x 轴旋转角 (度).
    #[arg(long, default_value_t = 15.0, allow_negative_numbers = true)]
    pub rotate_x: f64,

    /// 均匀缩放倍数.
    #[arg(long, default_value_t = 0.7)]
    pub scale: f64,

    /// 投影插值方式.
    #[arg(long, value_enum, default_value_t = InterpolationArg::Cubic)]
    pub interpolation: InterpolationArg,

    /// 轮廓提取参数预设.
    #[arg(long, value_enum, default_value_t = PresetArg::Corner)]
    pub preset: PresetArg,

    /// 叠加色 (RGB 十六进制).
    #[arg(long, default_value = "ff230f", value_parser = utils::parse_rgb)]
    pub overlay: [u8; 3],

    /// 已渲染好的坐标轴标签图, 尺寸必须与输出一致.
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// 输出调试日志.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// 日志级别.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// 由命令行参数组装流水线配置.
    pub fn config(&self) -> FigureConfig {
        FigureConfig {
            view: ViewSpec {
                size_x: self.size_x,
                size_y: self.size_y,
                slice_xy: self.slice_xy,
                slice_yz: self.slice_yz,
                transform: Affine3::turntable(self.rotate_y, self.rotate_x, self.scale),
                interpolation: self.interpolation.to_core(),
            },
            outline: self.preset.to_core(),
            overlay: self.overlay,
            ..FigureConfig::default()
        }
    }

    /// 选择缓存实现.
    fn cache(&self) -> Box<dyn RenderCache> {
        if self.no_cache {
            return Box::new(NoCache);
        }
        match loader::cache_dir_from_env_or_home(self.cache_dir.as_deref()) {
            Some(dir) => {
                log::info!("Using cache directory {}", dir.display());
                Box::new(FsCache::new(dir))
            }
            None => {
                log::warn!("No cache directory available, caching disabled");
                Box::new(NoCache)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterpolationArg {
    Nearest,
    Linear,
    Cubic,
}

impl InterpolationArg {
    fn to_core(self) -> Interpolation {
        match self {
            Self::Nearest => Interpolation::Nearest,
            Self::Linear => Interpolation::Linear,
            Self::Cubic => Interpolation::Cubic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// 阈值 15, 内部填充 1/15.
    Corner,
    /// 阈值 5, 内部填充 1/30.
    Dim,
}

impl PresetArg {
    fn to_core(self) -> OutlineParams {
        match self {
            Self::Corner => OutlineParams::CORNER,
            Self::Dim => OutlineParams::DIM,
        }
    }
}

/// 实际运行.
pub fn run(cli: &Cli) -> CliResult<()> {
    let volume = loader::volume(&cli.volume)?;
    let labels = loader::labels(cli.labels.as_deref())?;
    log::info!("Loaded {} with shape {:?}", cli.volume.display(), volume.shape());

    let cache = cli.cache();
    let pipeline = FigurePipeline::new(MaxIntensityRenderer::default(), cache.as_ref(), cli.config());
    let figure = pipeline.run(&volume, labels.as_ref())?;

    fs::create_dir_all(&cli.out_dir)?;
    let image_path = cli.out_dir.join("inverse_corner.png");
    let outline_path = cli.out_dir.join("outline.png");
    let combined_path = cli.out_dir.join("combined.png");
    figure.image.save(&image_path)?;
    figure.outline.save(&outline_path)?;
    figure.combined.save(&combined_path)?;

    let written = [image_path.as_path(), outline_path.as_path(), combined_path.as_path()];
    report(io::stdout().lock(), figure.vertical_line, &written)?;
    Ok(())
}

/// 输出运行摘要.
fn report<W: Write>(mut w: W, vertical_line: usize, written: &[&Path]) -> io::Result<()> {
    utils::sep_to(&mut w)?;
    writeln!(w, "Vertical line: {vertical_line}")?;
    for p in written {
        writeln!(w, "Wrote {}", p.display())?;
    }
    utils::sep_to(&mut w)
}

#[cfg(test)]
mod tests {
    use super::{report, Cli, InterpolationArg, PresetArg};
    use clap::Parser;
    use std::path::Path;
    use vol_berry::prelude::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["figure", "vol.nii.gz"]).unwrap();
        assert_eq!(cli.interpolation, InterpolationArg::Cubic);
        assert_eq!(cli.preset, PresetArg::Corner);
        assert_eq!(cli.overlay, [255, 35, 15]);
        assert_eq!(cli.config(), FigureConfig::default());
    }

    #[test]
    fn test_volume_is_required() {
        assert!(Cli::try_parse_from(["figure"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "figure",
            "vol.npy",
            "--preset",
            "dim",
            "--overlay",
            "#00ff00",
            "--slice-xy",
            "10",
            "--rotate-y",
            "-20",
            "--no-cache",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.outline, OutlineParams::DIM);
        assert_eq!(config.overlay, [0, 255, 0]);
        assert_eq!(config.view.slice_xy, 10);
        assert_eq!(config.view.transform, Affine3::turntable(-20.0, 15.0, 0.7));
        assert!(cli.no_cache);
    }

    #[test]
    fn test_report() {
        let mut buf = Vec::new();
        report(&mut buf, 417, &[Path::new("out/outline.png")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("---"));
        assert_eq!(lines[1], "Vertical line: 417");
        assert_eq!(lines[2], "Wrote out/outline.png");
        assert_eq!(lines[3], lines[0]);
    }
}
