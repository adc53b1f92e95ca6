//! 论文插图生成工具.
//!
//! 读取一个 3D 体数据, 生成反向角投影、轮廓图以及两者的彩色合成图.

mod runner;

use clap::Parser;

fn main() -> runner::CliResult<()> {
    let cli = runner::Cli::parse();
    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level())
        .init()?;
    runner::run(&cli)
}
