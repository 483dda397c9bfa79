// 该文件是 Huoyan （火眼） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use url::Url;

use huoyan::{
  FromUrl, Pipeline,
  input::ImageFileInput,
  model::{ModelCache, ReplayEngine, ReplayEngineBuilder},
  output::SaveArtifactOutput,
};

/// 火眼：火焰/烟雾及通用目标检测结果汇总
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测引擎地址，例如 replay:///path/to/detections.json
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 输入图像，例如 image:///path/to/photo.jpg
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 标注图像导出路径；以 / 结尾时写入该目录下的 prediction.png
  #[arg(long, value_name = "OUTPUT")]
  pub output: Option<Url>,
  /// 置信度阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.20", value_name = "THRESHOLD")]
  pub confidence: f32,
  /// IoU 阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.5", value_name = "THRESHOLD")]
  pub iou: f32,
  /// 标签字体文件（TTF），不指定时只绘制边框
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型地址: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("置信度阈值: {}", args.confidence);
  info!("IoU 阈值: {}", args.iou);

  let models: ModelCache<ReplayEngine> = ModelCache::new();
  let engine = models.get_or_load(&args.model, |url| {
    ReplayEngineBuilder::from_url(url)?
      .font(args.font.clone())
      .build()
  })?;

  let image = ImageFileInput::from_url(&args.input)?.into_image();
  let pipeline = Pipeline::new(engine.as_ref());

  let prediction = pipeline.process(&image, args.confidence, args.iou)?;
  println!("{}", prediction.summary);

  match &args.output {
    Some(output) => {
      let output = SaveArtifactOutput::from_url(output)?;
      let artifact = pipeline.export(&prediction.annotated)?;
      let path = output.save(&artifact)?;
      info!("标注图像已导出: {}", path.display());
    }
    None => warn!("未指定输出路径，跳过导出"),
  }

  Ok(())
}
