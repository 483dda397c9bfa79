// 该文件是 Huoyan （火眼） 项目的一部分。
// src/pipeline.rs - 推理与汇总流水线
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

use image::RgbImage;
use thiserror::Error;
use tracing::info;

use crate::adapter::{InferenceAdapter, InferenceError};
use crate::model::Engine;
use crate::output::{AnnotatedImage, ExportArtifact, ExportError, package_default, render};
use crate::report::{ClassTally, ReportError, format_summary, tally, total_latency_seconds};

#[derive(Error, Debug)]
pub enum PipelineError {
  #[error("推理错误: {0}")]
  Inference(#[from] InferenceError),
  #[error("汇总错误: {0}")]
  Report(#[from] ReportError),
}

/// 单次请求的结果，请求之间不共享
#[derive(Debug, Clone)]
pub struct Prediction {
  pub summary: String,
  pub annotated: AnnotatedImage,
  pub tally: ClassTally,
  pub latency_seconds: f64,
}

impl Prediction {
  pub fn into_parts(self) -> (String, AnnotatedImage) {
    (self.summary, self.annotated)
  }
}

pub struct Pipeline<'a, E> {
  adapter: InferenceAdapter<'a, E>,
}

impl<'a, E: Engine> Pipeline<'a, E> {
  pub fn new(engine: &'a E) -> Self {
    Self {
      adapter: InferenceAdapter::new(engine),
    }
  }

  pub fn process(
    &self,
    image: &RgbImage,
    confidence_threshold: f32,
    iou_threshold: f32,
  ) -> Result<Prediction, PipelineError> {
    let inference = self
      .adapter
      .infer(image, confidence_threshold, iou_threshold)?;

    let tally = tally(&inference.detections, &inference.class_names)?;
    let latency_seconds = total_latency_seconds(&inference.timing)?;
    let summary = format_summary(&tally, latency_seconds);
    info!("{}", summary);

    let annotated = render(&inference.visualization);

    Ok(Prediction {
      summary,
      annotated,
      tally,
      latency_seconds,
    })
  }

  /// 编码失败只影响导出，已得到的摘要与标注图像仍然有效
  pub fn export(&self, annotated: &AnnotatedImage) -> Result<ExportArtifact, ExportError> {
    package_default(annotated)
  }
}
