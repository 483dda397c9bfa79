// 该文件是 Huoyan （火眼） 项目的一部分。
// src/adapter.rs - 推理适配器
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
use tracing::{debug, error};

use crate::model::{Engine, EngineOutput};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum InferenceError {
  #[error("{name} 阈值超出范围 [0, 1]: {value}")]
  InvalidThreshold { name: &'static str, value: f32 },
  #[error("推理失败: {0}")]
  InferenceFailed(#[source] BoxError),
}

fn check_threshold(name: &'static str, value: f32) -> Result<f32, InferenceError> {
  if (0.0..=1.0).contains(&value) {
    Ok(value)
  } else {
    Err(InferenceError::InvalidThreshold { name, value })
  }
}

/// 调用外部检测引擎。引擎由外层持有（通常来自 `ModelCache`），这里只借用。
pub struct InferenceAdapter<'a, E> {
  engine: &'a E,
}

impl<'a, E: Engine> InferenceAdapter<'a, E> {
  pub fn new(engine: &'a E) -> Self {
    Self { engine }
  }

  /// 校验阈值后调用引擎，原样交出引擎输出；不缓存结果，不重试
  pub fn infer(
    &self,
    image: &RgbImage,
    confidence_threshold: f32,
    iou_threshold: f32,
  ) -> Result<EngineOutput, InferenceError> {
    let confidence_threshold = check_threshold("confidence", confidence_threshold)?;
    let iou_threshold = check_threshold("iou", iou_threshold)?;
    debug!(
      "调用检测引擎: {}x{}, 置信度阈值 {}, IoU 阈值 {}",
      image.width(),
      image.height(),
      confidence_threshold,
      iou_threshold
    );

    self
      .engine
      .predict(image, confidence_threshold, iou_threshold)
      .map_err(|e| {
        error!("检测引擎出错: {}", e);
        InferenceError::InferenceFailed(Box::new(e))
      })
  }
}
