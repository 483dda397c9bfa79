// 该文件是 Huoyan （火眼） 项目的一部分。
// src/model.rs - 检测引擎接口与数据模型
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

use std::collections::BTreeMap;
use std::sync::Arc;

use image::RgbImage;

use crate::frame::VisualFrame;

/// 外部检测引擎：给定图像与两个阈值，返回检测结果、耗时与可视化图像。
///
/// 阈值过滤与 NMS 完全由引擎负责，下游只信任其输出。
pub trait Engine {
  type Error: std::error::Error + Send + Sync + 'static;

  fn predict(
    &self,
    image: &RgbImage,
    confidence_threshold: f32,
    iou_threshold: f32,
  ) -> Result<EngineOutput, Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "replay_engine", derive(serde::Deserialize))]
pub struct Detection {
  pub class_id: u32,
  pub confidence: f32,
  pub bbox: [f32; 4], // [x_min, y_min, x_max, y_max]
}

/// 类别编号到显示名称的映射，随模型加载，只读
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNameTable {
  names: BTreeMap<u32, String>,
}

impl ClassNameTable {
  pub fn label(&self, class_id: u32) -> Option<&str> {
    self.names.get(&class_id).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl From<BTreeMap<u32, String>> for ClassNameTable {
  fn from(names: BTreeMap<u32, String>) -> Self {
    Self { names }
  }
}

impl<S: Into<String>> FromIterator<(u32, S)> for ClassNameTable {
  fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
    Self {
      names: iter.into_iter().map(|(id, name)| (id, name.into())).collect(),
    }
  }
}

/// 各阶段耗时（毫秒），保持记录顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingBreakdown {
  stages: Vec<(String, f64)>,
}

impl TimingBreakdown {
  pub fn new() -> Self {
    Self::default()
  }

  /// 记录一个阶段的耗时，同名阶段覆盖旧值
  pub fn record(&mut self, stage: impl Into<String>, millis: f64) {
    let stage = stage.into();
    match self.stages.iter_mut().find(|(name, _)| *name == stage) {
      Some(entry) => entry.1 = millis,
      None => self.stages.push((stage, millis)),
    }
  }

  pub fn get(&self, stage: &str) -> Option<f64> {
    self
      .stages
      .iter()
      .find(|(name, _)| name == stage)
      .map(|(_, millis)| *millis)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
    self.stages.iter().map(|(name, millis)| (name.as_str(), *millis))
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TimingBreakdown {
  fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
    let mut timing = TimingBreakdown::new();
    for (stage, millis) in iter {
      timing.record(stage, millis);
    }
    timing
  }
}

/// 引擎单次调用的完整输出
#[derive(Debug, Clone)]
pub struct EngineOutput {
  pub detections: Vec<Detection>,
  pub class_names: Arc<ClassNameTable>,
  pub timing: TimingBreakdown,
  pub visualization: VisualFrame,
}

mod cache;
pub use self::cache::ModelCache;

#[cfg(feature = "replay_engine")]
mod replay;
#[cfg(feature = "replay_engine")]
pub use self::replay::{ReplayEngine, ReplayEngineBuilder, ReplayEngineError};
