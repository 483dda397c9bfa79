// 该文件是 Huoyan （火眼） 项目的一部分。
// src/model/replay.rs - 回放检测引擎
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
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{ChannelOrder, VisualFrame},
  model::{ClassNameTable, Detection, Engine, EngineOutput, TimingBreakdown},
  output::draw::Draw,
};

/// 回放引擎：从 JSON 记录中读取原始检测结果，按请求阈值过滤并绘制。
///
/// 记录格式：
/// ```json
/// {
///   "names": { "0": "fire", "1": "smoke" },
///   "detections": [ { "class_id": 0, "confidence": 0.9, "bbox": [0.1, 0.1, 0.4, 0.5] } ],
///   "speed": { "preprocess": 1.5, "inference": 40.0, "postprocess": 2.0 }
/// }
/// ```
/// `bbox` 为归一化坐标；`speed` 可省略，省略时按实际耗时计时。
#[derive(Debug)]
pub struct ReplayEngine {
  class_names: Arc<ClassNameTable>,
  detections: Vec<Detection>,
  speed: Option<TimingBreakdown>,
  draw: Draw,
}

#[derive(Error, Debug)]
pub enum ReplayEngineError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(#[from] std::io::Error),
  #[error("检测记录解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
  #[error("字体加载错误: {0}")]
  FontError(String),
  #[error("输入图像为空: {0}x{1}")]
  EmptyImage(u32, u32),
}

#[derive(Deserialize)]
struct ReplayRecord {
  names: BTreeMap<u32, String>,
  #[serde(default)]
  detections: Vec<Detection>,
  #[serde(default)]
  speed: Option<BTreeMap<String, f64>>,
}

pub struct ReplayEngineBuilder {
  record_path: PathBuf,
  font_path: Option<PathBuf>,
}

impl FromUrlWithScheme for ReplayEngineBuilder {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayEngineBuilder {
  type Error = ReplayEngineError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ReplayEngineError::ModelPathError(format!(
        "模型路径必须使用 {} 方案, 实际为 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(Self::new(url.path()))
  }
}

impl ReplayEngineBuilder {
  pub fn new(record_path: impl Into<PathBuf>) -> Self {
    Self {
      record_path: record_path.into(),
      font_path: None,
    }
  }

  /// 标签字体；不设置时只绘制边框
  pub fn font(mut self, font_path: Option<PathBuf>) -> Self {
    self.font_path = font_path;
    self
  }

  pub fn build(self) -> Result<ReplayEngine, ReplayEngineError> {
    info!("加载检测记录: {}", self.record_path.display());
    let data = std::fs::read(&self.record_path)?;
    let mut engine = ReplayEngine::from_json(&data)?;

    if let Some(font_path) = &self.font_path {
      engine.draw = load_font(font_path)?;
    }

    info!(
      "检测记录加载完成: {} 个类别, {} 个候选框",
      engine.class_names.len(),
      engine.detections.len()
    );
    Ok(engine)
  }
}

fn load_font(path: &Path) -> Result<Draw, ReplayEngineError> {
  let font_data = std::fs::read(path)?;
  let font = ab_glyph::FontArc::try_from_vec(font_data)
    .map_err(|e| ReplayEngineError::FontError(format!("{}: {}", path.display(), e)))?;
  Ok(Draw::default().with_font(font))
}

impl ReplayEngine {
  pub fn from_json(data: &[u8]) -> Result<Self, ReplayEngineError> {
    let record: ReplayRecord = serde_json::from_slice(data)?;
    debug!("检测记录: {} 个候选框", record.detections.len());

    Ok(Self {
      class_names: Arc::new(ClassNameTable::from(record.names)),
      detections: record.detections,
      speed: record.speed.map(|speed| speed.into_iter().collect()),
      draw: Draw::default(),
    })
  }

  pub fn class_names(&self) -> &Arc<ClassNameTable> {
    &self.class_names
  }

  /// 置信度过滤与按类别的贪心 NMS，结果按置信度降序
  fn select(&self, confidence_threshold: f32, iou_threshold: f32) -> Vec<Detection> {
    let mut candidates: Vec<&Detection> = self
      .detections
      .iter()
      .filter(|det| det.confidence >= confidence_threshold)
      .collect();
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
      let suppressed = kept.iter().any(|k| {
        k.class_id == candidate.class_id && iou(&k.bbox, &candidate.bbox) > iou_threshold
      });
      if !suppressed {
        kept.push(candidate.clone());
      }
    }
    kept
  }
}

impl Engine for ReplayEngine {
  type Error = ReplayEngineError;

  fn predict(
    &self,
    image: &RgbImage,
    confidence_threshold: f32,
    iou_threshold: f32,
  ) -> Result<EngineOutput, Self::Error> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
      return Err(ReplayEngineError::EmptyImage(width, height));
    }

    let now = Instant::now();
    let mut canvas = image.clone();
    let preprocess = now.elapsed();

    let now = Instant::now();
    let detections = self.select(confidence_threshold, iou_threshold);
    let inference = now.elapsed();
    debug!("阈值过滤后剩余 {} 个目标", detections.len());

    let now = Instant::now();
    self
      .draw
      .draw_detections(&mut canvas, &detections, &self.class_names);
    let visualization = VisualFrame::from_rgb_image(&canvas, ChannelOrder::Bgr);
    let postprocess = now.elapsed();

    let timing = match &self.speed {
      Some(speed) => speed.clone(),
      None => [
        ("preprocess", preprocess.as_secs_f64() * 1000.0),
        ("inference", inference.as_secs_f64() * 1000.0),
        ("postprocess", postprocess.as_secs_f64() * 1000.0),
      ]
      .into_iter()
      .collect(),
    };

    Ok(EngineOutput {
      detections,
      class_names: Arc::clone(&self.class_names),
      timing,
      visualization,
    })
  }
}

/// 两个归一化框 [x_min, y_min, x_max, y_max] 的交并比
fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
  let inter_w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
  let inter_h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
  let inter = inter_w * inter_h;

  let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
  let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
  let union = area_a + area_b - inter;

  if union <= 0.0 { 0.0 } else { inter / union }
}
