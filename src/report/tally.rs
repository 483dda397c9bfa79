// 该文件是 Huoyan （火眼） 项目的一部分。
// src/report/tally.rs - 按类别计数
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

use crate::model::{ClassNameTable, Detection};
use crate::report::ReportError;

/// 每个类别的检测数量，保留各类别首次出现的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTally {
  entries: Vec<(String, usize)>,
}

impl ClassTally {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, label: &str) {
    match self.entries.iter_mut().find(|(name, _)| name == label) {
      Some(entry) => entry.1 += 1,
      None => self.entries.push((label.to_string(), 1)),
    }
  }

  pub fn count(&self, label: &str) -> usize {
    self
      .entries
      .iter()
      .find(|(name, _)| name == label)
      .map_or(0, |(_, count)| *count)
  }

  /// 全部类别的计数之和
  pub fn total(&self) -> usize {
    self.entries.iter().map(|(_, count)| count).sum()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// 按数量降序排列；数量相同者保持首次出现顺序（稳定排序）
  pub fn ranked(&self) -> Vec<(&str, usize)> {
    let mut ranked: Vec<(&str, usize)> = self
      .entries
      .iter()
      .map(|(name, count)| (name.as_str(), *count))
      .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
  }
}

impl<S: AsRef<str>> FromIterator<S> for ClassTally {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut tally = ClassTally::new();
    for label in iter {
      tally.record(label.as_ref());
    }
    tally
  }
}

/// 统计每个类别的检测数量。置信度过滤已由引擎完成，这里不再过滤。
pub fn tally(
  detections: &[Detection],
  class_names: &ClassNameTable,
) -> Result<ClassTally, ReportError> {
  let mut tally = ClassTally::new();
  for det in detections {
    let label = class_names
      .label(det.class_id)
      .ok_or(ReportError::UnknownClass(det.class_id))?;
    tally.record(label);
  }
  Ok(tally)
}
