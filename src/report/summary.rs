// 该文件是 Huoyan （火眼） 项目的一部分。
// src/report/summary.rs - 结果摘要文本
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

use crate::report::ClassTally;

const PREFIX: &str = "Predicted ";
const NO_OBJECTS: &str = "No objects detected";
const ENTRY_SEPARATOR: &str = ", ";

// 只在数量大于 1 时加 "s"，不处理不规则复数
fn describe(label: &str, count: usize) -> String {
  if count > 1 {
    format!("{} {}s", count, label)
  } else {
    format!("{} {}", count, label)
  }
}

/// 生成摘要句子，例如 `Predicted 2 fires, 1 smoke in 0.50 seconds.`
///
/// 条目按数量降序，数量相同时按首次出现顺序；条目之间以 `", "` 连接，
/// 因此最后一个条目之后不会残留分隔符。耗时固定保留两位小数。
pub fn format_summary(tally: &ClassTally, latency_seconds: f64) -> String {
  let body = if tally.is_empty() {
    NO_OBJECTS.to_string()
  } else {
    let entries: Vec<String> = tally
      .ranked()
      .into_iter()
      .map(|(label, count)| describe(label, count))
      .collect();
    format!("{}{}", PREFIX, entries.join(ENTRY_SEPARATOR))
  };

  format!("{} in {:.2} seconds.", body, latency_seconds)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tally_of(labels: &[&str]) -> ClassTally {
    labels.iter().collect()
  }

  #[test]
  fn empty_tally() {
    assert_eq!(
      format_summary(&ClassTally::new(), 1.23),
      "No objects detected in 1.23 seconds."
    );
  }

  #[test]
  fn descending_count_with_plural() {
    let tally = tally_of(&["smoke", "fire", "fire"]);
    assert_eq!(
      format_summary(&tally, 0.5),
      "Predicted 2 fires, 1 smoke in 0.50 seconds."
    );
  }

  #[test]
  fn equal_counts_keep_first_seen_order() {
    let tally = tally_of(&["fire", "smoke"]);
    assert_eq!(
      format_summary(&tally, 0.0),
      "Predicted 1 fire, 1 smoke in 0.00 seconds."
    );

    let tally = tally_of(&["smoke", "fire"]);
    assert_eq!(
      format_summary(&tally, 0.0),
      "Predicted 1 smoke, 1 fire in 0.00 seconds."
    );
  }

  #[test]
  fn single_entry_has_no_separator() {
    let summary = format_summary(&tally_of(&["person", "person", "person"]), 12.0);
    assert_eq!(summary, "Predicted 3 persons in 12.00 seconds.");
    assert!(!summary.contains(", in"));
    assert!(!summary.ends_with(".."));
  }
}
