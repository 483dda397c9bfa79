// 该文件是 Huoyan （火眼） 项目的一部分。
// src/report/latency.rs - 推理耗时统计
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

use crate::model::TimingBreakdown;
use crate::report::ReportError;

/// 各阶段耗时（毫秒）之和换算为秒，四舍五入（远离零）到两位小数。
pub fn total_latency_seconds(timing: &TimingBreakdown) -> Result<f64, ReportError> {
  let mut total_ms = 0.0;
  for (stage, millis) in timing.iter() {
    if !millis.is_finite() || millis < 0.0 {
      return Err(ReportError::InvalidTiming {
        stage: stage.to_string(),
        millis,
      });
    }
    total_ms += millis;
  }

  // 各项有限但总和可能溢出
  if !total_ms.is_finite() {
    return Err(ReportError::InvalidTiming {
      stage: "total".to_string(),
      millis: total_ms,
    });
  }

  // 先换算为百分之一秒再取整，避免 x * 100 的浮点误差
  Ok((total_ms / 10.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn timing(stages: &[(&str, f64)]) -> TimingBreakdown {
    stages.iter().copied().collect()
  }

  #[test]
  fn sums_stages_in_seconds() {
    let t = timing(&[("pre", 10.0), ("infer", 990.0), ("post", 20.0)]);
    assert_eq!(total_latency_seconds(&t).unwrap(), 1.02);
  }

  #[test]
  fn rounds_half_away_from_zero() {
    assert_eq!(total_latency_seconds(&timing(&[("a", 5.0)])).unwrap(), 0.01);
    assert_eq!(total_latency_seconds(&timing(&[("a", 4.9)])).unwrap(), 0.0);
    assert_eq!(total_latency_seconds(&timing(&[("a", 1234.0)])).unwrap(), 1.23);
  }

  #[test]
  fn empty_breakdown_is_zero() {
    assert_eq!(total_latency_seconds(&TimingBreakdown::new()).unwrap(), 0.0);
  }

  #[test]
  fn negative_or_nan_component_fails() {
    let err = total_latency_seconds(&timing(&[("pre", 1.0), ("infer", -3.0)])).unwrap_err();
    assert_eq!(
      err,
      ReportError::InvalidTiming {
        stage: "infer".to_string(),
        millis: -3.0
      }
    );

    let err = total_latency_seconds(&timing(&[("post", f64::NAN)])).unwrap_err();
    assert!(matches!(err, ReportError::InvalidTiming { .. }));
  }

  #[test]
  fn overflowing_sum_fails() {
    let t = timing(&[("a", f64::MAX), ("b", f64::MAX)]);
    let err = total_latency_seconds(&t).unwrap_err();
    assert_eq!(
      err,
      ReportError::InvalidTiming {
        stage: "total".to_string(),
        millis: f64::INFINITY
      }
    );
  }
}
