// 该文件是 Huoyan （火眼） 项目的一部分。
// src/report.rs - 检测结果汇总
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

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
  #[error("未知类别编号: {0}，类别表不完整")]
  UnknownClass(u32),
  #[error("阶段 '{stage}' 耗时无效: {millis} ms")]
  InvalidTiming { stage: String, millis: f64 },
}

mod tally;
pub use self::tally::{ClassTally, tally};

mod summary;
pub use self::summary::format_summary;

mod latency;
pub use self::latency::total_latency_seconds;
