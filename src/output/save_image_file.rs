// 该文件是 Huoyan （火眼） 项目的一部分。
// src/output/save_image_file.rs - 保存导出文件
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, output::package::ExportArtifact};

/// 将导出结果写入文件；路径以 `/` 结尾或为已存在目录时使用结果自带的文件名
pub struct SaveArtifactOutput {
  path: PathBuf,
  as_directory: bool,
}

#[derive(Error, Debug)]
pub enum SaveArtifactError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for SaveArtifactOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveArtifactOutput {
  type Error = SaveArtifactError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(SaveArtifactError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(Self::new(url.path()))
  }
}

impl SaveArtifactOutput {
  pub fn new(path: &str) -> Self {
    Self {
      path: PathBuf::from(path),
      as_directory: path.ends_with('/'),
    }
  }

  /// 实际写入的文件路径
  pub fn target_path(&self, artifact: &ExportArtifact) -> PathBuf {
    if self.as_directory || self.path.is_dir() {
      self.path.join(&artifact.file_name)
    } else {
      self.path.clone()
    }
  }

  pub fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf, SaveArtifactError> {
    let target = self.target_path(artifact);
    if let Some(parent) = Path::new(&target).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&target, &artifact.bytes)?;
    info!(
      "保存导出文件: {} ({}, {} 字节)",
      target.display(),
      artifact.mime_type,
      artifact.bytes.len()
    );

    Ok(target)
  }
}
