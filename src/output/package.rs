// 该文件是 Huoyan （火眼） 项目的一部分。
// src/output/package.rs - 结果打包导出
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

use std::io::Cursor;

use image::ImageFormat;
use image::error::{ImageError, ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use thiserror::Error;
use tracing::debug;

use crate::output::render::AnnotatedImage;

pub const DEFAULT_FILE_NAME: &str = "prediction.png";
pub const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Error, Debug)]
pub enum ExportError {
  #[error("图像编码失败 ({mime_type}): {source}")]
  EncodingFailed {
    mime_type: String,
    #[source]
    source: ImageError,
  },
}

/// 可下载的导出结果：编码后的字节、文件名与 MIME 类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
  pub bytes: Vec<u8>,
  pub file_name: String,
  pub mime_type: String,
}

// 只接受无损格式
fn lossless_format(mime_type: &str) -> Option<ImageFormat> {
  ImageFormat::from_mime_type(mime_type)
    .filter(|format| matches!(format, ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff))
}

pub fn package(
  image: &AnnotatedImage,
  file_name: &str,
  mime_type: &str,
) -> Result<ExportArtifact, ExportError> {
  let encoding_failed = |source| ExportError::EncodingFailed {
    mime_type: mime_type.to_string(),
    source,
  };

  let format = lossless_format(mime_type).ok_or_else(|| {
    encoding_failed(ImageError::Unsupported(
      UnsupportedError::from_format_and_kind(
        ImageFormatHint::Name(mime_type.to_string()),
        UnsupportedErrorKind::Format(ImageFormatHint::Name(mime_type.to_string())),
      ),
    ))
  })?;

  let mut bytes = Vec::new();
  image
    .as_rgb_image()
    .write_to(&mut Cursor::new(&mut bytes), format)
    .map_err(encoding_failed)?;
  debug!("导出 {}: {} 字节", file_name, bytes.len());

  Ok(ExportArtifact {
    bytes,
    file_name: file_name.to_string(),
    mime_type: mime_type.to_string(),
  })
}

/// 使用默认文件名与 MIME 类型打包
pub fn package_default(image: &AnnotatedImage) -> Result<ExportArtifact, ExportError> {
  package(image, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frame::{ChannelOrder, VisualFrame};
  use crate::output::render::render;

  fn annotated() -> AnnotatedImage {
    let data: Vec<u8> = (0..(4 * 3 * 3)).map(|v| (v * 7) as u8).collect();
    render(&VisualFrame::new(4, 3, ChannelOrder::Bgr, data).unwrap())
  }

  #[test]
  fn png_round_trip_is_lossless() {
    let image = annotated();
    let artifact = package_default(&image).unwrap();

    assert_eq!(artifact.file_name, "prediction.png");
    assert_eq!(artifact.mime_type, "image/png");
    let decoded = image::load_from_memory_with_format(&artifact.bytes, ImageFormat::Png)
      .unwrap()
      .to_rgb8();
    assert_eq!(&decoded, image.as_rgb_image());
  }

  #[test]
  fn bmp_and_tiff_round_trip() {
    let image = annotated();
    for (mime, format) in [("image/bmp", ImageFormat::Bmp), ("image/tiff", ImageFormat::Tiff)] {
      let artifact = package(&image, "prediction", mime).unwrap();
      assert_eq!(artifact.mime_type, mime);
      let decoded = image::load_from_memory_with_format(&artifact.bytes, format)
        .unwrap()
        .to_rgb8();
      assert_eq!(&decoded, image.as_rgb_image());
    }
  }

  #[test]
  fn overrides_file_name() {
    let artifact = package(&annotated(), "fire.png", "image/png").unwrap();
    assert_eq!(artifact.file_name, "fire.png");
  }

  #[test]
  fn lossy_or_unknown_mime_fails() {
    for mime in ["image/jpeg", "text/plain"] {
      let err = package(&annotated(), "x", mime).unwrap_err();
      let ExportError::EncodingFailed { mime_type, .. } = err;
      assert_eq!(mime_type, mime);
    }
  }
}
