// 该文件是 Huoyan （火眼） 项目的一部分。
// src/output/render.rs - 标注图像渲染
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

use crate::frame::VisualFrame;

/// 规范 RGB 顺序的标注图像，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedImage {
  image: RgbImage,
}

impl AnnotatedImage {
  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  pub fn as_rgb_image(&self) -> &RgbImage {
    &self.image
  }

  pub fn into_rgb_image(self) -> RgbImage {
    self.image
  }
}

/// 只做通道顺序归一化：不缩放，不重新编码
pub fn render(visualization: &VisualFrame) -> AnnotatedImage {
  AnnotatedImage {
    image: visualization.to_rgb_image(),
  }
}
