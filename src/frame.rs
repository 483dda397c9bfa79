// 该文件是 Huoyan （火眼） 项目的一部分。
// src/frame.rs - 可视化帧定义
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

use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

const RGB_CHANNELS: usize = 3;

/// 像素通道顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
  /// 红-绿-蓝（规范顺序）
  Rgb,
  /// 蓝-绿-红（OpenCV 风格引擎的原生顺序）
  Bgr,
}

impl ChannelOrder {
  /// 将该顺序下的一个像素转为 RGB
  fn to_rgb(self, pixel: [u8; 3]) -> [u8; 3] {
    match self {
      ChannelOrder::Rgb => pixel,
      ChannelOrder::Bgr => [pixel[2], pixel[1], pixel[0]],
    }
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
  #[error("数据长度不匹配: 期望长度 {expected}, 实际长度 {actual}")]
  SizeMismatch { expected: usize, actual: usize },
  #[error("帧尺寸过大: {width}x{height}")]
  DimensionOverflow { width: u32, height: u32 },
}

/// 引擎输出的可视化缓冲区，NHWC 排布，通道顺序由引擎决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualFrame {
  width: u32,
  height: u32,
  order: ChannelOrder,
  data: Box<[u8]>,
}

impl VisualFrame {
  pub fn new(
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
  ) -> Result<Self, FrameError> {
    let expected = (width as usize)
      .checked_mul(height as usize)
      .and_then(|pixels| pixels.checked_mul(RGB_CHANNELS))
      .ok_or(FrameError::DimensionOverflow { width, height })?;
    if data.len() != expected {
      return Err(FrameError::SizeMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      width,
      height,
      order,
      data: data.into_boxed_slice(),
    })
  }

  /// 以指定通道顺序打包一张 RGB 图像
  pub fn from_rgb_image(image: &RgbImage, order: ChannelOrder) -> Self {
    let mut data = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
      // 两种顺序互为逆变换
      data.extend_from_slice(&order.to_rgb(pixel.0));
    }

    Self {
      width: image.width(),
      height: image.height(),
      order,
      data: data.into_boxed_slice(),
    }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  pub fn order(&self) -> ChannelOrder {
    self.order
  }

  pub fn as_nhwc(&self) -> &[u8] {
    &self.data
  }

  /// 转为规范 RGB 顺序的图像，尺寸不变
  pub fn to_rgb_image(&self) -> RgbImage {
    let width = self.width as usize;
    ImageBuffer::from_fn(self.width, self.height, |x, y| {
      let idx = (y as usize * width + x as usize) * RGB_CHANNELS;
      let pixel = [self.data[idx], self.data[idx + 1], self.data[idx + 2]];
      Rgb(self.order.to_rgb(pixel))
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_short_buffer() {
    let err = VisualFrame::new(2, 2, ChannelOrder::Bgr, vec![0; 11]).unwrap_err();
    assert_eq!(
      err,
      FrameError::SizeMismatch {
        expected: 12,
        actual: 11
      }
    );
  }

  #[test]
  fn absurd_dimensions_do_not_overflow() {
    let err = VisualFrame::new(u32::MAX, u32::MAX, ChannelOrder::Rgb, vec![]).unwrap_err();
    assert_eq!(
      err,
      FrameError::DimensionOverflow {
        width: u32::MAX,
        height: u32::MAX
      }
    );
  }

  #[test]
  fn bgr_buffer_swaps_to_rgb() {
    let frame = VisualFrame::new(1, 1, ChannelOrder::Bgr, vec![10, 20, 30]).unwrap();
    let image = frame.to_rgb_image();
    assert_eq!(image.get_pixel(0, 0), &Rgb([30, 20, 10]));
  }

  #[test]
  fn packing_as_bgr_reverses_channels() {
    let image = RgbImage::from_pixel(2, 1, Rgb([1, 2, 3]));
    let frame = VisualFrame::from_rgb_image(&image, ChannelOrder::Bgr);
    assert_eq!(frame.as_nhwc(), &[3, 2, 1, 3, 2, 1]);
    assert_eq!(frame.to_rgb_image(), image);
  }
}
