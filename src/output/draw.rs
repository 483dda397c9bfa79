// 该文件是 Huoyan （火眼） 项目的一部分。
// src/output/draw.rs - 目标检测结果可视化
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

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::model::{ClassNameTable, Detection};

const BOX_THICKNESS: i32 = 2;
const PALETTE_SIZE: u32 = 80;
const LABEL_SCALE: f32 = 20.0;
const LABEL_PADDING: i32 = 2;
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// 按类别编号循环取色的调色板，色相均分
fn palette(size: u32) -> Vec<Rgb<u8>> {
  (0..size)
    .map(|i| sector_color(i as f32 * 6.0 / size as f32))
    .collect()
}

// 饱和度 0.8、明度 0.9 的颜色；`sector` 为色相 / 60°，取值 [0, 6)
fn sector_color(sector: f32) -> Rgb<u8> {
  const SATURATION: f32 = 0.8;
  const VALUE: f32 = 0.9;

  let chroma = VALUE * SATURATION;
  let mid = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
  let (r, g, b) = match sector as u32 {
    0 => (chroma, mid, 0.0),
    1 => (mid, chroma, 0.0),
    2 => (0.0, chroma, mid),
    3 => (0.0, mid, chroma),
    4 => (mid, 0.0, chroma),
    _ => (chroma, 0.0, mid),
  };

  let floor = VALUE - chroma;
  let channel = |c: f32| ((c + floor) * 255.0).round() as u8;
  Rgb([channel(r), channel(g), channel(b)])
}

/// 检测框与标签绘制；未设置字体时只画框
#[derive(Debug)]
pub struct Draw {
  font: Option<FontArc>,
  colors: Vec<Rgb<u8>>,
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      font: None,
      colors: palette(PALETTE_SIZE),
    }
  }
}

impl Draw {
  pub fn with_font(mut self, font: FontArc) -> Self {
    self.font = Some(font);
    self
  }

  pub fn has_font(&self) -> bool {
    self.font.is_some()
  }

  fn color_of(&self, class_id: u32) -> Rgb<u8> {
    self.colors[class_id as usize % self.colors.len()]
  }

  /// 在图像上绘制全部检测框，图像尺寸不变
  pub fn draw_detections(
    &self,
    image: &mut RgbImage,
    detections: &[Detection],
    class_names: &ClassNameTable,
  ) {
    for det in detections {
      let label = match class_names.label(det.class_id) {
        Some(name) => format!("{} {:.2}", name, det.confidence),
        None => format!("{} {:.2}", det.class_id, det.confidence),
      };
      self.draw_bbox_with_label(image, &det.bbox, &label, self.color_of(det.class_id));
    }
  }

  // bbox 为归一化坐标 [x_min, y_min, x_max, y_max]
  fn draw_bbox_with_label(
    &self,
    image: &mut RgbImage,
    bbox: &[f32; 4],
    label: &str,
    color: Rgb<u8>,
  ) {
    if image.width() == 0 || image.height() == 0 {
      return;
    }
    let (w, h) = (image.width() as f32, image.height() as f32);

    let x_min = ((bbox[0] * w).floor() as i32).clamp(0, w as i32 - 1);
    let y_min = ((bbox[1] * h).floor() as i32).clamp(0, h as i32 - 1);
    let x_max = ((bbox[2] * w).ceil() as i32).clamp(0, w as i32 - 1);
    let y_max = ((bbox[3] * h).ceil() as i32).clamp(0, h as i32 - 1);

    if x_min >= x_max || y_min >= y_max {
      return;
    }

    // 边框加粗，逐层向内收缩
    for t in 0..BOX_THICKNESS {
      let (x0, y0, x1, y1) = (x_min + t, y_min + t, x_max - t, y_max - t);
      if x0 > x1 || y0 > y1 {
        break;
      }
      for x in x0..=x1 {
        image.put_pixel(x as u32, y0 as u32, color);
        image.put_pixel(x as u32, y1 as u32, color);
      }
      for y in y0..=y1 {
        image.put_pixel(x0 as u32, y as u32, color);
        image.put_pixel(x1 as u32, y as u32, color);
      }
    }

    let Some(font) = &self.font else {
      return;
    };

    // 标签背景紧贴边框上方，不超出图像
    let scale = PxScale::from(LABEL_SCALE);
    let (text_w, text_h) = text_size(scale, font, label);
    let label_h = text_h as i32 + 2 * LABEL_PADDING;
    let label_w = (text_w as i32 + 2 * LABEL_PADDING).min(w as i32 - x_min);
    let label_x = x_min;
    let label_y = (y_min - label_h).max(0);

    if label_w > 0 && label_h > 0 {
      let rect = Rect::at(label_x, label_y).of_size(label_w as u32, label_h as u32);
      draw_filled_rect_mut(image, rect, color);
      draw_text_mut(
        image,
        LABEL_TEXT_COLOR,
        label_x + LABEL_PADDING,
        label_y + LABEL_PADDING,
        scale,
        font,
        label,
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names() -> ClassNameTable {
    [(0, "fire")].into_iter().collect()
  }

  #[test]
  fn draws_box_edges_without_font() {
    let mut image = RgbImage::new(20, 20);
    let det = Detection {
      class_id: 0,
      confidence: 0.9,
      bbox: [0.25, 0.25, 0.75, 0.75],
    };
    Draw::default().draw_detections(&mut image, &[det], &names());

    let color = Draw::default().color_of(0);
    assert_eq!(image.get_pixel(5, 5), &color);
    assert_eq!(image.get_pixel(15, 10), &color);
    // 框内部保持原样
    assert_eq!(image.get_pixel(10, 10), &Rgb([0, 0, 0]));
    assert_eq!(image.dimensions(), (20, 20));
  }

  #[test]
  fn degenerate_box_is_skipped() {
    let mut image = RgbImage::new(10, 10);
    let det = Detection {
      class_id: 3,
      confidence: 0.5,
      bbox: [0.5, 0.5, 0.5, 0.5],
    };
    Draw::default().draw_detections(&mut image, &[det], &names());
    assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
  }

  #[test]
  fn out_of_range_box_is_clamped() {
    let mut image = RgbImage::new(8, 8);
    let det = Detection {
      class_id: 1,
      confidence: 0.5,
      bbox: [-0.5, -0.5, 1.5, 1.5],
    };
    Draw::default().draw_detections(&mut image, &[det], &names());
    assert_ne!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_ne!(image.get_pixel(7, 7), &Rgb([0, 0, 0]));
  }

  #[test]
  fn palette_starts_at_red_and_cycles() {
    let colors = palette(PALETTE_SIZE);
    assert_eq!(colors.len(), 80);
    assert_eq!(colors[0], Rgb([230, 46, 46]));
    let draw = Draw::default();
    assert_eq!(draw.color_of(81), draw.color_of(1));
  }

  #[test]
  fn label_is_drawn_above_box_with_font() {
    let font = FontArc::try_from_slice(include_bytes!("../../assets/DejaVuSans.ttf")).unwrap();
    let draw = Draw::default().with_font(font);
    assert!(draw.has_font());

    let mut image = RgbImage::new(100, 100);
    let det = Detection {
      class_id: 0,
      confidence: 0.9,
      bbox: [0.25, 0.5, 0.75, 0.9],
    };
    draw.draw_detections(&mut image, &[det], &names());

    // 背景左侧留白列使用类别颜色
    let color = draw.color_of(0);
    assert_eq!(image.get_pixel(25, 49), &color);
    assert_eq!(image.get_pixel(25, 47), &color);
    // 白色文字落在边框上方的标签区域
    let has_text = (30..50)
      .flat_map(|y| (25..75).map(move |x| (x, y)))
      .any(|(x, y)| image.get_pixel(x, y).0.iter().all(|&c| c > 200));
    assert!(has_text);
  }

  #[test]
  fn no_label_without_font() {
    let mut image = RgbImage::new(100, 100);
    let det = Detection {
      class_id: 0,
      confidence: 0.9,
      bbox: [0.25, 0.5, 0.75, 0.9],
    };
    Draw::default().draw_detections(&mut image, &[det], &names());
    assert_eq!(image.get_pixel(25, 49), &Rgb([0, 0, 0]));
  }
}
