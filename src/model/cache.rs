// 该文件是 Huoyan （火眼） 项目的一部分。
// src/model/cache.rs - 模型缓存
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

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, info};
use url::Url;

/// 单个地址的缓存槽：`init` 串行化同一地址的加载，`model` 一旦写入不再改变
struct Slot<E> {
  init: Mutex<()>,
  model: OnceLock<Arc<E>>,
}

impl<E> Default for Slot<E> {
  fn default() -> Self {
    Self {
      init: Mutex::new(()),
      model: OnceLock::new(),
    }
  }
}

/// 按模型地址缓存已加载的引擎。
///
/// 每个地址只加载一次，之后共享只读的 `Arc`；条目从不淘汰。
pub struct ModelCache<E> {
  slots: Mutex<HashMap<Url, Arc<Slot<E>>>>,
}

impl<E> Default for ModelCache<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> ModelCache<E> {
  pub fn new() -> Self {
    Self {
      slots: Mutex::new(HashMap::new()),
    }
  }

  fn slot(&self, url: &Url) -> Arc<Slot<E>> {
    let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slots.entry(url.clone()).or_default())
  }

  /// 取出已缓存的模型，不存在时调用 `load` 加载。
  /// 表锁只在查找槽位时持有；同一地址的并发请求只会触发一次加载，
  /// 其他地址不受影响。加载失败不缓存。
  pub fn get_or_load<F, Err>(&self, url: &Url, load: F) -> Result<Arc<E>, Err>
  where
    F: FnOnce(&Url) -> Result<E, Err>,
  {
    let slot = self.slot(url);
    if let Some(model) = slot.model.get() {
      debug!("模型缓存命中: {}", url);
      return Ok(Arc::clone(model));
    }

    let _init = slot.init.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(model) = slot.model.get() {
      debug!("模型已由其他请求加载: {}", url);
      return Ok(Arc::clone(model));
    }

    info!("模型缓存未命中，加载模型: {}", url);
    let model = Arc::new(load(url)?);
    Ok(Arc::clone(slot.model.get_or_init(|| model)))
  }

  /// 已加载的模型数量
  pub fn len(&self) -> usize {
    self
      .slots
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .values()
      .filter(|slot| slot.model.get().is_some())
      .count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
