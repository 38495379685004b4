//! 計價模式註冊表

use quote_core::{PricingMode, QuoteError};

/// 建立預設模式時使用的名稱
pub const DEFAULT_MODE_NAME: &str = "Default";

/// 計價模式註冊表
///
/// 同一時間最多只有一個預設模式。預設模式的建立由
/// [`PricingModeRegistry::ensure_default_pricing_mode`] 在啟動或遷移時明確執行，
/// 讀取路徑不會產生副作用。
#[derive(Debug, Clone, Default)]
pub struct PricingModeRegistry {
    modes: Vec<PricingMode>,
}

impl PricingModeRegistry {
    /// 創建註冊表（多個預設時保留第一個）
    pub fn new(modes: Vec<PricingMode>) -> Self {
        let mut registry = Self::default();
        for mode in modes {
            if mode.is_default && registry.default_mode().is_some() {
                tracing::warn!("計價模式 {} 重複標記為預設，已取消其預設狀態", mode.name);
                registry.modes.push(mode.with_default(false));
            } else {
                registry.modes.push(mode);
            }
        }
        registry
    }

    /// 新增或更新模式；新模式為預設時，取消其他模式的預設狀態
    pub fn upsert(&mut self, mode: PricingMode) {
        if mode.is_default {
            for existing in &mut self.modes {
                existing.is_default = false;
            }
        }
        match self.modes.iter_mut().find(|m| m.id == mode.id) {
            Some(existing) => *existing = mode,
            None => self.modes.push(mode),
        }
    }

    /// 確保存在預設模式（冪等）
    ///
    /// 若沒有任何模式標記為預設，建立一個零加成、零折扣的預設模式。
    pub fn ensure_default_pricing_mode(&mut self) -> &PricingMode {
        if let Some(index) = self.modes.iter().position(|m| m.is_default) {
            return &self.modes[index];
        }

        let next_id = self.next_free_id();
        tracing::info!("未設定預設計價模式，建立零加成預設模式 (id={})", next_id);
        self.modes
            .push(PricingMode::new(next_id, DEFAULT_MODE_NAME.to_string()).with_default(true));

        let last = self.modes.len() - 1;
        &self.modes[last]
    }

    /// 最大 ID + 1；已達上限時改用最小的未使用正整數
    fn next_free_id(&self) -> i64 {
        let max_id = self.modes.iter().map(|m| m.id).max().unwrap_or(0);
        max_id.checked_add(1).unwrap_or_else(|| {
            (1..i64::MAX)
                .find(|id| self.get(*id).is_none())
                .unwrap_or(0)
        })
    }

    pub fn default_mode(&self) -> Option<&PricingMode> {
        self.modes.iter().find(|m| m.is_default)
    }

    pub fn get(&self, id: i64) -> Option<&PricingMode> {
        self.modes.iter().find(|m| m.id == id)
    }

    /// 決定專案使用的計價模式：指定模式優先，否則沿用預設模式
    pub fn resolve(&self, mode_id: Option<i64>) -> quote_core::Result<&PricingMode> {
        match mode_id {
            Some(id) => self
                .get(id)
                .ok_or_else(|| QuoteError::PricingModeNotFound(id.to_string())),
            None => self.default_mode().ok_or(QuoteError::NoDefaultPricingMode),
        }
    }

    pub fn modes(&self) -> &[PricingMode] {
        &self.modes
    }
}
