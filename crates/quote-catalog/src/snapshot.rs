//! 目錄快照

use std::collections::HashMap;

use quote_core::{GlassType, MasterPart, Product, QuoteError};
use serde::{Deserialize, Serialize};

/// 目錄匯出文件（資料層提供的 JSON 格式）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    pub parts: Vec<MasterPart>,
    pub products: Vec<Product>,
    pub glass_types: Vec<GlassType>,
}

/// 目錄快照
///
/// 單次報價計算使用同一份快照，確保所有 BOM 行讀到一致的目錄資料。
/// 建立後不再變動，可在多執行緒間共享引用。
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    parts: HashMap<String, MasterPart>,
    products: HashMap<String, Product>,
    glass_types: HashMap<String, GlassType>,
}

impl CatalogSnapshot {
    /// 創建空的快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 從目錄文件建立快照
    pub fn from_document(document: CatalogDocument) -> quote_core::Result<Self> {
        let mut snapshot = Self::new();
        for part in document.parts {
            snapshot.insert_part(part)?;
        }
        for product in document.products {
            snapshot.insert_product(product)?;
        }
        for glass in document.glass_types {
            snapshot.insert_glass_type(glass);
        }

        tracing::debug!(
            "目錄快照建立完成：零件 {} 筆，產品 {} 筆，玻璃 {} 種",
            snapshot.parts.len(),
            snapshot.products.len(),
            snapshot.glass_types.len()
        );

        Ok(snapshot)
    }

    /// 從 JSON 建立快照
    pub fn from_json(json: &str) -> quote_core::Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// 新增零件（零件編號不可重複）
    pub fn insert_part(&mut self, part: MasterPart) -> quote_core::Result<()> {
        if self.parts.contains_key(&part.part_number) {
            return Err(QuoteError::DuplicatePartNumber(part.part_number));
        }
        self.parts.insert(part.part_number.clone(), part);
        Ok(())
    }

    /// 新增產品（BOM 行範本須通過檢查）
    pub fn insert_product(&mut self, product: Product) -> quote_core::Result<()> {
        product.validate()?;
        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    pub fn insert_glass_type(&mut self, glass: GlassType) {
        self.glass_types.insert(glass.name.clone(), glass);
    }

    /// 建構器模式：新增零件
    pub fn with_part(mut self, part: MasterPart) -> quote_core::Result<Self> {
        self.insert_part(part)?;
        Ok(self)
    }

    /// 建構器模式：新增產品
    pub fn with_product(mut self, product: Product) -> quote_core::Result<Self> {
        self.insert_product(product)?;
        Ok(self)
    }

    /// 建構器模式：新增玻璃種類
    pub fn with_glass_type(mut self, glass: GlassType) -> Self {
        self.insert_glass_type(glass);
        self
    }

    pub fn part(&self, part_number: &str) -> Option<&MasterPart> {
        self.parts.get(part_number)
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn glass_type(&self, name: &str) -> Option<&GlassType> {
        self.glass_types.get(name.trim())
    }

    /// BOM 行範本引用但目錄中不存在的零件編號（產品ID, 零件編號）
    ///
    /// 缺件不是錯誤（計價會退回固定單價或公式），僅供目錄維護參考。
    pub fn dangling_part_references(&self) -> Vec<(String, String)> {
        let mut dangling: Vec<(String, String)> = self
            .products
            .values()
            .flat_map(|product| {
                product
                    .bom_lines
                    .iter()
                    .filter_map(|line| line.part_number.as_deref())
                    .filter(|pn| !self.parts.contains_key(*pn))
                    .map(|pn| (product.id.clone(), pn.to_string()))
            })
            .collect();
        dangling.sort();
        dangling
    }
}
