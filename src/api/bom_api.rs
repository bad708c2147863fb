// ==========================================
// BOM 零件核对系统 - BOM 明细 API
// ==========================================
// 职责: BOM 明细录入、查询、文件导入导出
// ==========================================

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_bom_code, validate_bom_entry};
use crate::domain::bom::{BomEntry, BomEntryWithStatus};
use crate::i18n::t;
use crate::importer::{export_csv, BomImporter, ImportReport};
use crate::repository::BomRepository;

// ==========================================
// BomApi - BOM 明细 API
// ==========================================
pub struct BomApi {
    bom_repo: Arc<BomRepository>,
}

impl BomApi {
    pub fn new(bom_repo: Arc<BomRepository>) -> Self {
        Self { bom_repo }
    }

    /// 新增单条 BOM 明细
    ///
    /// # 返回
    /// - Ok(BomEntry): 带主键的明细
    pub fn add_entry(&self, entry: BomEntry) -> ApiResult<BomEntry> {
        validate_bom_entry(&entry)?;
        let id = self.bom_repo.insert(&entry)?;
        tracing::info!(bom_code = %entry.bom_code, part_name = %entry.part_name, id, "新增 BOM 明细");
        Ok(BomEntry { id, ..entry })
    }

    /// 批量新增（任一条非法则整批拒绝）
    pub fn add_batch(&self, entries: &[BomEntry]) -> ApiResult<usize> {
        if entries.is_empty() {
            return Err(ApiError::InvalidInput(t("validation.no_entries")));
        }
        for entry in entries {
            validate_bom_entry(entry)?;
        }
        let count = self.bom_repo.batch_insert(entries)?;
        tracing::info!(count, "批量新增 BOM 明细");
        Ok(count)
    }

    /// 查询全部明细及检测/定稿状态
    pub fn list_with_status(&self) -> ApiResult<Vec<BomEntryWithStatus>> {
        Ok(self.bom_repo.list_with_status()?)
    }

    /// 查询某 BOM 编码的明细
    pub fn list_by_bom_code(&self, bom_code: &str) -> ApiResult<Vec<BomEntry>> {
        validate_bom_code(bom_code)?;
        Ok(self.bom_repo.find_by_bom_code(bom_code)?)
    }

    /// 查询需求数量（零件名 → 数量）；编码不存在时为空表
    pub fn required_quantities(&self, bom_code: &str) -> ApiResult<BTreeMap<String, i64>> {
        validate_bom_code(bom_code)?;
        Ok(self.bom_repo.find_required_quantities(bom_code)?)
    }

    /// 从 CSV/Excel 文件导入
    pub fn import_file(&self, file_path: &Path) -> ApiResult<ImportReport> {
        let importer = BomImporter::new(self.bom_repo.clone());
        Ok(importer.import_file(file_path)?)
    }

    /// 导出全部明细为 CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> ApiResult<usize> {
        let entries = self.bom_repo.list_all()?;
        Ok(export_csv(writer, &entries)?)
    }
}
