// ==========================================
// BOM 零件核对系统 - BOM 明细导入
// ==========================================
// 流程: 文件解析 → 逐行校验（无效行跳过并告警）→ 单事务落库
// 跳过规则:
//   - 列数不足 5
//   - bom_code / part_name 为空
//   - quantity 非整数或 ≤ 0
// ==========================================

use crate::domain::bom::BomEntry;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{BomFileParser, UniversalFileParser};
use crate::repository::BomRepository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const REQUIRED_COLUMNS: usize = 5;

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 文件中的行号（表头为第 1 行）
    pub row_number: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

/// 解析数量: 接受整数文本,以及 Excel 中无小数部分的浮点
fn parse_quantity(raw: &str) -> Option<i64> {
    if let Ok(q) = raw.parse::<i64>() {
        return Some(q);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// 将原始行转换为 BOM 明细
///
/// # 返回
/// - Ok(BomEntry)
/// - Err(reason): 跳过原因
pub fn row_to_entry(row: &[String]) -> Result<BomEntry, String> {
    if row.len() < REQUIRED_COLUMNS {
        return Err(format!("列数不足: {} < {}", row.len(), REQUIRED_COLUMNS));
    }

    let quantity = parse_quantity(&row[4]).ok_or_else(|| format!("数量非法: {}", row[4]))?;
    if quantity <= 0 {
        return Err(format!("数量必须大于 0: {}", quantity));
    }
    if row[0].is_empty() {
        return Err("bom_code 为空".to_string());
    }
    if row[2].is_empty() {
        return Err("part_name 为空".to_string());
    }

    Ok(BomEntry {
        id: 0,
        bom_code: row[0].clone(),
        part_reference: row[1].clone(),
        part_name: row[2].clone(),
        part_description: row[3].clone(),
        quantity,
    })
}

// ==========================================
// BomImporter - BOM 文件导入器
// ==========================================
pub struct BomImporter<P: BomFileParser = UniversalFileParser> {
    bom_repo: Arc<BomRepository>,
    parser: P,
}

impl BomImporter<UniversalFileParser> {
    pub fn new(bom_repo: Arc<BomRepository>) -> Self {
        Self {
            bom_repo,
            parser: UniversalFileParser,
        }
    }
}

impl<P: BomFileParser> BomImporter<P> {
    pub fn with_parser(bom_repo: Arc<BomRepository>, parser: P) -> Self {
        Self { bom_repo, parser }
    }

    /// 导入 BOM 文件
    pub fn import_file(&self, file_path: &Path) -> ImportResult<ImportReport> {
        info!(file = %file_path.display(), "开始导入 BOM 文件");
        let rows = self.parser.parse_rows(file_path)?;

        let mut entries = Vec::with_capacity(rows.len());
        let mut skipped_rows = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            // 表头占第 1 行
            let row_number = idx + 2;
            match row_to_entry(row) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!(row_number, reason = %reason, "跳过无效 BOM 行");
                    skipped_rows.push(SkippedRow { row_number, reason });
                }
            }
        }

        let imported = if entries.is_empty() {
            0
        } else {
            self.bom_repo.batch_insert(&entries)?
        };

        info!(imported, skipped = skipped_rows.len(), "BOM 文件导入完成");
        Ok(ImportReport {
            imported,
            skipped: skipped_rows.len(),
            skipped_rows,
        })
    }
}
