// ==========================================
// BOM 零件核对系统 - BOM 明细 CSV 导出
// ==========================================
// 列序与导入一致: bom_code, part_reference, part_name, part_description, quantity
// ==========================================

use crate::domain::bom::BomEntry;
use crate::importer::error::{ImportError, ImportResult};
use std::io::Write;

pub const CSV_HEADER: [&str; 5] = [
    "bom_code",
    "part_reference",
    "part_name",
    "part_description",
    "quantity",
];

/// 写出 CSV（表头 + 明细）
///
/// # 返回
/// - Ok(n): 写出的明细行数
pub fn export_csv<W: Write>(writer: W, entries: &[BomEntry]) -> ImportResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_HEADER)
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    for entry in entries {
        csv_writer
            .write_record([
                entry.bom_code.as_str(),
                entry.part_reference.as_str(),
                entry.part_name.as_str(),
                entry.part_description.as_str(),
                entry.quantity.to_string().as_str(),
            ])
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    Ok(entries.len())
}
