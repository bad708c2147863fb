// ==========================================
// BOM 零件核对系统 - 导入/导出层
// ==========================================
// 职责: BOM 明细文件导入（CSV/Excel）与 CSV 导出
// ==========================================

pub mod bom_importer;
pub mod error;
pub mod exporter;
pub mod file_parser;

pub use bom_importer::{row_to_entry, BomImporter, ImportReport, SkippedRow};
pub use error::{ImportError, ImportResult};
pub use exporter::export_csv;
pub use file_parser::{BomFileParser, CsvParser, ExcelParser, RawRow, UniversalFileParser};
