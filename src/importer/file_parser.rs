// ==========================================
// BOM 零件核对系统 - 文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 按列位置的原始行（首行表头不输出）
// 列序: bom_code, part_reference, part_name, part_description, quantity
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 原始行: 已 trim 的单元格文本
pub type RawRow = Vec<String>;

/// 文件解析接口
pub trait BomFileParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|v| v.is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl BomFileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致，由导入器跳过短行
            .from_reader(file);

        let mut records = reader.records();
        match records.next() {
            Some(header) => {
                header?;
            }
            None => return Err(ImportError::EmptyFile),
        }

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            let row: RawRow = record.iter().map(|v| v.trim().to_string()).collect();
            if is_blank(&row) {
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表
pub struct ExcelParser;

impl BomFileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut iter = range.rows();
        if iter.next().is_none() {
            return Err(ImportError::EmptyFile);
        }

        let mut rows = Vec::new();
        for data_row in iter {
            let row: RawRow = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();
            if is_blank(&row) {
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl BomFileParser for UniversalFileParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_rows(file_path),
            "xlsx" | "xls" => ExcelParser.parse_rows(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_skips_header_and_blank_rows() {
        let file = csv_file(
            "bom_code,part_reference,part_name,part_description,quantity\n\
             BOM-1, R1 ,Screw-M3,Steel screw,10\n\
             ,,,,\n\
             BOM-1,R2,Bracket-A,,2\n",
        );

        let rows = CsvParser.parse_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["BOM-1", "R1", "Screw-M3", "Steel screw", "10"]);
        assert_eq!(rows[1][2], "Bracket-A");
    }

    #[test]
    fn test_csv_parser_keeps_short_rows() {
        let file = csv_file("h1,h2,h3,h4,h5\nBOM-1,R1,Nut\n");
        let rows = CsvParser.parse_rows(file.path()).unwrap();
        assert_eq!(rows, vec![vec!["BOM-1", "R1", "Nut"]]);
    }

    #[test]
    fn test_empty_csv_is_error() {
        let file = csv_file("");
        assert!(matches!(
            CsvParser.parse_rows(file.path()),
            Err(ImportError::EmptyFile)
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = CsvParser.parse_rows(Path::new("/nonexistent/bom.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse_rows(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_universal_parser_dispatches_csv() {
        let file = csv_file("a,b,c,d,e\nBOM-1,R1,Nut,,4\n");
        let rows = UniversalFileParser.parse_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
