// ==========================================
// BOM 导入导出集成测试
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod bom_import_export_test {
    use bom_reconcile::api::ApiError;
    use bom_reconcile::domain::types::RefinalizePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::test_helpers::TestEnv;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_import_then_export_roundtrip_through_repository() {
        let env = TestEnv::new(RefinalizePolicy::Reject);
        let csv = write_csv(
            "bom_code,part_reference,part_name,part_description,quantity\n\
             BOM-7,R1,Resistor-10k,\"10k, 1%\",4\n\
             BOM-7,R2,Resistor-10k,,2\n\
             BOM-7,C1,Cap-100n,ceramic,abc\n\
             BOM-7,U1,MCU,,1\n",
        );

        let report = env.bom_api.import_file(csv.path()).unwrap();
        assert_eq!(report.imported, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.skipped_rows[0].row_number, 4);

        // 重复零件求和，按零件名排序
        let required = env.bom_api.required_quantities("BOM-7").unwrap();
        assert_eq!(required.get("Resistor-10k"), Some(&6));
        assert_eq!(required.get("MCU"), Some(&1));
        assert_eq!(required.keys().cloned().collect::<Vec<_>>(), vec!["MCU", "Resistor-10k"]);

        let mut out = Vec::new();
        let written = env.bom_api.export_csv(&mut out).unwrap();
        assert_eq!(written, 3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("bom_code,"));
        assert!(text.contains("\"10k, 1%\""));
    }

    #[test]
    fn test_import_rejects_unsupported_extension() {
        let env = TestEnv::new(RefinalizePolicy::Reject);
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"whatever").unwrap();

        let err = env.bom_api.import_file(file.path()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
