use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bom-reconcile")]
#[command(version, about = "BOM 零件核对系统 - 检测结果与物料清单比对、差异处理跟踪", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// 检测图片并与 BOM 比对
    Detect {
        bom_code: String,

        /// 图片路径
        image: PathBuf,
    },

    /// 查看当前比对结果
    Result { bom_code: String },

    /// 删除比对结果与差异项（BOM 明细保留）
    Reset { bom_code: String },

    /// 由比对结果定稿（可只选部分零件）
    Finalize {
        bom_code: String,

        /// 只定稿这些零件
        parts: Vec<String>,
    },

    /// 按给定差异项批次定稿 ({"items": [...]})
    FinalizeItems {
        /// JSON 文件
        file: PathBuf,
    },

    /// 列出差异项
    Items { bom_code: Option<String> },

    /// 更新差异项状态 (BARU_MASUK/DITINDAKLANJUTI/SELESAI)
    SetStatus { id: i64, status: String },

    /// 列出 BOM 明细及检测状态
    Boms,

    /// 导入 BOM 明细 (.csv/.xlsx/.xls)
    ImportBom { file: PathBuf },

    /// 导出 BOM 明细为 CSV（默认输出到标准输出）
    ExportBom {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 查看已存配置
    Config,

    /// 写入配置
    ConfigSet { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from(["bom-reconcile", "detect", "BOM-1", "board.jpg"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Detect {
                bom_code: "BOM-1".to_string(),
                image: PathBuf::from("board.jpg"),
            }
        );
    }

    #[test]
    fn test_parse_finalize_with_selected_parts() {
        let cli =
            Cli::try_parse_from(["bom-reconcile", "finalize", "BOM-1", "Screw-M3", "Washer-X"]).unwrap();
        match cli.command {
            Commands::Finalize { bom_code, parts } => {
                assert_eq!(bom_code, "BOM-1");
                assert_eq!(parts, vec!["Screw-M3", "Washer-X"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_set_status_requires_integer_id() {
        let cli = Cli::try_parse_from(["bom-reconcile", "set-status", "7", "SELESAI"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::SetStatus { id: 7, status: "SELESAI".to_string() }
        );
        assert!(Cli::try_parse_from(["bom-reconcile", "set-status", "abc", "SELESAI"]).is_err());
    }

    #[test]
    fn test_optional_arguments() {
        let cli = Cli::try_parse_from(["bom-reconcile", "items"]).unwrap();
        assert_eq!(cli.command, Commands::Items { bom_code: None });

        let cli = Cli::try_parse_from(["bom-reconcile", "export-bom", "-o", "out.csv"]).unwrap();
        assert_eq!(cli.command, Commands::ExportBom { output: Some(PathBuf::from("out.csv")) });

        assert!(Cli::try_parse_from(["bom-reconcile", "detect", "BOM-1"]).is_err());
        assert!(Cli::try_parse_from(["bom-reconcile", "unknown"]).is_err());
    }
}
