// ==========================================
// BOM 零件核对系统 - 命令行入口
// ==========================================
// 用法: bom-reconcile <命令> [参数...]（bom-reconcile --help 查看全部命令）
// 数据库: BOM_RECONCILE_DB_PATH 或用户数据目录
// ==========================================

mod cli;

use anyhow::{anyhow, Context};
use bom_reconcile::api::ApiResult;
use bom_reconcile::app::{get_default_db_path, AppState};
use bom_reconcile::domain::FinalizeRequest;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 成功时打印 JSON；业务错误原样返回,由调用方输出错误响应
fn emit<T: Serialize>(result: ApiResult<T>) -> anyhow::Result<ApiResult<()>> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(Ok(()))
        }
        Err(err) => Ok(Err(err)),
    }
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<ApiResult<()>> {
    match command {
        Commands::Detect { bom_code, image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("无法读取图片: {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            emit(
                state
                    .detection_api
                    .detect_and_compare(&bom_code, &bytes, &file_name)
                    .await,
            )
        }
        Commands::Result { bom_code } => emit(state.detection_api.get_result(&bom_code)),
        Commands::Reset { bom_code } => emit(state.detection_api.reset(&bom_code)),
        Commands::Finalize { bom_code, parts } => {
            let selected = if parts.is_empty() { None } else { Some(parts.as_slice()) };
            emit(state.action_item_api.finalize_from_result(&bom_code, selected))
        }
        Commands::FinalizeItems { file } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("无法读取文件: {}", file.display()))?;
            let request: FinalizeRequest = serde_json::from_str(&body)
                .with_context(|| format!("差异项批次格式错误: {}", file.display()))?;
            emit(state.action_item_api.finalize(&request.items))
        }
        Commands::Items { bom_code } => match bom_code {
            Some(bom_code) => emit(state.action_item_api.list_by_bom_code(&bom_code)),
            None => emit(state.action_item_api.list()),
        },
        Commands::SetStatus { id, status } => emit(state.action_item_api.update_status(id, &status)),
        Commands::Boms => emit(state.bom_api.list_with_status()),
        Commands::ImportBom { file } => emit(state.bom_api.import_file(&file)),
        Commands::ExportBom { output } => match output {
            Some(out_path) => {
                let file = std::fs::File::create(&out_path)
                    .with_context(|| format!("无法创建文件: {}", out_path.display()))?;
                Ok(state.bom_api.export_csv(file).map(|count| {
                    tracing::info!(count, path = %out_path.display(), "BOM 明细已导出");
                }))
            }
            None => Ok(state.bom_api.export_csv(std::io::stdout().lock()).map(|_| ())),
        },
        Commands::Config => {
            let snapshot = state.config.get_config_snapshot()?;
            println!("{}", snapshot);
            Ok(Ok(()))
        }
        Commands::ConfigSet { key, value } => {
            Ok(state.config.set(&key, &value).map_err(Into::into))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bom_reconcile::logging::init();

    let db_path = get_default_db_path();
    tracing::debug!("{} v{}，数据库: {}", bom_reconcile::APP_NAME, bom_reconcile::VERSION, db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let locale = state.config.locale()?;
    bom_reconcile::i18n::set_locale(&locale);

    if let Err(err) = run(&state, cli.command).await? {
        eprintln!("{}", serde_json::to_string_pretty(&err.to_response())?);
        std::process::exit(1);
    }
    Ok(())
}
