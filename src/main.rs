// ==========================================
// 公共采购流程管理 - 命令行入口
// ==========================================
// 用法: licitacao-import [db_path] <process_id> <file>
// 输出: ImportItemsResponse（JSON，写入 stdout）
// ==========================================

use anyhow::{bail, Context, Result};
use licitacao_import::api::ImportApi;
use licitacao_import::config::get_default_db_path;
use licitacao_import::logging;

fn usage() -> String {
    format!(
        "{} {}\n用法: licitacao-import [db_path] <process_id> <file>\n未指定 db_path 时使用 LICITACAO_DB_PATH 或用户数据目录",
        licitacao_import::APP_NAME,
        licitacao_import::VERSION
    )
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, process_arg, file_path) = match args.as_slice() {
        [process_id, file] => (get_default_db_path(), process_id.clone(), file.clone()),
        [db, process_id, file] => (db.clone(), process_id.clone(), file.clone()),
        _ => bail!(usage()),
    };

    let process_id: i64 = process_arg
        .trim()
        .parse()
        .with_context(|| format!("无效的流程ID: {}", process_arg))?;

    tracing::info!(db_path = %db_path, process_id, file = %file_path, "开始导入");

    let api = ImportApi::new(db_path);
    let response = api
        .import_items(process_id, &file_path)
        .with_context(|| format!("导入失败: {}", file_path))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
