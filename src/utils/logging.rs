use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n涂色书生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 追加一行到日志文件
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(theme: &str, page_count: i64, model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 涂色书生成模式");
    info!("🎨 主题: {}", theme);
    info!("📄 页数: {} (含封面)", page_count);
    info!("🤖 模型: {}", model);
    info!("{}", "=".repeat(60));
}

/// 记录批次计划
///
/// # 参数
/// - `pages_to_generate`: 内页数量
/// - `total_batches`: 批次总数
pub fn log_batch_plan(pages_to_generate: usize, total_batches: usize) {
    info!("✓ 封面之外共需生成 {} 页", pages_to_generate);
    info!("📋 将分 {} 批生成，每批最多 4 张", total_batches);
    info!("💡 每批完成后再开始下一批\n");
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始页码
/// - `end`: 结束页码
/// - `total`: 总页数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始生成第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批页码: {}-{} / 共 {} 页", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, received: usize, requested: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 收到 {}/{} 张", batch_num, received, requested);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `rendered`: 已渲染页数
/// - `total`: 请求总页数
/// - `succeeded`: 是否成功
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(rendered: usize, total: usize, succeeded: bool, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 生成完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if succeeded {
        info!("✅ 成功: {}/{}", rendered, total);
    } else {
        info!("❌ 失败: 已渲染 {}/{}", rendered, total);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
