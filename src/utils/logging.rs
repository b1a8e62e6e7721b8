/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{PaperTotals, SavedPaper, SectionRequest};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info 级别。
/// 重复调用不会报错（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n组卷日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(bank_folder: &str, store_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷生成模式");
    info!("📚 题库目录: {}", bank_folder);
    info!("🗄️ 试卷记录: {}", store_file);
    info!("{}", "=".repeat(60));
}

/// 记录题库加载信息
///
/// # 参数
/// - `banks`: 题库数量（科目-年级）
/// - `questions`: 题目总数
pub fn log_bank_loaded(banks: usize, questions: usize) {
    info!("✓ 已加载 {} 个题库, 共 {} 道题目", banks, questions);
}

/// 记录分区配置
pub fn log_sections(sections: &[SectionRequest], totals: &PaperTotals) {
    info!("\n{}", "─".repeat(60));
    for (i, section) in sections.iter().enumerate() {
        info!("📋 分区 {}: {}", i + 1, section);
    }
    info!(
        "📊 总分: {} | 总题数: {}",
        totals.total_marks, totals.total_questions
    );
    info!("{}", "─".repeat(60));
}

/// 记录试卷保存结果
pub fn log_paper_saved(paper: &SavedPaper) {
    info!("\n{}", "=".repeat(60));
    info!("✅ 试卷已生成并保存");
    info!("📄 标题: {}", paper.title);
    info!("🆔 编号: {}", paper.id);
    info!("📁 文件: {}", paper.artifact);
    info!("{}", "=".repeat(60));
}

/// 打印已保存试卷列表
pub fn print_saved_papers(papers: &[SavedPaper]) {
    if papers.is_empty() {
        info!("没有找到已保存的试卷，请先生成试卷");
        return;
    }

    info!("📚 共 {} 份试卷", papers.len());
    for paper in papers {
        info!("  • {}", paper);
    }
}

/// 输出最终统计
pub fn print_final_stats(command: &str, elapsed: std::time::Duration, log_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 命令 `{}` 执行完成", command);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("⏱️ 耗时: {:.2} 秒", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
