//! 命令行参数
//!
//! 只负责解析参数和覆盖配置，具体逻辑交给编排层

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "paper-generator",
    version,
    about = "Assemble bilingual exam papers from a question bank."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 组卷：搜索 → 随机抽题 → 导出并保存
    Generate(GenerateArgs),

    /// 列出某年级（可选科目）下已保存的试卷
    List(ListArgs),

    /// 列出已保存试卷涉及的年级与科目
    Grades,

    /// 列出题库中某科目某年级的章节
    Chapters(ChaptersArgs),

    /// 把已保存的试卷文件复制到指定位置
    Download(DownloadArgs),
}

/// `generate` 参数，未给出的项沿用配置
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// 科目，例如 biology
    #[arg(long)]
    pub subject: Option<String>,

    /// 年级，例如 9th / inter-1
    #[arg(long)]
    pub grade: Option<String>,

    /// 章节，可重复
    #[arg(long = "chapter")]
    pub chapters: Vec<String>,

    /// 分区，例如 "mcq:10:1,short:5:2,long:2:5"
    #[arg(long)]
    pub sections: Option<String>,

    /// 随机种子
    #[arg(long)]
    pub seed: Option<u64>,

    /// 直接使用搜索结果，不做随机抽题
    #[arg(long)]
    pub no_shuffle: bool,

    /// 导出前打印预览
    #[arg(long)]
    pub preview: bool,

    /// 只输出英文
    #[arg(long)]
    pub english_only: bool,
}

impl GenerateArgs {
    /// 用命令行参数覆盖配置
    pub fn apply(&self, config: &mut Config) {
        if let Some(subject) = &self.subject {
            config.subject = subject.clone();
        }
        if let Some(grade) = &self.grade {
            config.grade = grade.clone();
        }
        if !self.chapters.is_empty() {
            config.chapters = self.chapters.join("|");
        }
        if let Some(sections) = &self.sections {
            config.sections = sections.clone();
        }
        if self.seed.is_some() {
            config.shuffle_seed = self.seed;
        }
        if self.english_only {
            config.dual_medium = false;
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub grade: String,

    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChaptersArgs {
    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub grade: String,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// 试卷编号
    #[arg(long)]
    pub id: String,

    /// 目标文件或目录
    #[arg(long, default_value = ".")]
    pub to: String,
}
