//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、加载题库、打开试卷记录
//! 2. **命令分发**：generate / list / grades / chapters / download
//! 3. **资源管理**：唯一持有题库、存储与导出器的模块
//! 4. **全局统计**：命令结束后输出耗时与日志位置

use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::cli::Commands;
use crate::clients::StaticQuestionBank;
use crate::config::Config;
use crate::infrastructure::{download_paper, ArtifactWriter, JsonFileStore, PaperStore};
use crate::models::{load_bank_folder, Grade, Subject};
use crate::orchestrator::paper_processor::{generate_paper, GenerateOptions};
use crate::services::{PaperRenderer, TextPaperExporter};
use crate::utils::logging::{
    init_log_file, log_bank_loaded, log_startup, print_final_stats, print_saved_papers,
};

/// 应用主结构
pub struct App {
    config: Config,
    bank: StaticQuestionBank,
    store: JsonFileStore,
    exporter: TextPaperExporter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config.bank_folder, &config.store_file);

        info!("\n📁 正在加载题库...");
        let bank_file = load_bank_folder(&config.bank_folder).await?;
        let mut bank = StaticQuestionBank::from_bank_file(bank_file)
            .with_latency(Duration::from_millis(config.bank_latency_ms));
        if let Some(seed) = config.shuffle_seed {
            bank = bank.with_seed(seed);
        }
        log_bank_loaded(bank.bank_count(), bank.question_count());

        let store = JsonFileStore::open(&config.store_file)
            .with_context(|| format!("无法打开试卷记录: {}", config.store_file))?;

        let exporter = TextPaperExporter::new(
            PaperRenderer::new(config.dual_medium),
            ArtifactWriter::new(&config.output_dir),
        );

        Ok(Self {
            config,
            bank,
            store,
            exporter,
        })
    }

    /// 运行命令
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        let started = Instant::now();
        let name = command_name(&command);

        match command {
            Commands::Generate(args) => {
                let options = GenerateOptions {
                    shuffle: !args.no_shuffle,
                    preview: args.preview,
                };
                generate_paper(
                    &self.config,
                    &self.bank,
                    &self.exporter,
                    &mut self.store,
                    options,
                )
                .await?;
            }
            Commands::List(args) => {
                let grade = grade_label(&args.grade);
                let papers = match args.subject.as_deref() {
                    Some(subject) => self
                        .store
                        .list_by_grade_and_subject(&grade, &subject_name(subject)),
                    None => self.store.list_by_grade(&grade),
                };
                print_saved_papers(&papers);
            }
            Commands::Grades => {
                let grades = self.store.grades();
                if grades.is_empty() {
                    warn!("⚠️ 还没有保存任何试卷");
                }
                for grade in grades {
                    info!("📚 {}: {}", grade, self.store.subjects(&grade).join(", "));
                }
            }
            Commands::Chapters(args) => {
                let subject = Subject::find(&args.subject)
                    .with_context(|| format!("未知科目: {}", args.subject))?;
                let grade = Grade::from_key(&args.grade)
                    .with_context(|| format!("未知年级: {}", args.grade))?;
                let chapters = self.bank.chapters(subject.key(), grade.key());
                if chapters.is_empty() {
                    warn!("⚠️ 题库中没有 {} {} 的章节", subject, grade);
                }
                for chapter in chapters {
                    info!("  • {}", chapter);
                }
            }
            Commands::Download(args) => {
                download_paper(&self.store, &args.id, Path::new(&args.to))?;
            }
        }

        print_final_stats(name, started.elapsed(), &self.config.output_log_file);
        Ok(())
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate(_) => "generate",
        Commands::List(_) => "list",
        Commands::Grades => "grades",
        Commands::Chapters(_) => "chapters",
        Commands::Download(_) => "download",
    }
}

/// 已存试卷按年级显示名分组，命令行也接受题库键名
fn grade_label(value: &str) -> String {
    Grade::from_key(value)
        .map(|grade| grade.label().to_string())
        .unwrap_or_else(|| value.to_string())
}

fn subject_name(value: &str) -> String {
    Subject::find(value)
        .map(|subject| subject.name().to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_keys_accept_bank_keys_and_labels() {
        assert_eq!(grade_label("inter-1"), "Inter-I");
        assert_eq!(grade_label("9th"), "9th");
        assert_eq!(grade_label("unknown"), "unknown");
        assert_eq!(subject_name("biology"), "Biology");
        assert_eq!(subject_name("Nope"), "Nope");
    }
}
