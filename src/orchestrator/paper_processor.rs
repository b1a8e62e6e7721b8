//! 单张试卷处理器 - 编排层
//!
//! 按配置走完一张试卷的完整流程：
//! 添加分区 → 搜索 → 随机抽题 / 确认 → 预览 → 导出并保存

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::clients::QuestionBank;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::PaperStore;
use crate::models::{PaperHeader, SavedPaper};
use crate::services::{PaperAssembler, PaperExporter, PaperRenderer};
use crate::utils::logging::{log_paper_saved, log_sections};
use crate::workflow::PaperSession;

/// 单张试卷的处理选项
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// 是否随机抽题后再确认
    pub shuffle: bool,
    /// 导出前是否打印预览
    pub preview: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            shuffle: true,
            preview: false,
        }
    }
}

/// 处理单张试卷
///
/// # 返回
/// 保存成功的试卷记录
pub async fn generate_paper<B, E, S>(
    config: &Config,
    bank: &B,
    exporter: &E,
    store: &mut S,
    options: GenerateOptions,
) -> AppResult<SavedPaper>
where
    B: QuestionBank,
    E: PaperExporter,
    S: PaperStore + ?Sized,
{
    let header = PaperHeader::new(
        config.parsed_subject()?,
        config.parsed_grade()?,
        config.parsed_chapters(),
    );
    info!("\n📝 开始组卷: {}", header.title());

    let mut session = PaperSession::new(
        header,
        PaperAssembler::new(config.verbose_logging),
        PaperRenderer::new(config.dual_medium),
    );

    for section in config.parsed_sections()? {
        session.add_section(section)?;
    }
    log_sections(session.sections(), &session.totals());

    session.search(bank).await?;

    if options.shuffle {
        let mut rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        session.random_select(&mut rng);
        session.add_questions();
    }

    if options.preview {
        session.open_preview();
        println!("{}", session.preview());
    }

    let paper = session.download(exporter, store).await?;
    log_paper_saved(&paper);

    Ok(paper)
}
