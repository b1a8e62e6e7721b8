//! 组卷会话 - 流程层
//!
//! 核心职责：定义"一张试卷"从配置到导出的完整流程
//!
//! 流程顺序：
//! 1. 添加 / 删除分区
//! 2. 搜索 → 候选题目池（默认即为已选题目）
//! 3. 随机抽题（可选，可反复）→ 确认选题
//! 4. 预览 → 导出并保存
//!
//! 任何一步失败都不会改动会话已有的状态

use rand::Rng;
use tracing::{info, warn};

use crate::clients::QuestionBank;
use crate::error::{AppResult, AssemblyError};
use crate::infrastructure::PaperStore;
use crate::models::{PaperHeader, PaperTotals, Question, SavedPaper, SectionRequest, SelectionSummary};
use crate::services::{
    commit, compute_totals, randomize, validate_for_export, PaperAssembler, PaperExporter, PaperRenderer,
};

/// 组卷会话
///
/// - 独占本次组卷的分区、候选池与已选题目
/// - 不持有题库、存储等资源，由调用方按需传入
pub struct PaperSession {
    header: PaperHeader,
    sections: Vec<SectionRequest>,
    available: Vec<Question>,
    randomized: Vec<Question>,
    selected: Vec<Question>,
    show_preview: bool,
    assembler: PaperAssembler,
    renderer: PaperRenderer,
}

impl PaperSession {
    pub fn new(header: PaperHeader, assembler: PaperAssembler, renderer: PaperRenderer) -> Self {
        Self {
            header,
            sections: Vec::new(),
            available: Vec::new(),
            randomized: Vec::new(),
            selected: Vec::new(),
            show_preview: false,
            assembler,
            renderer,
        }
    }

    pub fn header(&self) -> &PaperHeader {
        &self.header
    }

    pub fn sections(&self) -> &[SectionRequest] {
        &self.sections
    }

    /// 添加分区
    pub fn add_section(&mut self, section: SectionRequest) -> AppResult<()> {
        if section.count == 0 || section.marks_per_question == 0 {
            return Err(AssemblyError::InvalidSection {
                count: section.count,
                marks: section.marks_per_question,
            }
            .into());
        }
        info!("[{}] ➕ 添加分区: {}", self.header.title(), section);
        self.sections.push(section);
        Ok(())
    }

    /// 删除分区
    pub fn remove_section(&mut self, index: usize) -> AppResult<SectionRequest> {
        if index >= self.sections.len() {
            return Err(AssemblyError::SectionIndexOutOfRange {
                index,
                len: self.sections.len(),
            }
            .into());
        }
        let removed = self.sections.remove(index);
        info!("[{}] ➖ 删除分区: {}", self.header.title(), removed);
        Ok(removed)
    }

    /// 当前分区的总分与总题数
    pub fn totals(&self) -> PaperTotals {
        compute_totals(&self.sections)
    }

    /// 搜索：从题库取候选题目，成功后候选池即为已选题目，并清空随机结果
    pub async fn search<B: QuestionBank>(&mut self, bank: &B) -> AppResult<SelectionSummary> {
        let pool = self
            .assembler
            .fetch_candidates(
                bank,
                &self.sections,
                self.header.subject.key(),
                self.header.grade.key(),
                &self.header.chapters,
            )
            .await
            .inspect_err(|e| warn!("[{}] ⚠️ 搜索失败: {}", self.header.title(), e))?;

        let summary = SelectionSummary::from_questions(&pool);
        self.selected = pool.clone();
        self.available = pool;
        self.randomized.clear();

        info!("[{}] ✓ Selected: {}", self.header.title(), summary);
        Ok(summary)
    }

    /// 随机抽题，候选池为空时不做任何事
    pub fn random_select<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SelectionSummary> {
        if self.available.is_empty() {
            return None;
        }

        self.randomized = randomize(&self.available, &self.sections, rng);
        let summary = SelectionSummary::from_questions(&self.randomized);
        info!("[{}] 🔀 随机抽题: {}", self.header.title(), summary);
        Some(summary)
    }

    /// 确认随机抽出的题目，随机结果为空时不做任何事
    pub fn add_questions(&mut self) -> Option<SelectionSummary> {
        if self.randomized.is_empty() {
            return None;
        }

        self.selected = commit(&self.randomized, &self.sections, &self.selected);
        self.randomized.clear();

        let summary = SelectionSummary::from_questions(&self.selected);
        info!("[{}] ✓ Added: {}", self.header.title(), summary);
        Some(summary)
    }

    /// 当前展示的题目：有随机结果时展示随机结果，否则展示候选池
    pub fn displayed_questions(&self) -> &[Question] {
        if self.randomized.is_empty() {
            &self.available
        } else {
            &self.randomized
        }
    }

    pub fn available_questions(&self) -> &[Question] {
        &self.available
    }

    pub fn selected_questions(&self) -> &[Question] {
        &self.selected
    }

    /// 进入预览
    pub fn open_preview(&mut self) {
        self.show_preview = true;
    }

    pub fn is_previewing(&self) -> bool {
        self.show_preview
    }

    /// 预览文本（含参考答案）
    pub fn preview(&self) -> String {
        self.renderer
            .render_preview(&self.header, &self.selected, &self.totals())
    }

    /// 导出并保存试卷
    ///
    /// 已选题目为空或与分区要求不符时拒绝导出；导出或保存失败时会话状态不变，可重试。
    /// 保存失败时撤回已导出的文件
    pub async fn download<E: PaperExporter, S: PaperStore + ?Sized>(
        &self,
        exporter: &E,
        store: &mut S,
    ) -> AppResult<SavedPaper> {
        if self.selected.is_empty() {
            return Err(AssemblyError::NoQuestionsSelected.into());
        }
        validate_for_export(&self.selected, &self.sections)
            .inspect_err(|e| warn!("[{}] ⚠️ {}", self.header.title(), e))?;

        let artifact = exporter
            .export(&self.header, &self.selected, &self.totals())
            .await?;

        let paper = SavedPaper::from_export(&self.header, &self.selected, &artifact);
        if let Err(e) = store.add(paper.clone()) {
            warn!("[{}] ⚠️ 保存失败，撤回导出文件: {}", self.header.title(), artifact.uri);
            exporter.discard(&artifact).await;
            return Err(e);
        }

        info!(
            "[{}] ✅ Paper downloaded and saved successfully: {}",
            self.header.title(),
            paper.file_name
        );
        Ok(paper)
    }
}
