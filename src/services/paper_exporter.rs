//! 试卷导出服务 - 业务能力层
//!
//! 把最终选题渲染成文件并写到输出目录

use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::ArtifactWriter;
use crate::models::{ExportedArtifact, PaperHeader, PaperTotals, Question};
use crate::services::paper_renderer::PaperRenderer;

/// 试卷导出能力
///
/// 失败时不产生任何文件
pub trait PaperExporter {
    fn export(
        &self,
        header: &PaperHeader,
        selection: &[Question],
        totals: &PaperTotals,
    ) -> impl Future<Output = AppResult<ExportedArtifact>> + Send;

    /// 撤回已导出的文件（导出后保存失败时调用）
    fn discard(&self, artifact: &ExportedArtifact) -> impl Future<Output = ()> + Send;
}

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// 文本版式导出
pub struct TextPaperExporter {
    renderer: PaperRenderer,
    writer: ArtifactWriter,
}

impl TextPaperExporter {
    pub fn new(renderer: PaperRenderer, writer: ArtifactWriter) -> Self {
        Self { renderer, writer }
    }
}

impl PaperExporter for TextPaperExporter {
    async fn export(
        &self,
        header: &PaperHeader,
        selection: &[Question],
        totals: &PaperTotals,
    ) -> AppResult<ExportedArtifact> {
        info!("📤 正在导出试卷: {}", header.title());

        let document = self.renderer.render_document(header, selection, totals);
        let file_name = file_name_for(header, chrono::Utc::now().timestamp_millis());

        let artifact = self.writer.write(&file_name, document.as_bytes()).await?;
        info!(
            "✓ 试卷已导出: {} ({} 字节)",
            artifact.uri, artifact.bytes_written
        );

        Ok(artifact)
    }

    async fn discard(&self, artifact: &ExportedArtifact) {
        self.writer.remove(artifact).await;
    }
}

/// 导出文件名，例如 `biology-9th-1718000000000.txt`
pub fn file_name_for(header: &PaperHeader, timestamp_millis: i64) -> String {
    format!(
        "{}-{}-{}.txt",
        slug(header.subject.name()),
        slug(header.grade.label()),
        timestamp_millis
    )
}

fn slug(text: &str) -> String {
    let lower = text.to_lowercase();
    SLUG_RE.replace_all(&lower, "-").trim_matches('-').to_string()
}
