//! 试卷记录存储 - 基础设施层
//!
//! 持有已保存试卷的状态（年级 → 科目 → 试卷列表），只暴露追加和查询能力

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, StoreError};
use crate::models::SavedPaper;

/// 已保存试卷的存储能力
///
/// 只追加，不修改、不删除
pub trait PaperStore {
    /// 追加一份试卷
    fn add(&mut self, paper: SavedPaper) -> AppResult<()>;

    /// 某年级下所有科目的试卷
    fn list_by_grade(&self, grade: &str) -> Vec<SavedPaper>;

    /// 某年级某科目的试卷
    fn list_by_grade_and_subject(&self, grade: &str, subject: &str) -> Vec<SavedPaper>;

    /// 已有试卷的年级
    fn grades(&self) -> Vec<String>;

    /// 某年级已有试卷的科目
    fn subjects(&self, grade: &str) -> Vec<String>;

    /// 按编号查找试卷
    fn find(&self, id: &str) -> Option<SavedPaper>;
}

/// 存储的完整状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedPapersState {
    #[serde(default)]
    pub papers: BTreeMap<String, BTreeMap<String, Vec<SavedPaper>>>,
}

impl SavedPapersState {
    fn add(&mut self, paper: SavedPaper) {
        self.papers
            .entry(paper.metadata.grade.clone())
            .or_default()
            .entry(paper.metadata.subject.clone())
            .or_default()
            .push(paper);
    }

    fn list_by_grade(&self, grade: &str) -> Vec<SavedPaper> {
        self.papers
            .get(grade)
            .map(|subjects| subjects.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    fn list_by_grade_and_subject(&self, grade: &str, subject: &str) -> Vec<SavedPaper> {
        self.papers
            .get(grade)
            .and_then(|subjects| subjects.get(subject))
            .cloned()
            .unwrap_or_default()
    }

    fn grades(&self) -> Vec<String> {
        self.papers.keys().cloned().collect()
    }

    fn subjects(&self, grade: &str) -> Vec<String> {
        self.papers
            .get(grade)
            .map(|subjects| subjects.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn find(&self, id: &str) -> Option<SavedPaper> {
        self.papers
            .values()
            .flat_map(|subjects| subjects.values())
            .flatten()
            .find(|paper| paper.id == id)
            .cloned()
    }
}

/// 内存存储（用于测试或不需要持久化的场景）
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: SavedPapersState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaperStore for MemoryStore {
    fn add(&mut self, paper: SavedPaper) -> AppResult<()> {
        self.state.add(paper);
        Ok(())
    }

    fn list_by_grade(&self, grade: &str) -> Vec<SavedPaper> {
        self.state.list_by_grade(grade)
    }

    fn list_by_grade_and_subject(&self, grade: &str, subject: &str) -> Vec<SavedPaper> {
        self.state.list_by_grade_and_subject(grade, subject)
    }

    fn grades(&self) -> Vec<String> {
        self.state.grades()
    }

    fn subjects(&self, grade: &str) -> Vec<String> {
        self.state.subjects(grade)
    }

    fn find(&self, id: &str) -> Option<SavedPaper> {
        self.state.find(id)
    }
}

/// JSON 文件存储
///
/// 每次追加后整体写回文件；写入失败时内存状态保持追加前的样子
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: SavedPapersState,
}

impl JsonFileStore {
    /// 打开存储文件，文件不存在时视为空
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let state = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| load_failed(&path, e))?;
            serde_json::from_str(&content).map_err(|e| load_failed(&path, e))?
        } else {
            debug!("试卷记录文件不存在，使用空记录: {}", path.display());
            SavedPapersState::default()
        };

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &SavedPapersState) -> AppResult<()> {
        let display = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::store_persist_failed(&display, e))?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| AppError::store_persist_failed(&display, e))?;
        fs::write(&self.path, json).map_err(|e| AppError::store_persist_failed(&display, e))?;

        Ok(())
    }
}

fn load_failed(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::Store(StoreError::LoadFailed {
        path: path.display().to_string(),
        source: Box::new(source),
    })
}

impl PaperStore for JsonFileStore {
    fn add(&mut self, paper: SavedPaper) -> AppResult<()> {
        let id = paper.id.clone();
        let mut next = self.state.clone();
        next.add(paper);

        self.persist(&next)?;
        self.state = next;

        info!("🗄️ 试卷记录已写入: {} ({})", id, self.path.display());
        Ok(())
    }

    fn list_by_grade(&self, grade: &str) -> Vec<SavedPaper> {
        self.state.list_by_grade(grade)
    }

    fn list_by_grade_and_subject(&self, grade: &str, subject: &str) -> Vec<SavedPaper> {
        self.state.list_by_grade_and_subject(grade, subject)
    }

    fn grades(&self) -> Vec<String> {
        self.state.grades()
    }

    fn subjects(&self, grade: &str) -> Vec<String> {
        self.state.subjects(grade)
    }

    fn find(&self, id: &str) -> Option<SavedPaper> {
        self.state.find(id)
    }
}

/// 将已保存试卷的文件复制到目标位置
pub fn download_paper<S: PaperStore + ?Sized>(store: &S, id: &str, dest: &Path) -> AppResult<PathBuf> {
    let paper = store.find(id).ok_or_else(|| StoreError::PaperNotFound { id: id.to_string() })?;

    let source = PathBuf::from(&paper.artifact);
    if !source.exists() {
        return Err(StoreError::ArtifactMissing {
            path: paper.artifact.clone(),
        }
        .into());
    }

    let target = if dest.is_dir() {
        dest.join(&paper.file_name)
    } else {
        dest.to_path_buf()
    };

    fs::copy(&source, &target)?;
    info!("📥 试卷已下载: {} → {}", paper.file_name, target.display());

    Ok(target)
}
