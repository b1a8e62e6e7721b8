use thiserror::Error;

use crate::models::QuestionType;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
///
/// 所有错误都可以在会话边界恢复：上报后会话的配置状态保持不变
#[derive(Debug, Error)]
pub enum AppError {
    /// 题库查询错误
    #[error("题库错误: {0}")]
    Bank(#[from] BankError),
    /// 组卷逻辑错误
    #[error("组卷错误: {0}")]
    Assembly(#[from] AssemblyError),
    /// 试卷导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 试卷存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 题库查询错误
#[derive(Debug, Error)]
pub enum BankError {
    /// 查询失败
    #[error("查询题库 {subject}-{grade} 失败: {source}")]
    QueryFailed {
        subject: String,
        grade: String,
        source: BoxError,
    },
}

/// 单个题型的数量统计（请求 vs 实际）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTally {
    pub question_type: QuestionType,
    pub requested: usize,
    pub fetched: usize,
}

impl std::fmt::Display for TypeTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} 需要 {} 道, 实际 {} 道",
            self.question_type, self.requested, self.fetched
        )
    }
}

/// 组卷逻辑错误
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// 题库无法提供所需的题型数量
    #[error("无法获取所需数量的题目: {}", format_tallies(.mismatches))]
    CountMismatch { mismatches: Vec<TypeTally> },
    /// 已选题目与分区要求不一致
    #[error("题目数量与要求不符 ({question_type} 需要 {expected} 道, 已选 {actual} 道), 请重新选题")]
    IncompleteSelection {
        question_type: QuestionType,
        expected: usize,
        actual: usize,
    },
    /// 没有配置任何分区
    #[error("尚未添加任何题目分区")]
    EmptySections,
    /// 没有已选题目
    #[error("尚未选择任何题目")]
    NoQuestionsSelected,
    /// 分区参数非法
    #[error("分区参数非法: 数量 {count}, 每题分值 {marks} (均须 ≥ 1)")]
    InvalidSection { count: u32, marks: u32 },
    /// 分区描述无法解析
    #[error("无法解析分区描述: '{spec}' (格式: 题型:数量:分值)")]
    InvalidSectionSpec { spec: String },
    /// 分区索引超出范围
    #[error("分区索引 {index} 超出范围 (共 {len} 个)")]
    SectionIndexOutOfRange { index: usize, len: usize },
}

fn format_tallies(tallies: &[TypeTally]) -> String {
    tallies
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// 试卷导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 输出目录不可用
    #[error("无法创建输出目录 {path}: {source}")]
    OutputDirUnavailable {
        path: String,
        source: std::io::Error,
    },
    /// 写入导出文件失败
    #[error("写入导出文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
}

/// 试卷存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 持久化失败
    #[error("保存试卷记录失败 ({path}): {source}")]
    PersistFailed { path: String, source: BoxError },
    /// 加载存储文件失败
    #[error("加载试卷记录失败 ({path}): {source}")]
    LoadFailed { path: String, source: BoxError },
    /// 试卷不存在
    #[error("找不到试卷: {id}")]
    PaperNotFound { id: String },
    /// 试卷文件丢失
    #[error("试卷文件不存在: {path}")]
    ArtifactMissing { path: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxError },
    /// 解析文件失败
    #[error("解析文件失败 ({path}): {source}")]
    ParseFailed { path: String, source: BoxError },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未知年级
    #[error("未知年级: {value}")]
    UnknownGrade { value: String },
    /// 未知科目
    #[error("未知科目: {value}")]
    UnknownSubject { value: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::ParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::ParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建题库查询错误
    pub fn bank_query_failed(
        subject: impl Into<String>,
        grade: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Bank(BankError::QueryFailed {
            subject: subject.into(),
            grade: grade.into(),
            source: Box::new(source),
        })
    }

    /// 创建导出写入错误
    pub fn export_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Export(ExportError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建存储持久化错误
    pub fn store_persist_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Store(StoreError::PersistFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为题库数量不足
    pub fn is_count_mismatch(&self) -> bool {
        matches!(self, AppError::Assembly(AssemblyError::CountMismatch { .. }))
    }

    /// 是否为选题不完整
    pub fn is_incomplete_selection(&self) -> bool {
        matches!(
            self,
            AppError::Assembly(AssemblyError::IncompleteSelection { .. })
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
