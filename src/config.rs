use crate::error::{AppResult, ConfigError};
use crate::models::{parse_sections, Grade, SectionRequest, Subject};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库文件目录（*.json / *.toml）
    pub bank_folder: String,
    /// 已保存试卷的记录文件
    pub store_file: String,
    /// 导出试卷的输出目录
    pub output_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 模拟题库查询延迟（毫秒）
    pub bank_latency_ms: u64,
    // --- 默认组卷参数 ---
    pub subject: String,
    pub grade: String,
    /// 章节列表，以 `|` 分隔
    pub chapters: String,
    /// 分区描述，例如 `mcq:10:1,short:5:2,long:2:5`
    pub sections: String,
    /// 是否双语（英语 + 乌尔都语）排版
    pub dual_medium: bool,
    /// 随机选题种子，不设置则每次不同
    pub shuffle_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_folder: "data/bank".to_string(),
            store_file: "saved-papers-storage.json".to_string(),
            output_dir: "output_papers".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
            bank_latency_ms: 500,
            subject: "biology".to_string(),
            grade: "9th".to_string(),
            chapters: "CHAP 1 Introduction to Biology|CHAP 2 Biodiversity".to_string(),
            sections: "mcq:5:1,short:2:2,long:1:5".to_string(),
            dual_medium: true,
            shuffle_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bank_folder: std::env::var("BANK_FOLDER").unwrap_or(default.bank_folder),
            store_file: std::env::var("STORE_FILE").unwrap_or(default.store_file),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            bank_latency_ms: std::env::var("BANK_LATENCY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.bank_latency_ms),
            subject: std::env::var("PAPER_SUBJECT").unwrap_or(default.subject),
            grade: std::env::var("PAPER_GRADE").unwrap_or(default.grade),
            chapters: std::env::var("PAPER_CHAPTERS").unwrap_or(default.chapters),
            sections: std::env::var("PAPER_SECTIONS").unwrap_or(default.sections),
            dual_medium: std::env::var("DUAL_MEDIUM").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dual_medium),
            shuffle_seed: std::env::var("SHUFFLE_SEED").ok().and_then(|v| v.parse().ok()).or(default.shuffle_seed),
        }
    }

    pub fn parsed_subject(&self) -> AppResult<Subject> {
        Subject::find(&self.subject).ok_or_else(|| {
            ConfigError::UnknownSubject {
                value: self.subject.clone(),
            }
            .into()
        })
    }

    pub fn parsed_grade(&self) -> AppResult<Grade> {
        Grade::from_key(&self.grade).ok_or_else(|| {
            ConfigError::UnknownGrade {
                value: self.grade.clone(),
            }
            .into()
        })
    }

    pub fn parsed_chapters(&self) -> Vec<String> {
        self.chapters
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn parsed_sections(&self) -> AppResult<Vec<SectionRequest>> {
        parse_sections(&self.sections)
    }
}
