//! # Paper Generator
//!
//! 一个从题库自动组卷、导出并保存试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `clients/` - 题库查询能力（`QuestionBank`），`StaticQuestionBank` 由本地题库文件驱动
//! - `infrastructure/` - 持有试卷记录文件与输出目录，只暴露能力
//! - `PaperStore` - 已保存试卷的追加与查询
//! - `ArtifactWriter` - 把试卷文件写入输出目录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PaperAssembler` - 取题、校验数量、随机抽题、确认、计分、导出前校验
//! - `PaperRenderer` - 双语排版与答案表
//! - `PaperExporter` - 导出试卷文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张试卷"的完整流程
//! - `PaperSession` - 分区 → 搜索 → 随机抽题 → 确认 → 预览 → 导出保存
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，持有资源并分发命令
//! - `orchestrator/paper_processor` - 单张试卷处理器
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{QuestionBank, StaticQuestionBank};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsonFileStore, MemoryStore, PaperStore};
pub use models::{Question, QuestionType, SavedPaper, SectionRequest};
pub use orchestrator::{generate_paper, App, GenerateOptions};
pub use workflow::PaperSession;
