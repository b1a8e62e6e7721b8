//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源持有和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载题库、打开试卷记录、创建导出器
//! - 分发命令行子命令
//! - 输出全局统计信息
//!
//! ### `paper_processor` - 单张试卷处理器
//! - 按配置创建 PaperSession
//! - 添加分区、搜索、随机抽题、预览
//! - 导出并保存试卷
//!
//! ## 层次关系
//!
//! ```text
//! app (处理命令)
//!     ↓
//! paper_processor (处理一张试卷)
//!     ↓
//! workflow::PaperSession (组卷流程)
//!     ↓
//! services (能力层：assembler / renderer / exporter)
//!     ↓
//! clients + infrastructure (题库、试卷记录、文件写入)
//! ```

pub mod app;
pub mod paper_processor;

// 重新导出主要类型
pub use app::App;
pub use paper_processor::{generate_paper, GenerateOptions};
