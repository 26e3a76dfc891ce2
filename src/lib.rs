//! # Coloring Book
//!
//! 根据一个主题生成儿童涂色书：一张彩色封面加若干黑白线稿内页，
//! 可以导出为 PDF 或逐个保存为图片文件。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 对外部图片生成接口的 HTTP 封装
//! - `ImagenClient` - 一次请求生成最多 4 张图片
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ImageGenerator` - 图片生成能力（可替换为测试实现）
//! - `prompts` - 封面和内页的提示词
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一本书"的生成顺序
//! - `plan_batches` - 内页的批次划分
//! - `generate_pages` - 封面 → 批次 的惰性页面序列
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/controller` - 运行状态、并发保护、渐进渲染
//! - `orchestrator/gallery` - 已渲染页面的有序视图
//! - `orchestrator/app` - 一次完整运行（生成 + 导出）
//!
//! ### ⑤ 导出层（Export）
//! - `export/` - PDF 文档和定时保存队列
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::ImagenClient;
pub use config::{Config, ExportMode};
pub use error::{AppError, AppResult, FailedStage, ValidationError};
pub use export::{export_document, export_individual_files, DocumentLayout};
pub use models::{
    BookRequest, GeneratedImage, GeneratedPage, RunProgress, RunState, MAX_PAGE_COUNT,
};
pub use orchestrator::{App, BookController, Gallery, GalleryItem, PageRenderer};
pub use services::{ImageGenerator, ImageRequest};
pub use workflow::{generate_pages, plan_batches, BatchSpec};
