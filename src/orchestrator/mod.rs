//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次生成任务的调度和状态管理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、导出）
//! - 从配置构造并校验请求
//! - 输出全局统计信息
//!
//! ### `controller` - 涂色书控制器
//! - 持有唯一的运行状态（Idle / Running / Succeeded / Failed）
//! - 拒绝并发提交
//! - 订阅页面序列，逐页渲染到画廊
//!
//! ### `gallery` - 画廊
//! - 已渲染页面的有序视图
//! - 导出功能的唯一数据来源
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行 + 导出)
//!     ↓
//! controller (运行状态 + 渲染)
//!     ↓
//! workflow::generate_pages (封面 → 批次 的页面序列)
//!     ↓
//! services (能力层：ImageGenerator / prompts)
//!     ↓
//! clients (基础设施：ImagenClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一写者**：只有 controller 修改运行状态
//! 2. **向下依赖**：编排层 → workflow → services → clients
//! 3. **无业务逻辑**：只做调度和统计，不关心提示词和批次划分

pub mod app;
pub mod controller;
pub mod gallery;

// 重新导出主要类型
pub use app::App;
pub use controller::BookController;
pub use gallery::{Gallery, GalleryItem, PageRenderer, ProgressLogger};
