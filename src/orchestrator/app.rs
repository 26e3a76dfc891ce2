//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次涂色书生成的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、创建图片客户端和控制器
//! 2. **请求校验**：从配置构造 BookRequest，校验失败时不发起任何请求
//! 3. **生成调度**：委托 BookController 执行生成
//! 4. **导出**：只有生成成功后才允许导出 PDF 或单张图片
//! 5. **全局统计**：输出结果并写入日志文件

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};

use crate::clients::ImagenClient;
use crate::config::Config;
use crate::export::{self, DocumentLayout};
use crate::models::BookRequest;
use crate::orchestrator::controller::BookController;
use crate::orchestrator::gallery::ProgressLogger;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    controller: BookController<ImagenClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        let client = ImagenClient::new(&config)?;

        logging::log_startup(
            &config.book_theme,
            config.book_page_count,
            client.model_name(),
        );

        let controller =
            BookController::new(client).with_renderer(ProgressLogger::new(config.verbose_logging));

        Ok(Self { config, controller })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let request = match BookRequest::new(&self.config.book_theme, self.config.book_page_count)
        {
            Ok(request) => request,
            Err(e) => {
                error!("❌ {}", e);
                logging::append_log_line(&self.config.output_log_file, &format!("请求无效: {}", e))?;
                return Err(e.into());
            }
        };

        logging::append_log_line(
            &self.config.output_log_file,
            &format!("主题: {} | 页数: {}", request.theme(), request.page_count()),
        )?;

        let outcome = self.controller.submit(&request).await;

        let rendered = self.controller.gallery().len();
        logging::print_final_stats(
            rendered,
            request.page_count(),
            outcome.is_ok(),
            &self.config.output_log_file,
        );

        if let Err(e) = outcome {
            // 详细原因已由控制器记录，这里只给出通用提示
            error!("❌ {}", e.user_message());
            logging::append_log_line(
                &self.config.output_log_file,
                &format!("生成失败 (已渲染 {} 页): {}", rendered, e),
            )?;
            // 不向调用方暴露具体原因
            return Err(anyhow!(e.user_message()));
        }

        logging::append_log_line(
            &self.config.output_log_file,
            &format!("生成成功: {} 页", rendered),
        )?;

        if !self.controller.export_enabled() {
            warn!("⚠️ 导出未开放，跳过导出");
            return Ok(());
        }

        self.export().await
    }

    /// 按配置导出
    async fn export(&self) -> Result<()> {
        let output_dir = PathBuf::from(&self.config.output_dir);
        let mode = self.config.export_mode;

        if mode.wants_document() {
            let gallery = self.controller.gallery().clone();
            let layout = DocumentLayout::with_margin(self.config.pdf_margin_mm);
            let dir = output_dir.clone();

            let saved = tokio::task::spawn_blocking(move || {
                export::export_document(&gallery, &layout, &dir)
            })
            .await??;

            if let Some(path) = saved {
                logging::append_log_line(
                    &self.config.output_log_file,
                    &format!("PDF: {}", path.display()),
                )?;
            }
        }

        if mode.wants_files() {
            let handle = {
                let gallery = self.controller.gallery();
                export::export_individual_files(
                    &gallery,
                    &output_dir,
                    Duration::from_millis(self.config.download_interval_ms),
                )?
            };

            let report = handle.completed().await?;
            info!(
                "✓ 单张图片已保存 {} 个到 {}",
                report.saved.len(),
                output_dir.display()
            );
            logging::append_log_line(
                &self.config.output_log_file,
                &format!(
                    "单张图片: 成功 {}, 失败 {}",
                    report.saved.len(),
                    report.failed.len()
                ),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportMode;

    #[tokio::test]
    async fn test_run_failure_surfaces_generic_message_only() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("run.txt");
        let config = Config {
            image_api_key: "test-key".to_string(),
            // 本地没有监听的端口，请求立即失败
            image_api_base_url: "http://127.0.0.1:1/v1beta".to_string(),
            book_theme: "Dinosaurs".to_string(),
            book_page_count: 3,
            export_mode: ExportMode::None,
            output_dir: dir.path().join("out").to_string_lossy().into_owned(),
            output_log_file: log_file.to_string_lossy().into_owned(),
            ..Config::default()
        };

        let app = App::initialize(config).await.unwrap();
        let err = app.run().await.unwrap_err();

        assert_eq!(err.to_string(), "生成涂色书时出错，请稍后重试");
        assert_eq!(err.chain().count(), 1);
        assert!(!format!("{:?}", err).contains("127.0.0.1"));

        // 详细原因只写入日志文件
        let log = std::fs::read_to_string(&log_file).unwrap();
        assert!(log.contains("生成失败"));
        assert!(!dir.path().join("out").exists());
    }
}
