/// Imagen API 客户端
///
/// 封装所有与图片生成 REST API 相关的调用逻辑
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::GeneratedImage;
use crate::services::{ImageGenerator, ImageRequest};
use crate::utils::logging::truncate_text;

/// Imagen 客户端
pub struct ImagenClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    aspect_ratio: String,
    output_mime_type: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: usize,
    aspect_ratio: &'a str,
    output_options: OutputOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl ImagenClient {
    /// 创建新的 Imagen 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.image_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "未设置 IMAGE_API_KEY (或 GEMINI_API_KEY)".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_key: config.image_api_key.clone(),
            api_base_url: config.image_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.image_model_name.clone(),
            aspect_ratio: config.image_aspect_ratio.clone(),
            output_mime_type: config.image_output_mime_type.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        let model = self.model_name.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:predict", self.api_base_url, model_path)
    }

    fn build_payload<'a>(&'a self, request: &'a ImageRequest) -> PredictRequest<'a> {
        PredictRequest {
            instances: vec![PredictInstance {
                prompt: &request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: &self.aspect_ratio,
                output_options: OutputOptions {
                    mime_type: &self.output_mime_type,
                },
            },
        }
    }

    /// 从响应中提取图片，保持服务返回的顺序
    fn extract_images(&self, response: PredictResponse) -> AppResult<Vec<GeneratedImage>> {
        let mut images = Vec::with_capacity(response.predictions.len());
        for prediction in response.predictions {
            let Some(encoded) = prediction.bytes_base64_encoded else {
                // 被安全过滤的结果不带图片数据
                warn!("⚠️ 跳过一条没有图片数据的结果");
                continue;
            };
            let bytes = BASE64.decode(encoded.as_bytes())?;
            images.push(GeneratedImage {
                bytes,
                mime_type: prediction
                    .mime_type
                    .or_else(|| Some(self.output_mime_type.clone())),
            });
        }
        Ok(images)
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate_images(&self, request: &ImageRequest) -> AppResult<Vec<GeneratedImage>> {
        let endpoint = self.endpoint();
        debug!(
            "调用图片生成 API，模型: {}，数量: {}",
            self.model_name, request.number_of_images
        );

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_payload(request))
            .send()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_text(&response.text().await.unwrap_or_default(), 500);
            warn!("图片生成 API 返回错误: {} {}", status, body);
            return Err(AppError::BadResponse {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;
        // 空响应体视为没有图片
        let payload: PredictResponse = if text.trim().is_empty() {
            PredictResponse::default()
        } else {
            serde_json::from_str(&text)?
        };

        let images = self.extract_images(payload)?;
        debug!("图片生成 API 调用成功，收到 {} 张", images.len());
        Ok(images)
    }
}
