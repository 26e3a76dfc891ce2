use thiserror::Error;

/// 生成失败发生的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    /// 封面请求
    Cover,
    /// 内页批次，`start` 为该批次之前已生成的内页数量
    Batch { start: usize },
}

impl std::fmt::Display for FailedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailedStage::Cover => write!(f, "cover"),
            FailedStage::Batch { start } => write!(f, "batch@{}", start),
        }
    }
}

/// 请求参数校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 主题为空
    #[error("主题不能为空")]
    EmptyTheme,
    /// 页数非正数
    #[error("页数必须大于 0 (当前: {0})")]
    NonPositivePageCount(i64),
    /// 页数超过上限
    #[error("页数不能超过 {max} (当前: {actual})")]
    PageCountTooLarge { max: i64, actual: i64 },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 参数校验失败，不会发起任何远程调用
    #[error("参数校验失败: {0}")]
    Validation(#[from] ValidationError),

    /// 图片服务返回空结果（或数量不足）
    #[error("图片生成失败 ({stage}): 服务未返回足够的图片")]
    GenerationFailed { stage: FailedStage },

    /// 已有生成任务在运行
    #[error("已有生成任务正在进行")]
    RunInProgress,

    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// API 返回非成功状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 图片数据 base64 解码失败
    #[error("图片数据解码失败: {0}")]
    Base64(#[from] base64::DecodeError),

    /// 图片解码/编码失败
    #[error("图片处理失败: {0}")]
    Image(#[from] image::ImageError),

    /// PDF 组装失败
    #[error("PDF生成失败: {0}")]
    Pdf(#[from] lopdf::Error),

    /// 文件读写失败
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 其他意外错误
    #[error("错误: {0}")]
    Unexpected(String),
}

impl AppError {
    /// 创建 API 请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建生成失败错误
    pub fn generation_failed(stage: FailedStage) -> Self {
        AppError::GenerationFailed { stage }
    }

    /// 面向用户的提示信息
    ///
    /// 生成过程中的各类失败不区分原因，统一返回一条通用提示；
    /// 详细原因只写入日志。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::RunInProgress => "涂色书正在生成中，请等待当前任务完成".to_string(),
            _ => "生成涂色书时出错，请稍后重试".to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
