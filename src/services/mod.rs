pub mod image_service;
pub mod prompts;

pub use image_service::{ImageGenerator, ImageRequest, MAX_IMAGES_PER_CALL};
pub use prompts::{cover_prompt, page_prompt};
