pub mod batch_plan;
pub mod page_flow;

pub use batch_plan::{plan_batches, BatchSpec};
pub use page_flow::generate_pages;
