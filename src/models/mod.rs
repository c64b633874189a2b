pub mod record;
pub mod task;

pub use record::ProcessedFileRecord;
pub use task::{ConversionTask, Format};
