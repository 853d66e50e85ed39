pub mod dataset;
pub mod document;
pub mod enums;
pub mod extracted;

pub use dataset::Dataset;
pub use document::Document;
pub use enums::DocumentStatus;
pub use extracted::ExtractedData;
