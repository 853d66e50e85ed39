pub mod datasets;
pub mod documents;
pub mod export;
pub mod extract;
pub mod health;
