pub mod columns;
pub mod normalizer;
pub mod sessions;

pub use columns::{resolve_columns, ResolvedColumns};
pub use normalizer::{normalize, Normalized};
pub use sessions::SessionWindow;
