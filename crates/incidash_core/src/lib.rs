pub mod domain;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod normalize;
pub mod source;
pub mod summary;
pub mod view_model;
