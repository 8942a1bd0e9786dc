// Export components
pub mod api;
pub mod archive;
pub mod output;
