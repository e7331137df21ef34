//! ==============================================================================
//! components/mod.rs - UI Components
//! ==============================================================================

mod header;
mod request_view;

pub use header::Header;
pub use request_view::RequestView;
