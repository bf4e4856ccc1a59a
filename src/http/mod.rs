//! HTTP protocol layer module
//!
//! Response builders, MIME detection and the development header middleware,
//! decoupled from file resolution.

pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use headers::apply_dev_headers;
pub use response::{
    build_403_response, build_404_response, build_501_response, build_file_response,
    build_html_response, build_options_response, build_redirect_response,
};
