//! HTTP protocol helpers shared by the request handler.

pub mod cache;
pub mod range;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_500_response, build_full_response, build_html_response, build_partial_response,
};
