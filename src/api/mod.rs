//! Outbound HTTP requests against a configured environment

pub mod method;
pub mod request_manager;
pub mod response;

pub use method::HttpMethod;
pub use request_manager::{
    join_url, merge_headers, ManagerCell, RequestManager, RequestOptions, DEFAULT_TIMEOUT,
};
pub use response::ApiResponse;
