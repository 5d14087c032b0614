//! Transport boundary: the platform event, the proxy-result response and the
//! function entry point.

pub mod request;
pub mod response;
pub mod service;

pub use request::{
    parse_query_string, EventRequestContext, Headers, HttpDescription, TransportEvent,
};
pub use response::TransportResponse;
pub use service::LambdaHandler;
