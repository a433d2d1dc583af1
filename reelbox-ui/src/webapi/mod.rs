mod cache;
mod client;

pub use cache::WebApiCache;
pub use client::{RequestBuilder, WebApi, H5_ORIGIN};
