pub mod backend;
pub mod feed;
pub mod sse;
