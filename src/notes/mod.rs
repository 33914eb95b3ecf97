pub mod client;
pub mod filter;
pub mod form;
pub mod http;
pub mod model;
