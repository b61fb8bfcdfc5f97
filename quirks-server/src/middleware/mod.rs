//! Request middleware

mod rate_limit;

pub use rate_limit::{FORWARDED_FOR_HEADER, client_key, rate_limit_middleware};
