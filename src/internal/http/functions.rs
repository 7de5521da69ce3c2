pub mod range_request;

pub use range_request::range_header;
