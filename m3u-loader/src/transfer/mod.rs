mod http_source;
mod parse_channel;
pub use http_source::*;
pub use parse_channel::*;
