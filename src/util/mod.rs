pub use self::http::*;

mod http;
