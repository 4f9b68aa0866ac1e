pub mod fakes;
pub mod http_executor;
pub mod transport;

pub use http_executor::HttpExecutor;
pub use transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
