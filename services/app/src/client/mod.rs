pub mod context;
pub mod protocol;
pub mod request;
pub mod session;

pub use context::{SessionContext, SessionError};
pub use request::RequestClient;
pub use session::{SessionHandle, SessionStore};
