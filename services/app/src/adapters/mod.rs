pub mod http;
pub mod prompt;
pub mod storage;

pub use http::ReqwestTransport;
pub use prompt::TerminalPrompt;
pub use storage::{FileStore, MemoryStore};
