pub mod error;
pub mod session;
pub mod cache;
pub mod tree;
pub mod dashboard;

pub use error::{Error, Result};
pub use session::{Session, SessionState};
pub use cache::Cache;
pub use dashboard::Dashboard;

pub use savesync_api as api;
