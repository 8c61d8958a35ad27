pub mod browser;
pub mod filter;
pub mod session;

pub use browser::{capture, BrowserDriver};
pub use filter::{ResponseFilter, ResponseKind};
pub use session::{CaptureSession, SessionState};
