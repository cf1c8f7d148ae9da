//! Composer workflow module

pub mod controller;
pub mod session;
pub mod traits;

pub use controller::ComposerController;
pub use session::{OperationBoard, SessionState};
pub use traits::{MailTransport, TextGenerator};
