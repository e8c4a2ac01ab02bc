//! Client side of public profile sharing: an HTTP API client, the session
//! state container that follows the signed-in user, the visitor-side viewer,
//! and the share dialog model.

pub mod api;
pub mod dialog;
pub mod session;
pub mod viewer;

pub use api::{ClientError, HttpApi, PublicProfileApi};
pub use dialog::ShareDialog;
#[cfg(feature = "system-clipboard")]
pub use session::SystemClipboard;
pub use session::{
    share_link, Clipboard, ClipboardError, MemoryClipboard, ShareAction, ShareSession, ShareState,
};
pub use viewer::ProfileViewer;
