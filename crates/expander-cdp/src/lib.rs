//! Chrome DevTools Protocol backend for the comment expander.
//!
//! Connects to a Chrome/Chromium started with remote debugging, attaches to
//! a tab, and exposes it as an [`expander_core::ExpansionPage`]:
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let pages = client.list_pages().await?;
//! if let PageSelection::Found(info) = select_page(&pages, "reddit.com", None) {
//!     let page = CdpPage::new(client.attach_page(&info.id).await?);
//! }
//! ```

mod client;
mod error;
mod page;
mod protocol;
mod scripts;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::{select_page, CdpPage, PageSelection};
pub use protocol::{
    BrowserVersion, CdpErrorResponse, CdpRequest, CdpResponse, ExceptionDetails, PageInfo,
    RemoteObject,
};
pub use session::PageSession;
