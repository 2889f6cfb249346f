//! # Bridge Demo
//!
//! Two browsing contexts emulated in one process:
//!
//! - [`ParentPage`] owns the text and serves [`DemoContract`] on the parent
//!   window, after an artificial latency
//! - [`WebviewPage`] is the embedded page; it calls the parent through a
//!   [`Requester`](bridge_rpc::Requester) and awaits the answers
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Create the window pair
//! 3. Start serving on the parent window
//! 4. Attach the webview's requester to the content window
//! 5. Issue the demo calls

pub mod config;
pub mod contract;
pub mod parent;
pub mod webview;

pub use config::{DemoConfig, Latency};
pub use contract::{DemoContract, GetText, InduceError, MultiplyByFour};
pub use parent::ParentPage;
pub use webview::WebviewPage;
