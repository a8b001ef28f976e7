//! Wire models for the Tasklane REST API.
//!
//! The server passes most payloads through as raw JSON. Only the shapes the
//! crate itself inspects are typed here:
//!
//! - [`DataEnvelope`] / [`PageMeta`]: the `{data, meta}` wrapper on every response.
//! - [`ItemRef`]: a row of an enumeration endpoint, used to translate titles into IDs.
//! - [`SearchHit`]: a search result whose `path` carries workspace and project slugs.
//! - Request bodies ([`TaskInput`], [`LabelInput`], ...) sent on writes.

mod envelope;
mod input;
mod reference;

pub use envelope::*;
pub use input::*;
pub use reference::*;
