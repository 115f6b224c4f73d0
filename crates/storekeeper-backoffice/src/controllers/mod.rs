//! # Management Controllers
//!
//! One controller per management screen. Each holds the database handle,
//! the session context, and its own [`Selection`](crate::selection::Selection)
//! state, and exposes the operations the screen's widgets bind to.
//!
//! - [`role`] - Role list, creation, deletion, permission grant/revoke
//! - [`store`] - Store list, creation/edit form, deletion

pub mod role;
pub mod store;
