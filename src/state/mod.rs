//! Client-side state owned outside the component tree.
//!
//! DESIGN
//! ======
//! Each store is constructed explicitly by the bootstrap and passed down
//! through context, so initialization order is visible at the call site.

pub mod session;
