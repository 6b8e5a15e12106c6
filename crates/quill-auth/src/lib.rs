//! # quill-auth
//!
//! Role-based access control for Quill CMS: the role → capability
//! mapping, the generic broader/narrower capability relation used for
//! ownership checks, and the [`CapabilityStore`] consumed by the route
//! and menu registries for gating.

pub mod caps;
pub mod roles;
pub mod store;

pub use roles::RoleMap;
pub use store::CapabilityStore;
