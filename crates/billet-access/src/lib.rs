//! Permission model for Billet.
//!
//! Every state-changing accommodation operation starts by asking one
//! question: does this user hold this capability in this project?
//!
//! 1. **Capabilities**: named boolean permissions ([`Capability`])
//! 2. **ACL entries**: per-user grants scoped to one project ([`ProjectAcl`])
//! 3. **Checks**: [`has_capability`] / [`require_capability`], pure
//!    functions over a [`Project`] whose ACL has already been loaded
//!
//! Nothing here performs I/O. The store hands over a fully materialized
//! project; the check never reaches back into storage.
//!
//! ```text
//! Room layer (above)  ← guards every mutation with require_capability()
//!     ↕
//! Access layer (this crate)  ← capability lookup over an ACL snapshot
//!     ↕
//! Types (below)  ← ProjectId, UserId
//! ```

mod acl;
mod capability;
mod check;
mod error;

pub use acl::{Project, ProjectAcl};
pub use capability::Capability;
pub use check::{has_capability, require_capability};
pub use error::AccessError;
