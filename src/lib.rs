//! ravel: the dispatch and value core of a vector-oriented dynamic
//! runtime.
//!
//! Every operation has one generic fallback implementation. A
//! [`dispatch::CallSite`] watches the argument shapes it actually sees and
//! caches guarded fast paths for them, falling back (and eventually
//! generalizing for good) when the shapes stop fitting. Caching is
//! contractually invisible: results, warnings and attributes are identical
//! to always running the fallback.
//!
//! Values are [`value::RVector`]s: uniform element containers with a kind,
//! a completeness flag, an optional attribute table and `Arc`-shared
//! copy-on-write storage. Missing data travels as in-band sentinels and
//! poisons element-wise results.
//!
//! Set `RAVEL_TRACE=1` (or a comma-separated phase list such as
//! `RAVEL_TRACE=dispatch,recycle`) to log phase activity to stderr.

pub mod dispatch;
pub mod ops;
pub mod recycle;
pub mod session;
pub mod symbol;
pub mod value;

mod rng;
mod trace;

pub use dispatch::{CallSite, OpDescriptor, SiteConfig, SiteState};
pub use recycle::RecyclePlan;
pub use session::Session;
pub use symbol::Symbol;
pub use value::{Complex, ErrorCode, Kind, RVector, RuntimeError, Scalar, Warning, WarningKind};
