//! The workflow layer: each module is one component of the system,
//! composing the entity layer
//! ([`crate::domain`]), the repository traits ([`crate::repository`]),
//! and the external-interface ports ([`crate::ports`]) into the
//! transactional steps a caller actually invokes.
//!
//! A workflow function never opens its own connection or transaction; it
//! receives a `&Store` (or trait references into one) and composes
//! repository calls that all see the same in-memory snapshot for the
//! span of the call, standing in for "one session, one transaction".

pub mod admission;
pub mod auth;
pub mod document;
pub mod institution;
pub mod invigilator;
pub mod lifecycle;
pub mod ocr;
pub mod policy;
pub mod registration;
pub mod scoring;
