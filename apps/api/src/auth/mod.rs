//! Authentication: password hashing, bearer tokens, revocation and the
//! request extractors every protected route depends on.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod revocation;
