//! Authentication domain types

mod types;

pub use types::{Credentials, PSEUDO_USER_PARAM};
