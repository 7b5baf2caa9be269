//! Credential sources.

mod static_credentials;
mod token_file;

pub use static_credentials::StaticCredentials;
pub use token_file::TokenFileCredentials;
