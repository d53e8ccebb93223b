pub mod convert;
pub mod download;
pub mod generate;
pub mod session;
pub mod tokens;
