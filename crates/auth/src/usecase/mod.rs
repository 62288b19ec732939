pub mod admin;
pub mod authn;
pub mod profile;
