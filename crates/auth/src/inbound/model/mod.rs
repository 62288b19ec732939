pub mod admin;
pub mod authn;
pub mod profile;

pub mod prelude {
    pub use super::admin::*;
    pub use super::authn::*;
    pub use super::profile::*;
}
