pub mod auth;
pub mod domains;
pub mod resource;
pub mod session;
pub mod sites;

pub use auth::AuthStore;
pub use domains::DomainsStore;
pub use session::{Session, SessionState};
pub use sites::SitesStore;
