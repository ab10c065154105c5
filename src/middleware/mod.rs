//! Request middleware shared by every storefront route.
//!
//! Wrap order matters: [`CookieRenewal`] must be the outer layer so that it
//! only sees the cookies the browser sent, while [`SessionIdentity`] adds the
//! freshly minted session cookie on the way out.
//!
//! ```ignore
//! App::new()
//!     .wrap(SessionIdentity::new(policy.clone()))
//!     .wrap(CookieRenewal::new(policy))
//! ```

pub mod renewal;
pub mod session;

pub use renewal::CookieRenewal;
pub use session::{SessionId, SessionIdentity};
