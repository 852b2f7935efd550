//! Business logic for sessions, signed tokens and account flows.

mod account_service;
pub mod clock;
mod denylist;
mod mailer;
mod session_service;
mod token_service;

pub use account_service::{AccountManager, AccountService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use denylist::{MemoryDenylist, RedisDenylist, TokenDenylist};
pub use mailer::{LogMailer, Mailer};
pub use session_service::{generate_session_key, SessionManager, SessionService, SessionSettings};
pub use token_service::{TokenIssuer, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use denylist::MockTokenDenylist;
#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
