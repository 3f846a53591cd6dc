//! # CLI Module
//!
//! Command implementations behind the `playlist-genius` binary.
//!
//! - [`serve`] - runs the HTTP backend
//! - [`auth`] - browser login with PKCE, prints an access token
//! - [`generate`] - runs the full pipeline for one prompt in the terminal
//!
//! ## Usage
//!
//! ```bash
//! playlist-genius serve
//! playlist-genius auth
//! playlist-genius generate --prompt "disco and funk from the early 80s" --token <TOKEN>
//! ```
//!
//! Commands report through the crate's logging macros. Unrecoverable setup
//! errors (missing API key, unbindable address) end the process via `error!`.

mod auth;
mod generate;
mod serve;

pub use auth::auth;
pub use generate::generate;
pub use serve::serve;
