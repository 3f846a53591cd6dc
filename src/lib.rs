//! Playlist Genius Library
//!
//! This library turns a free-text music request ("disco and funk from the early
//! 80s") into a Spotify playlist. A chat completion model suggests songs, each
//! suggestion is matched against the Spotify catalog, and the matches are
//! published as a public playlist for the caller.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the backend service
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `openai` - Chat completion client used for song suggestions
//! - `playlist` - Era extraction, suggestion parsing, track resolution and assembly
//! - `server` - HTTP server setup for the service and the local login flow
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use playlist_genius::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> playlist_genius::Res<()> {
//!     config::load_env().await?;
//!     cli::serve().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod openai;
pub mod playlist;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for top-level plumbing using a
/// boxed dynamic error trait object. Maintains Send + Sync bounds for async
/// contexts.
///
/// # Example
///
/// ```
/// use playlist_genius::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Used for general progress and status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Resolving {} suggestions", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to provide positive feedback when a step completes.
///
/// # Example
///
/// ```
/// success!("Playlist {} created", playlist_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for unrecoverable startup or CLI errors. Request handlers never
/// call this macro; they degrade through `warning!` instead.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a failed upstream call, a dropped suggestion,
/// a skipped playlist step.
///
/// # Example
///
/// ```
/// warning!("No Spotify match found for: {} by {}", title, artist);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
