//! Fetching and extraction for the Yahoo Taiwan dictionary.
//!
//! [`Client`] issues the single HTTP GET for a query, [`extract`] walks
//! the returned HTML and produces a [`twdict_model::LookupResult`].

mod error;
pub mod extract;
pub mod fetch;

pub use error::FetchError;
pub use extract::extract;
pub use fetch::Client;
