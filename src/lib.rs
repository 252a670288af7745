//! Typed Rust client for the Endicia Label Server XML API.
//!
//! The crate is split into a domain layer of option maps, business rules, and
//! result types, a transport layer for the service's XML wire shapes, and a
//! small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use endicia::{EndiciaClient, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), endicia::EndiciaError> {
//!     let client = EndiciaClient::builder()
//!         .defaults(
//!             Options::new()
//!                 .with("AccountID", "123456")
//!                 .with("RequesterID", "abcd")
//!                 .with("PassPhrase", "secret")
//!                 .with("Test", "YES"),
//!         )
//!         .build()?;
//!
//!     let label = client
//!         .get_label(
//!             Options::new()
//!                 .with("ToPostalCode", "90210-1234")
//!                 .with("MailClass", "First")
//!                 .with("WeightOz", 8i64),
//!         )
//!         .await?;
//!     println!("tracking: {:?}", label.tracking_number);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
mod config;
pub mod domain;
mod transport;

pub use client::{EndiciaClient, EndiciaClientBuilder, EndiciaError};
pub use domain::{
    CarrierPickupResult, InsuranceError, Label, OptionValue, Options, PassPhraseResult,
    RecreditResult, RefundResult, StatusResult,
};
pub use transport::XmlError;
