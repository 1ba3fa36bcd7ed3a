#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod links;
pub mod resolver;
pub mod runtime;
pub mod transport;
pub mod utils;

pub use config::Config;
pub use error::{MuzakError, Result};
