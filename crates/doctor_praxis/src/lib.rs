#![forbid(unsafe_code)]

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod report;
pub mod resolve;
pub mod util;

pub use cli::run_from_env;
pub use error::{DoctorError, Result};
