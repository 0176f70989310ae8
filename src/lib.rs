//! IAM sample - a TypeDB client walkthrough
//!
//! This crate connects to a TypeDB server, creates the sample identity and
//! access management database, loads its schema and data, checks the
//! seeded users, and runs a handful of sample requests against it.
//!
//! # Example
//!
//! ```ignore
//! use iam_sample::config::AppConfig;
//! use iam_sample::driver::typedb::TypeDbDriver;
//! use iam_sample::sample::{self, OnExisting};
//!
//! let config = AppConfig::default();
//! let driver = TypeDbDriver::connect(&config)?;
//! sample::run(&driver, &config, OnExisting::Replace)?;
//! driver.close()?;
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod sample;
pub mod typeql;
