//! HTTP route implementations.
//!
//! This module contains all endpoints exposed by the docpdf server.
#![allow(unused_imports)]

pub mod convert;
pub mod health;

pub use convert::ConvertParams;
pub use health::HealthOutput;
