//! Client code for docpdf.
//!
//! This crate provides the source download pipeline and the conversion
//! backend client used by the server.

pub mod convert;
pub mod fetch;

pub use convert::{ConvertError, Converter, GotenbergClient, GotenbergConfig};

pub use fetch::{DownloadedFile, FetchClient, FetchConfig};
