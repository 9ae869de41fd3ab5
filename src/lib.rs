#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Functions for loading the dataset and writing table and chart output
pub mod io;
/// The join, filter and sort stages of the pipeline
pub mod ops;
/// Table rows and chart data produced from an ordered view
pub mod projection;
/// Data types used throughout Txnview
pub mod types;
/// View state, selector values and the recomputing view
pub mod view;
