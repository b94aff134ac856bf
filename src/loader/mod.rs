//! Loading Kardex CSV files
//!
//! `dataset` parses a file into an immutable [`Dataset`]; `cache` memoizes
//! parses by file content so repeated loads of the same bytes are free.

pub mod cache;
pub mod dataset;

pub use cache::{DatasetCache, FileIdentity};
pub use dataset::{load_dataset, load_file, Dataset, LoadStats, LoaderOptions};
