//! File operations.

pub mod service;

pub use service::{
    BatchUploadReport, FileOperations, ProgressCallback, UploadProgress, UploadRequest,
};
