//! Production implementations of the transport seams.

pub mod service;

pub use service::ReqwestDispatcher;
