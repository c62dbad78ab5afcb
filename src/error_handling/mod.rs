//! Error reporting strategies selected by error kind
//!
//! Failures are logged once where they form and then returned to the caller.

pub mod dispatcher;
pub mod strategy;

pub use dispatcher::ErrorHandlerDispatcher;
pub use strategy::{
    ErrorHandlerStrategy, FileNotFoundHandler, GeneralErrorHandler, HttpStatusHandler,
    JsonDecodeHandler, RequestErrorHandler, TimeoutHandler,
};
