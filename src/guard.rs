//! Panic recovery at execution-unit boundaries.
//!
//! Background tasks run their bodies through [`catch_async`], the UI key
//! handler through [`catch`]. Either way an unexpected panic comes back as a
//! [`GameError::RuntimeFault`] tagged with the name of the boundary it was
//! caught at, and travels the same path as an ordinary error.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::FutureExt;

use crate::error::{GameError, GameResult};

/// Turns a panic payload into a runtime fault tagged with `origin`.
///
/// String payloads keep their text; a `GameError` payload is kept as the
/// cause of the fault.
pub fn fault_from_panic(origin: &'static str, payload: Box<dyn Any + Send>) -> GameError {
    let fault = match payload.downcast::<GameError>() {
        Ok(err) => GameError::RuntimeFault {
            message: err.to_string(),
            cause: Some(err),
        },
        Err(payload) => match payload.downcast::<String>() {
            Ok(message) => GameError::runtime_fault(*message),
            Err(payload) => match payload.downcast_ref::<&str>() {
                Some(message) => GameError::runtime_fault(*message),
                None => GameError::runtime_fault("unknown panic payload"),
            },
        },
    };

    tracing::error!(origin, %fault, "recovered panic");
    fault.traced(origin)
}

/// Sends panic messages to the tracing log instead of stderr, which the
/// game's alternate screen owns. Without a log file they are dropped; the
/// exit report still names the fault.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));
}

pub fn catch<T>(origin: &'static str, f: impl FnOnce() -> GameResult<T>) -> GameResult<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(fault_from_panic(origin, payload)))
}

pub async fn catch_async<T, F>(origin: &'static str, fut: F) -> GameResult<T>
where
    F: Future<Output = GameResult<T>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(fault_from_panic(origin, payload)),
    }
}
