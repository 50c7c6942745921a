//! Trial execution

pub mod command;
pub mod runner;

pub use command::CommandRunner;
pub use runner::run_tests;

use std::panic;

/// Call `f` where no tokio runtime context is entered.
///
/// A runtime cannot be started, blocked on or dropped from inside another
/// runtime's context, so callers that have one get `f` run on a scoped
/// thread instead.
pub(crate) fn outside_runtime<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return f();
    }

    std::thread::scope(|scope| match scope.spawn(f).join() {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    })
}
