use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{ModError, ModResult};

/// State of a one-shot asynchronous operation.
#[derive(Clone)]
pub enum OpStatus<T> {
    Pending,
    Succeeded(T),
    Failed(Arc<ModError>),
}

impl<T> OpStatus<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OpStatus::Pending)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OpStatus::Pending => "pending",
            OpStatus::Succeeded(_) => "succeeded",
            OpStatus::Failed(_) => "failed",
        }
    }
}

impl<T> fmt::Debug for OpStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Failed(error) => write!(f, "failed: {error}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Handle to a one-shot asynchronous operation.
///
/// The producing task resolves it exactly once. Every clone observes the
/// same terminal value (broadcast, not single-consumer), and a waiter that
/// attaches after completion still sees it.
#[derive(Clone)]
pub struct OpHandle<T: Clone> {
    rx: watch::Receiver<OpStatus<T>>,
}

/// Producer side; consumed by the single terminal transition.
pub(crate) struct OpCompleter<T: Clone> {
    tx: watch::Sender<OpStatus<T>>,
}

impl<T: Clone> fmt::Debug for OpHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpHandle").field(&self.status()).finish()
    }
}

pub(crate) fn op_channel<T: Clone>() -> (OpCompleter<T>, OpHandle<T>) {
    let (tx, rx) = watch::channel(OpStatus::Pending);
    (OpCompleter { tx }, OpHandle { rx })
}

impl<T: Clone> OpCompleter<T> {
    pub(crate) fn complete(self, result: ModResult<T>) {
        let status = match result {
            Ok(value) => OpStatus::Succeeded(value),
            Err(error) => OpStatus::Failed(Arc::new(error)),
        };
        // Nobody may be listening yet; the value stays readable either way.
        let _ = self.tx.send(status);
    }
}

impl<T: Clone> OpHandle<T> {
    /// Current state without waiting.
    pub fn status(&self) -> OpStatus<T> {
        self.rx.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.rx.borrow(), OpStatus::Pending)
    }

    /// Wait for the terminal state.
    ///
    /// Returns the same value for every clone, however many callers wait
    /// and whenever they start waiting.
    pub async fn wait(&mut self) -> Result<T, Arc<ModError>> {
        loop {
            match self.rx.borrow_and_update().clone() {
                OpStatus::Succeeded(value) => return Ok(value),
                OpStatus::Failed(error) => return Err(error),
                OpStatus::Pending => {}
            }
            if self.rx.changed().await.is_err() {
                // Producer dropped without resolving.
                return Err(Arc::new(ModError::TaskAbandoned));
            }
        }
    }
}
