//! Single-assignment results of bridge requests.

use super::operation::Operation;
use crate::domain::{Result, TankFuelError};
use futures_channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

/// Outcome of one bridge request: the decoded records or the failure reason.
pub type RemoteResult<T> = Result<Vec<T>>;

type SettleFn<T> = Box<dyn FnOnce(RemoteResult<T>) + Send + 'static>;

/// Once-only completion handle shared by every path that may settle a request.
///
/// The first [`fire`](Self::fire) runs the callback; later ones are ignored
/// and return `false`.
pub(crate) struct Settle<T> {
    slot: Arc<Mutex<Option<SettleFn<T>>>>,
}

impl<T> Clone for Settle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Settle<T> {
    pub(crate) fn new<F>(on_settled: F) -> Self
    where
        F: FnOnce(RemoteResult<T>) + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(on_settled)))),
        }
    }

    pub(crate) fn fire(&self, result: RemoteResult<T>) -> bool {
        let callback = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match callback {
            Some(callback) => {
                callback(result);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_settled(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// A future resolving to the result of one bridge request.
///
/// Resolves at most once. If the bridge discards its completer without
/// settling, the promise resolves to [`TankFuelError::ReplyDropped`].
#[must_use = "a promise does nothing unless awaited"]
pub struct Promise<T> {
    operation: Operation,
    receiver: oneshot::Receiver<RemoteResult<T>>,
}

impl<T> Promise<T> {
    pub(crate) fn channel(operation: Operation) -> (oneshot::Sender<RemoteResult<T>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { operation, receiver })
    }

    /// Returns the result if the request has settled, without waiting.
    ///
    /// Returns `None` while the request is pending. After this returns
    /// `Some`, the promise must not be polled again.
    pub fn try_take(&mut self) -> Option<RemoteResult<T>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(self.dropped())),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    fn dropped(&self) -> TankFuelError {
        TankFuelError::ReplyDropped(self.operation.to_string())
    }
}

impl<T> Future for Promise<T> {
    type Output = RemoteResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(this.dropped())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
