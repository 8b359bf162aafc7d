//! Multi-consumer reader half of the oneshot channel.
//!
//! oneshot 通道的多消费者读端。

use std::fmt;
use std::time::{Duration, Instant};

use super::common::{ErrorPayload, Inner, RecvError, WaitStatus};
use crate::shim::sync::Arc;

/// Clonable reader handle over a oneshot channel
///
/// Every clone refers to the same state block and observes the same outcome, any
/// number of times. Cloning bumps the reference count; dropping releases it.
///
/// 可克隆的 oneshot 读端。所有克隆共享同一状态块，可任意次数读取，看到相同的结果。
pub struct SharedReceiver<T, E = ErrorPayload> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for SharedReceiver<T, E> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> fmt::Debug for SharedReceiver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedReceiver").finish_non_exhaustive()
    }
}

impl<T, E> SharedReceiver<T, E> {
    #[inline]
    pub(crate) fn from_inner(inner: Arc<Inner<T, E>>) -> Self {
        Self { inner }
    }

    /// Block until the channel is settled and return a clone of the outcome
    ///
    /// Repeatable: every call on every clone returns an equal value or error.
    ///
    /// 阻塞直到通道完成，返回结果的克隆。可重复调用，所有克隆得到相同的值或错误。
    pub fn get(&self) -> Result<T, RecvError<E>>
    where
        T: Clone,
        E: Clone,
    {
        self.inner.get_cloned()
    }

    /// Clone the outcome if the channel is already settled, without blocking
    pub fn try_get(&self) -> Option<Result<T, RecvError<E>>>
    where
        T: Clone,
        E: Clone,
    {
        self.inner.try_get_cloned()
    }

    /// Block until the channel is settled, without cloning the outcome
    ///
    /// 阻塞直到通道完成，不克隆结果
    #[inline]
    pub fn wait(&self) -> WaitStatus {
        self.inner.wait()
    }

    /// Block for at most `timeout`; `Duration::ZERO` polls without blocking
    ///
    /// 最多阻塞 `timeout`；`Duration::ZERO` 只检查不阻塞
    #[inline]
    pub fn wait_for(&self, timeout: Duration) -> WaitStatus {
        self.inner.wait_for(timeout)
    }

    /// Block until `deadline` at the latest
    ///
    /// 最迟阻塞到 `deadline`
    #[inline]
    pub fn wait_until(&self, deadline: Instant) -> WaitStatus {
        self.inner.wait_until(deadline)
    }

    /// Whether the channel is settled, so `get` would not block
    ///
    /// 通道是否已完成，即 `get` 不会阻塞
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.inner.is_settled()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::oneshot::{ErrorPayload, RecvError, WaitStatus, channel, shared_channel};
    use std::sync::{Arc, mpsc};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug)]
    struct OutOfRange;

    impl std::fmt::Display for OutOfRange {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "out of range")
        }
    }

    impl std::error::Error for OutOfRange {}

    #[test]
    fn test_three_readers_observe_same_value() {
        let (mut tx, rx) = channel::<i32, ErrorPayload>();
        let shared = rx.share();

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let reader = shared.clone();
                thread::spawn(move || reader.get().ok())
            })
            .collect();

        thread::sleep(Duration::from_millis(10));
        tx.set_value(84).unwrap();

        for reader in readers {
            assert_eq!(reader.join().unwrap(), Some(84));
        }
        // Repeatable on the original handle too.
        assert_eq!(shared.get().ok(), Some(84));
        assert_eq!(shared.get().ok(), Some(84));
    }

    #[test]
    fn test_every_reader_gets_same_error_object() {
        let (mut tx, shared) = shared_channel::<i32, ErrorPayload>();
        let payload: ErrorPayload = Arc::new(OutOfRange);
        tx.set_error(payload.clone()).unwrap();

        let copies = [shared.clone(), shared.clone(), shared];
        for reader in &copies {
            match reader.get() {
                Err(RecvError::Failed(error)) => {
                    assert!(Arc::ptr_eq(&error, &payload));
                    assert_eq!(error.to_string(), "out of range");
                }
                other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_shared_readers_see_broken() {
        let (tx, shared) = shared_channel::<String, ErrorPayload>();
        let other = shared.clone();

        let (done_tx, done_rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = done_tx.send(other.get().map(|_| ()).map_err(|e| e.is_broken()));
        });
        thread::sleep(Duration::from_millis(10));
        drop(tx);

        let outcome = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("shared reader still blocked after the sender was dropped");
        assert_eq!(outcome, Err(true));
        assert!(shared.get().is_err_and(|e| e.is_broken()));
        assert_eq!(shared.wait(), WaitStatus::Failed);
    }

    #[test]
    fn test_try_get_and_wait_for_zero() {
        let (mut tx, shared) = shared_channel::<u8, ()>();

        assert_eq!(shared.try_get(), None);
        assert_eq!(shared.wait_for(Duration::ZERO), WaitStatus::TimedOut);
        assert!(!shared.is_ready());

        tx.set_value(9).unwrap();
        assert_eq!(shared.try_get(), Some(Ok(9)));
        assert_eq!(shared.try_get(), Some(Ok(9)));
    }

    #[test]
    fn test_sender_is_closed_tracks_every_clone() {
        let (tx, shared) = shared_channel::<u8, ()>();
        let second = shared.clone();

        drop(shared);
        assert!(!tx.is_closed());
        drop(second);
        assert!(tx.is_closed());
    }
}
