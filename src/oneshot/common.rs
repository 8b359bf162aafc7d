//! Shared state block and error types for the oneshot channel.
//!
//! oneshot 通道的共享状态块与错误类型。

use std::mem;
use std::time::{Duration, Instant};

use crate::shim::{
    self,
    sync::{Arc, Condvar, Mutex},
};

// ============================================================================
// Error Types
// ============================================================================

pub mod error {
    //! Oneshot error types.

    use std::fmt;

    use thiserror::Error;

    /// Type-erased error payload carried by a failed channel.
    ///
    /// Cloning it clones the `Arc`, so every reader observes the very same error
    /// object (`Arc::ptr_eq` holds between them).
    ///
    /// 失败通道携带的类型擦除错误载荷。克隆只克隆 `Arc`，所有读端看到的是同一个错误对象。
    pub type ErrorPayload = std::sync::Arc<dyn std::error::Error + Send + Sync + 'static>;

    /// Error returned when a sender tries to settle a channel a second time
    ///
    /// Carries the rejected payload back to the caller. The channel keeps its first
    /// outcome.
    ///
    /// 发送端第二次尝试完成通道时返回的错误。被拒绝的载荷原样交还，通道保持首次结果。
    #[derive(Error)]
    #[error("promise already settled")]
    pub struct AlreadySettled<T>(pub T);

    impl<T> AlreadySettled<T> {
        /// Get back the value or error that was rejected
        #[inline]
        pub fn into_inner(self) -> T {
            self.0
        }
    }

    impl<T> fmt::Debug for AlreadySettled<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("AlreadySettled").finish_non_exhaustive()
        }
    }

    /// Error returned by the reader side when no value can be produced
    ///
    /// 读端无法得到值时返回的错误
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum RecvError<E> {
        /// The producer settled the channel with an error
        ///
        /// 生产者以错误完成了通道
        #[error("promise failed: {0}")]
        Failed(E),
        /// The sender was dropped without settling the channel
        ///
        /// 发送端在完成通道之前被丢弃
        #[error("channel broken: sender dropped without settling")]
        Broken,
        /// The single-consumer receiver already retrieved the outcome
        ///
        /// 单消费者接收端已经取走了结果
        #[error("outcome already retrieved")]
        AlreadyConsumed,
    }

    impl<E> RecvError<E> {
        /// The application error, if the producer failed
        #[inline]
        pub fn into_failure(self) -> Option<E> {
            match self {
                RecvError::Failed(e) => Some(e),
                RecvError::Broken | RecvError::AlreadyConsumed => None,
            }
        }

        #[inline]
        pub fn is_broken(&self) -> bool {
            matches!(self, RecvError::Broken)
        }
    }
}

pub use self::error::{AlreadySettled, ErrorPayload, RecvError};

/// Outcome of a bounded wait
///
/// None of the wait methods consume the value.
///
/// 有界等待的结果。等待方法都不会取走值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitStatus {
    /// A value is stored
    Ready,
    /// An error is stored, or the sender was dropped without settling
    Failed,
    /// The deadline passed while the channel was still empty
    TimedOut,
}

// ============================================================================
// State
// ============================================================================

pub(crate) enum State<T, E> {
    Empty,
    Ready(T),
    Failed(E),
    Broken,
    /// Single-consumer receiver moved the outcome out. Remembers `Ready` or `Failed`.
    Retrieved(WaitStatus),
}

impl<T, E> State<T, E> {
    #[inline]
    fn status(&self) -> Option<WaitStatus> {
        match self {
            State::Empty => None,
            State::Ready(_) => Some(WaitStatus::Ready),
            State::Failed(_) | State::Broken => Some(WaitStatus::Failed),
            State::Retrieved(status) => Some(*status),
        }
    }

    /// Move the outcome out, leaving `Retrieved` behind.
    fn take(&mut self) -> Result<T, RecvError<E>> {
        match self {
            State::Empty => unreachable!("take on an empty channel"),
            State::Broken => Err(RecvError::Broken),
            State::Retrieved(_) => Err(RecvError::AlreadyConsumed),
            State::Ready(_) => match mem::replace(self, State::Retrieved(WaitStatus::Ready)) {
                State::Ready(value) => Ok(value),
                _ => unreachable!(),
            },
            State::Failed(_) => match mem::replace(self, State::Retrieved(WaitStatus::Failed)) {
                State::Failed(error) => Err(RecvError::Failed(error)),
                _ => unreachable!(),
            },
        }
    }

    fn cloned(&self) -> Result<T, RecvError<E>>
    where
        T: Clone,
        E: Clone,
    {
        match self {
            State::Empty => unreachable!("clone on an empty channel"),
            State::Ready(value) => Ok(value.clone()),
            State::Failed(error) => Err(RecvError::Failed(error.clone())),
            State::Broken => Err(RecvError::Broken),
            State::Retrieved(_) => Err(RecvError::AlreadyConsumed),
        }
    }
}

// ============================================================================
// Inner State
// ============================================================================

/// State block shared by the sender and every receiver of one channel
pub(crate) struct Inner<T, E> {
    state: Mutex<State<T, E>>,
    ready: Condvar,
}

impl<T, E> Inner<T, E> {
    #[inline]
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::Empty),
            ready: Condvar::new(),
        })
    }

    /// Store `payload` if the channel is still empty, waking every waiter.
    ///
    /// Returns the payload untouched if the channel was already settled.
    pub(crate) fn try_settle<V>(
        &self,
        payload: V,
        wrap: impl FnOnce(V) -> State<T, E>,
    ) -> Result<(), V> {
        let (mut state, _) = shim::lock(&self.state);
        if !matches!(*state, State::Empty) {
            return Err(payload);
        }
        *state = wrap(payload);
        drop(state);
        self.ready.notify_all();
        Ok(())
    }

    /// Mark the channel broken if nothing was stored. Returns whether it was empty.
    pub(crate) fn abandon(&self) -> bool {
        let (mut state, _) = shim::lock(&self.state);
        if !matches!(*state, State::Empty) {
            return false;
        }
        *state = State::Broken;
        drop(state);
        self.ready.notify_all();
        true
    }

    #[inline]
    pub(crate) fn is_settled(&self) -> bool {
        let (state, _) = shim::lock(&self.state);
        !matches!(*state, State::Empty)
    }

    /// Block until the channel leaves `Empty`.
    fn wait_settled(&self) -> shim::sync::MutexGuard<'_, State<T, E>> {
        let (mut state, _) = shim::lock(&self.state);
        while matches!(*state, State::Empty) {
            state = shim::wait(&self.ready, state);
        }
        state
    }

    pub(crate) fn wait(&self) -> WaitStatus {
        match self.wait_settled().status() {
            Some(status) => status,
            None => unreachable!("wait returned on an empty channel"),
        }
    }

    pub(crate) fn wait_until(&self, deadline: Instant) -> WaitStatus {
        let (mut state, _) = shim::lock(&self.state);
        loop {
            if let Some(status) = state.status() {
                return status;
            }
            let now = Instant::now();
            if now >= deadline {
                return WaitStatus::TimedOut;
            }
            state = shim::wait_timeout(&self.ready, state, deadline - now);
        }
    }

    pub(crate) fn wait_for(&self, timeout: Duration) -> WaitStatus {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_until(deadline),
            // Deadline not representable: as good as forever.
            None => self.wait(),
        }
    }

    pub(crate) fn take(&self) -> Result<T, RecvError<E>> {
        self.wait_settled().take()
    }

    pub(crate) fn try_take(&self) -> Option<Result<T, RecvError<E>>> {
        let (mut state, _) = shim::lock(&self.state);
        match *state {
            State::Empty => None,
            _ => Some(state.take()),
        }
    }

    pub(crate) fn get_cloned(&self) -> Result<T, RecvError<E>>
    where
        T: Clone,
        E: Clone,
    {
        self.wait_settled().cloned()
    }

    pub(crate) fn try_get_cloned(&self) -> Option<Result<T, RecvError<E>>>
    where
        T: Clone,
        E: Clone,
    {
        let (state, _) = shim::lock(&self.state);
        match *state {
            State::Empty => None,
            _ => Some(state.cloned()),
        }
    }
}
