//! One-shot result channel between a producer thread and its consumers
//!
//! A channel is a single-assignment slot shared by one [`Sender`] ("promise") and either
//! one [`Receiver`] or any number of [`SharedReceiver`]s ("futures"). The sender stores a
//! value or an error exactly once; readers block until it does.
//!
//! 生产者线程与消费者之间的一次性结果通道
//!
//! 通道是一个单次赋值槽位，由一个 [`Sender`]（"promise"）与一个 [`Receiver`] 或任意多个
//! [`SharedReceiver`]（"future"）共享。发送端只存入一次值或错误，读端阻塞直到存入完成。
//!
//! # States | 状态
//!
//! ```text
//!            set_value            get (single consumer)
//!   Empty ─────────────► Ready ───────────────────────► Retrieved
//!     │      set_error
//!     ├────────────────► Failed ──────────────────────► Retrieved
//!     │   sender dropped
//!     └────────────────► Broken
//! ```
//!
//! `Ready`, `Failed` and `Broken` are terminal for the sender: a second `set_*` fails
//! with [`AlreadySettled`]. Dropping the sender while the channel is still `Empty` makes
//! it `Broken`, so no reader waits forever.
//!
//! `Ready`、`Failed` 与 `Broken` 对发送端而言是终态：再次 `set_*` 返回 [`AlreadySettled`]。
//! 通道仍为 `Empty` 时丢弃发送端会使其变为 `Broken`，读端不会永久阻塞。
//!
//! # Example
//!
//! ```
//! use lite_promise::oneshot::{self, RecvError};
//! use std::thread;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct OutOfRange;
//!
//! let (mut tx, mut rx) = oneshot::channel::<i32, OutOfRange>();
//!
//! let producer = thread::spawn(move || {
//!     tx.set_value(42).unwrap();
//! });
//!
//! assert_eq!(rx.get(), Ok(42));
//! assert_eq!(rx.get(), Err(RecvError::AlreadyConsumed));
//! producer.join().unwrap();
//! ```
//!
//! Several consumers reading the same outcome:
//!
//! ```
//! use lite_promise::oneshot;
//! use std::thread;
//!
//! let (mut tx, rx) = oneshot::channel::<u64, oneshot::ErrorPayload>();
//! let shared = rx.share();
//!
//! let consumers: Vec<_> = (0..3)
//!     .map(|_| {
//!         let rx = shared.clone();
//!         thread::spawn(move || rx.get().ok())
//!     })
//!     .collect();
//!
//! tx.set_value(84).unwrap();
//!
//! for consumer in consumers {
//!     assert_eq!(consumer.join().unwrap(), Some(84));
//! }
//! ```
mod common;
mod receiver;
mod sender;
mod shared;

pub use self::common::error;
pub use self::common::{AlreadySettled, ErrorPayload, RecvError, WaitStatus};
pub use self::receiver::Receiver;
pub use self::sender::Sender;
pub use self::shared::SharedReceiver;

use self::common::Inner;

/// Create a oneshot channel with a single-consumer receiver
///
/// 创建带单消费者读端的 oneshot 通道
#[inline]
pub fn channel<T, E>() -> (Sender<T, E>, Receiver<T, E>) {
    let inner = Inner::new();
    (Sender::from_inner(inner.clone()), Receiver::from_inner(inner))
}

/// Create a oneshot channel whose reader is shared from the start
///
/// Equivalent to `channel()` followed by [`Receiver::share`].
///
/// 创建读端一开始即为共享模式的 oneshot 通道
#[inline]
pub fn shared_channel<T, E>() -> (Sender<T, E>, SharedReceiver<T, E>) {
    let (sender, receiver) = channel();
    (sender, receiver.share())
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_set_value_twice_is_already_settled() {
        let (mut tx, mut rx) = channel::<i32, String>();

        tx.set_value(1).unwrap();
        let rejected = tx.set_value(2).unwrap_err();
        assert_eq!(rejected.into_inner(), 2);
        assert!(tx.is_settled());

        assert_eq!(rx.get(), Ok(1));
    }

    #[test]
    fn test_set_value_after_set_error_is_already_settled() {
        let (mut tx, mut rx) = channel::<i32, String>();

        tx.set_error("first".to_string()).unwrap();
        assert_eq!(tx.set_value(2).unwrap_err().0, 2);
        assert_eq!(tx.set_error("second".to_string()).unwrap_err().0, "second");

        assert_eq!(rx.get(), Err(RecvError::Failed("first".to_string())));
    }

    #[test]
    fn test_settle_routes_ok_and_err() {
        let (mut tx, mut rx) = channel::<i32, String>();
        tx.settle(Err("parse failed".to_string())).unwrap();
        assert!(tx.settle(Ok(1)).is_err());
        assert_eq!(rx.get(), Err(RecvError::Failed("parse failed".to_string())));

        let (mut tx, mut rx) = channel::<i32, String>();
        tx.settle(Ok(10)).unwrap();
        assert_eq!(rx.get(), Ok(10));
    }

    #[test]
    fn test_settle_after_receiver_dropped() {
        let (mut tx, rx) = channel::<Vec<u8>, ()>();
        assert!(!tx.is_closed());
        drop(rx);
        assert!(tx.is_closed());

        // Nobody listens, but storing is still fine.
        tx.set_value(vec![1, 2, 3]).unwrap();
    }

    #[test]
    fn test_many_blocked_readers_all_woken() {
        let (mut tx, shared) = shared_channel::<i32, ()>();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let rx = shared.clone();
                thread::spawn(move || rx.get())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        tx.set_value(42).unwrap();

        for reader in readers {
            assert_eq!(reader.join().unwrap(), Ok(42));
        }
    }

    #[test]
    fn test_error_type_defaults_to_payload() {
        use std::io;
        use std::sync::Arc;

        let (mut tx, mut rx): (Sender<i32>, Receiver<i32>) = channel();
        tx.set_error(Arc::new(io::Error::new(io::ErrorKind::InvalidInput, "Oops")))
            .unwrap();

        match rx.get() {
            Err(RecvError::Failed(error)) => assert_eq!(error.to_string(), "Oops"),
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }

        let (mut tx, shared): (Sender<&str>, SharedReceiver<&str>) = shared_channel();
        tx.set_value("fine").unwrap();
        assert_eq!(shared.get().ok(), Some("fine"));
    }

    #[test]
    fn test_debug_output() {
        let (tx, rx) = channel::<i32, ()>();
        assert_eq!(format!("{:?}", tx), "Sender { settled: false, .. }");
        assert_eq!(format!("{:?}", rx), "Receiver { consumed: false, .. }");
        assert_eq!(format!("{:?}", rx.share()), "SharedReceiver { .. }");
    }
}
