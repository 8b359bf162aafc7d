//! # lite-promise
//!
//! Blocking coordination primitives for native threads: a monitor wrapper and a
//! one-shot promise/future channel.
//!
//! 面向原生线程的阻塞式协调原语：监视器包装器与一次性 promise/future 通道。
//!
//! ## Overview / 概述
//!
//! `lite-promise` provides two small, independent building blocks for passing control
//! and data between threads without hand-rolled shared variables plus locks:
//!
//! `lite-promise` 提供两个小而独立的构件，用于在线程之间传递控制与数据，无需手写
//! "共享变量 + 锁"：
//!
//! - **[`Monitor`]**: wraps any value and serializes every call on it
//! - **[`oneshot`]**: single-assignment result slot with blocking reads, bounded waits,
//!   error propagation and optional multi-reader fan-out
//!
//! - **[`Monitor`]**：包装任意值并串行化对它的每次调用
//! - **[`oneshot`]**：单次赋值的结果槽位，支持阻塞读取、有界等待、错误传播以及可选的多读端
//!
//! ## Modules / 模块
//!
//! ### [`monitor`]
//!
//! Synchronizing wrapper for types that were never designed for threaded code. Every
//! access goes through [`Monitor::invoke`], which holds the lock for exactly one
//! closure call.
//!
//! 为并非为多线程设计的类型提供同步包装。所有访问都通过 [`Monitor::invoke`]，
//! 每次闭包调用恰好持锁一次。
//!
//! **Limitation / 限制**: separate `invoke` calls are not atomic together. Put every
//! step of a transaction in one closure.
//!
//! ### [`oneshot`]
//!
//! A [`oneshot::Sender`] stores a value or an error exactly once. A
//! [`oneshot::Receiver`] retrieves it once; a [`oneshot::SharedReceiver`] can be cloned
//! and read any number of times. Dropping the sender before settling breaks the channel
//! instead of leaving readers blocked.
//!
//! [`oneshot::Sender`] 只存入一次值或错误。[`oneshot::Receiver`] 只能取走一次；
//! [`oneshot::SharedReceiver`] 可以克隆并任意次数读取。发送端未完成即被丢弃时通道断开，
//! 读端不会一直阻塞。
//!
//! ## Examples / 示例
//!
//! ### Monitor
//!
//! ```
//! use lite_promise::Monitor;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let counter = Arc::new(Monitor::new(0u64));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let counter = counter.clone();
//!         thread::spawn(move || {
//!             for _ in 0..1000 {
//!                 counter.invoke(|n| *n += 1);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(counter.invoke(|n| *n), 4000);
//! ```
//!
//! ### Promise with error propagation
//!
//! ```
//! use lite_promise::oneshot::{self, ErrorPayload, RecvError};
//! use std::io;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let (mut tx, mut rx) = oneshot::channel::<i32, ErrorPayload>();
//!
//! thread::spawn(move || {
//!     let error = io::Error::new(io::ErrorKind::InvalidInput, "Oops");
//!     tx.set_error(Arc::new(error)).unwrap();
//! });
//!
//! match rx.get() {
//!     Err(RecvError::Failed(error)) => assert_eq!(error.to_string(), "Oops"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ## Testing / 测试
//!
//! Enable the `loom` feature to swap the underlying lock, condition variable and `Arc`
//! for their [`loom`](https://docs.rs/loom) counterparts and run the model-checked tests
//! under `tests/`.
//!
//! 启用 `loom` 特性后，底层锁、条件变量和 `Arc` 会替换为 loom 版本，用于运行 `tests/`
//! 下的模型检查测试。

pub mod monitor;
pub mod oneshot;

mod shim;

pub use monitor::Monitor;
