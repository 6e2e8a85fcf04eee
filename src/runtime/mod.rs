//! Runtime core: object heap, numeric tower, evaluator, units and the
//! command loop.
//!
//! # Memory model
//! Every object lives in the compacting heap and is reached through a
//! [`gc::Handle`]. Evaluation works on owned [`tower::Value`]s decoded from
//! the heap, so no borrow of heap bytes is ever held across an allocation.
//! Heap objects form a DAG: payload references only point at objects that
//! existed when the referencing object was built.

pub mod arithmetic;
pub mod config;
pub mod error;
pub mod expr;
pub mod gc;
pub mod screen;
pub mod tower;
pub mod units;
pub mod vm;

pub use config::{AngleMode, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use tower::Value;
pub use vm::{Key, Runtime};
