//! Imperative shell around the pure transition table.
//!
//! [`Lifecycle`] performs the load/apply/save cycle against an
//! [`EntityStore`](crate::store::EntityStore). Each operation comes in two
//! forms:
//!
//! - `*_in(&store, ..)` runs immediately and returns a `Result`;
//! - the bare name returns a Stillwater `BoxedEffect` whose environment is
//!   the store, so the cycle can be composed now and run later with
//!   `.run(&store).await`.

mod error;
mod lifecycle;

pub use error::MachineError;
pub use lifecycle::{Lifecycle, TransitionObserver};
