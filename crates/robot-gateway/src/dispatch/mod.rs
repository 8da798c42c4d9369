//! Event dispatch
//!
//! Turns platform events into service calls.

mod dispatcher;
mod state;

pub use dispatcher::EventDispatcher;
pub use state::DispatchState;
