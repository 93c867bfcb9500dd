//! External collaborators consumed as opaque records.
//!
//! Everything in here is a one-shot call into a platform facility; the core
//! pipeline never interprets the data beyond serializing it into the
//! manifest or the `events/` folder. Each collector degrades to an empty
//! record when the facility is unavailable, it never aborts the run.

pub mod events;
pub mod hardware;
pub mod power;
