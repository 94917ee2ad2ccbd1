//! Storage core for the todo list.
//! - `storage`: in-memory session store and the durable artifact adapter.
//! - `todo`: the read/write façade callers talk to.
//! - `runtime`: wires both from configuration at startup.

pub mod errors;
pub mod metrics;
pub mod runtime;
pub mod storage;
pub mod todo;
#[cfg(test)]
pub mod test_support;
