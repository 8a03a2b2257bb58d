//! Worker-level retry bounds for queue consumers. These cover handler
//! crashes and infrastructure faults; the engine's own submission budget is
//! in `execution.rs`.

pub const WORKER_DEFAULT_MAXIMUM_RETRIES: usize = 3;
