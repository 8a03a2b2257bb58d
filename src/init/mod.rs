//! Application startup: state construction, identity synchronization and
//! worker registration.

mod initialize_app_state;
pub use initialize_app_state::*;

mod initialize_workers;
pub use initialize_workers::*;

mod identity_sync;
pub use identity_sync::*;
