//! End-to-end tests of the relay pipeline against stub collaborators.

mod relay_flow;
mod stubs;
