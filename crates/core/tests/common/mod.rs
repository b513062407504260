//! Common test utilities shared by the integration tests.
//!
//! - Layout fixtures
//! - A channel-backed fake transport and its server side
//! - A view port that records every update

pub mod fake_transport;
pub mod fixtures;
pub mod recording_view;

#[allow(unused_imports)]
pub use fake_transport::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use recording_view::*;
