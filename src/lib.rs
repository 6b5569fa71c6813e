pub mod api;
pub mod conf;
pub mod convert;
pub mod core;

#[cfg(feature = "testutil")]
pub mod testutil;
