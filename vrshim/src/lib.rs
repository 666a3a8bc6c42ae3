//! Flat C facade over the OpenVR session, tracking, and overlay wrappers,
//! plus high-resolution timing helpers. Every export is POD-in, POD-out;
//! errors cross the boundary as vendor status codes or plain booleans.

extern crate openvr;
#[macro_use] extern crate log;
extern crate env_logger;

pub use openvr::sys as openvr_sys;

mod logging;
mod registry;
pub mod ffi;
pub mod timing;

pub(crate) const CRATE_NAME: &'static str = env!("CARGO_CRATE_NAME");
