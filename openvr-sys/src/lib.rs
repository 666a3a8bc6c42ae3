//! Hand-maintained OpenVR ABI subset for overlay applications.
//!
//! Layouts are pinned to the header generation that ships `IVRSystem_022` and
//! `IVROverlay_026`, and the runtime is resolved with `libloading` at init
//! time rather than linked, so nothing here requires the vendor SDK to build.

#![allow(non_camel_case_types)]

extern crate libc;
extern crate libloading;

mod types;
mod tables;
pub mod loader;

pub use types::*;
pub use tables::*;
pub use loader::OpenVrLibrary;
