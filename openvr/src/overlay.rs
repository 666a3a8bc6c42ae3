use openvr_sys as sys;

use std::{
    ffi::CStr,
    fmt::{
        self,
        Display,
    },
};

use crate::{
    error_ext::*,
};

/// Owned reference to a live vendor overlay. Only [`Overlay::create`]
/// produces one and only [`Overlay::destroy`] consumes one; not `Copy`, so
/// a destroyed overlay cannot be named again through the safe API.
#[derive(Debug, PartialEq, Eq)]
pub struct OverlayHandle(sys::VROverlayHandle_t);

impl OverlayHandle {
    #[inline(always)]
    pub fn raw(&self) -> sys::VROverlayHandle_t {
        self.0
    }
}

impl Display for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Overlay management against `IVROverlay`. Vendor status codes are
/// surfaced unchanged, including failures from `show` and `hide`.
pub struct Overlay {
    table: *const sys::OverlayFnTable,
}

impl Overlay {
    /// Same validity contract as [`crate::System::from_table`].
    pub unsafe fn from_table(table: *const sys::OverlayFnTable) -> Overlay {
        Overlay {
            table: table,
        }
    }

    #[inline(always)]
    fn table(&self) -> &sys::OverlayFnTable {
        unsafe { &*self.table }
    }

    /// Creates an overlay under `key`, which must be unique runtime-wide.
    /// A second creation with a live key fails with `KEY_IN_USE`.
    pub fn create<K, N>(&self, key: K, name: N) -> Result<OverlayHandle, sys::EVROverlayError> where
        K: AsRef<CStr>,
        N: AsRef<CStr>,
    {
        let mut handle = sys::OVERLAY_HANDLE_INVALID;
        let e = (self.table().create_overlay)(
            key.as_ref().as_ptr(),
            name.as_ref().as_ptr(),
            &mut handle as *mut _,
        );
        e.into_result().map(move |_| OverlayHandle(handle))
    }

    pub fn set_flag(
        &self,
        handle: &OverlayHandle,
        flag: sys::VROverlayFlags,
        enabled: bool,
    ) -> Result<(), sys::EVROverlayError> {
        (self.table().set_overlay_flag)(handle.raw(), flag, enabled).into_empty_result()
    }

    /// Widths that are not strictly positive (zero, negative, NaN) are
    /// rejected with `INVALID_PARAMETER` before the vendor sees them.
    pub fn set_width_in_meters(
        &self,
        handle: &OverlayHandle,
        width: f32,
    ) -> Result<(), sys::EVROverlayError> {
        if !(width > 0.0) {
            return Err(sys::EVROverlayError::INVALID_PARAMETER);
        }
        (self.table().set_overlay_width_in_meters)(handle.raw(), width).into_empty_result()
    }

    /// Anchors the overlay to a tracked device, offset in its local frame.
    pub fn set_transform_tracked_device_relative(
        &self,
        handle: &OverlayHandle,
        device: sys::TrackedDeviceIndex_t,
        transform: &sys::HmdMatrix34,
    ) -> Result<(), sys::EVROverlayError> {
        (self.table().set_overlay_transform_tracked_device_relative)(
            handle.raw(),
            device,
            transform as *const _,
        ).into_empty_result()
    }

    /// Points the overlay at a caller-owned texture, borrowed for as long
    /// as the overlay shows it and never released from this side.
    pub fn set_texture(
        &self,
        handle: &OverlayHandle,
        texture: &sys::Texture,
    ) -> Result<(), sys::EVROverlayError> {
        (self.table().set_overlay_texture)(handle.raw(), texture as *const _).into_empty_result()
    }

    /// [`Overlay::set_texture`] for a GL texture object name.
    pub fn set_gl_texture(
        &self,
        handle: &OverlayHandle,
        gl_texture: usize,
    ) -> Result<(), sys::EVROverlayError> {
        let texture = sys::Texture {
            handle: gl_texture,
            texture_type: sys::ETextureType::OPENGL,
            color_space: sys::EColorSpace::AUTO,
        };
        self.set_texture(handle, &texture)
    }

    pub fn show(&self, handle: &OverlayHandle) -> Result<(), sys::EVROverlayError> {
        (self.table().show_overlay)(handle.raw()).into_empty_result()
    }

    pub fn hide(&self, handle: &OverlayHandle) -> Result<(), sys::EVROverlayError> {
        (self.table().hide_overlay)(handle.raw()).into_empty_result()
    }

    /// Destroys the overlay. The handle is spent either way.
    pub fn destroy(&self, handle: OverlayHandle) -> Result<(), sys::EVROverlayError> {
        (self.table().destroy_overlay)(handle.raw()).into_empty_result()
    }
}
