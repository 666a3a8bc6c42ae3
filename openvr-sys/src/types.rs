use std::{
    fmt::{
        self,
        Display,
    },
    mem,
};

pub type VROverlayHandle_t = u64;
pub type TrackedDeviceIndex_t = u32;

pub const OVERLAY_HANDLE_INVALID: VROverlayHandle_t = 0;
pub const TRACKED_DEVICE_INDEX_HMD: TrackedDeviceIndex_t = 0;
pub const TRACKED_DEVICE_INDEX_INVALID: TrackedDeviceIndex_t = 0xffff_ffff;
pub const MAX_TRACKED_DEVICE_COUNT: usize = 64;
pub const MAX_OVERLAY_KEY_LENGTH: usize = 128;

pub const BUTTON_MASK_GRIP: u64 = 1 << 2;
pub const BUTTON_MASK_TRIGGER: u64 = 1 << 33;

/// Mask for a `EVRButtonId`, as `ButtonMaskFromId` does in the vendor header.
#[inline(always)]
pub const fn button_mask(id: u32) -> u64 {
    1u64 << id
}

// note: the structs in "openvr.h" are defined with "#pragma pack(8)", which
// plain repr(C) reproduces for these field layouts.

#[derive(Clone, Copy, Default, Debug)]
#[repr(C)]
pub struct HmdVector3 {
    pub v: [f32; 3],
}

/// Row-major 3x4 rigid transform, translation in the last column.
#[derive(Clone, Copy, Default, Debug)]
#[repr(C)]
pub struct HmdMatrix34 {
    pub m: [[f32; 4]; 3],
}

impl HmdMatrix34 {
    pub const IDENTITY: HmdMatrix34 = HmdMatrix34 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Identity rotation with the given translation.
    pub const fn translation(x: f32, y: f32, z: f32) -> HmdMatrix34 {
        HmdMatrix34 {
            m: [
                [1.0, 0.0, 0.0, x],
                [0.0, 1.0, 0.0, y],
                [0.0, 0.0, 1.0, z],
            ],
        }
    }

    #[inline(always)]
    pub fn translation_part(&self) -> [f32; 3] {
        [self.m[0][3], self.m[1][3], self.m[2][3]]
    }
}

#[derive(Clone, Copy, Default, Debug)]
#[repr(C)]
pub struct VRControllerAxis {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Default, Debug)]
#[repr(C)]
pub struct VRControllerState {
    pub packet_num: u32,
    pub button_pressed: u64,
    pub button_touched: u64,
    pub axis: [VRControllerAxis; 5],
}

/// Struct-version value the vendor expects on every controller state query.
pub const CONTROLLER_STATE_SIZE: u32 = mem::size_of::<VRControllerState>() as u32;

#[derive(Clone, Copy, Default, Debug)]
#[repr(C)]
pub struct TrackedDevicePose {
    pub device_to_absolute_tracking: HmdMatrix34,
    pub velocity: HmdVector3,
    pub angular_velocity: HmdVector3,
    pub tracking_result: u32,
    pub pose_is_valid: bool,
    pub device_is_connected: bool,
}

pub const TRACKING_RESULT_UNINITIALIZED: u32 = 1;
pub const TRACKING_RESULT_CALIBRATING_IN_PROGRESS: u32 = 100;
pub const TRACKING_RESULT_CALIBRATING_OUT_OF_RANGE: u32 = 101;
pub const TRACKING_RESULT_RUNNING_OK: u32 = 200;
pub const TRACKING_RESULT_RUNNING_OUT_OF_RANGE: u32 = 201;

/// Reference to a texture owned by the caller; nothing here ever frees it.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Texture {
    pub handle: usize,
    pub texture_type: ETextureType,
    pub color_space: EColorSpace,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct EVRApplicationType(pub i32);

impl EVRApplicationType {
    pub const OTHER: Self = EVRApplicationType(0);
    pub const SCENE: Self = EVRApplicationType(1);
    pub const OVERLAY: Self = EVRApplicationType(2);
    pub const BACKGROUND: Self = EVRApplicationType(3);
    pub const UTILITY: Self = EVRApplicationType(4);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct ETrackingUniverseOrigin(pub i32);

impl ETrackingUniverseOrigin {
    pub const SEATED: Self = ETrackingUniverseOrigin(0);
    pub const STANDING: Self = ETrackingUniverseOrigin(1);
    pub const RAW_AND_UNCALIBRATED: Self = ETrackingUniverseOrigin(2);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct ETrackedControllerRole(pub i32);

impl ETrackedControllerRole {
    pub const INVALID: Self = ETrackedControllerRole(0);
    pub const LEFT_HAND: Self = ETrackedControllerRole(1);
    pub const RIGHT_HAND: Self = ETrackedControllerRole(2);
    pub const OPT_OUT: Self = ETrackedControllerRole(3);
    pub const TREADMILL: Self = ETrackedControllerRole(4);
    pub const STYLUS: Self = ETrackedControllerRole(5);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct ETextureType(pub i32);

impl ETextureType {
    pub const INVALID: Self = ETextureType(-1);
    pub const DIRECTX: Self = ETextureType(0);
    pub const OPENGL: Self = ETextureType(1);
    pub const VULKAN: Self = ETextureType(2);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct EColorSpace(pub i32);

impl EColorSpace {
    pub const AUTO: Self = EColorSpace(0);
    pub const GAMMA: Self = EColorSpace(1);
    pub const LINEAR: Self = EColorSpace(2);
}

/// Single overlay render flag. `SetOverlayFlag` takes one flag per call, so
/// these are bit values but never combined into a mask on this side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct VROverlayFlags(pub u32);

impl VROverlayFlags {
    pub const NO_DASHBOARD_TAB: Self = VROverlayFlags(1 << 3);
    pub const SORT_WITH_NON_SCENE_OVERLAYS: Self = VROverlayFlags(1 << 14);
    pub const VISIBLE_IN_DASHBOARD: Self = VROverlayFlags(1 << 15);
    pub const MAKE_OVERLAYS_INTERACTIVE_IF_VISIBLE: Self = VROverlayFlags(1 << 16);
    pub const PROTECTED_CONTENT: Self = VROverlayFlags(1 << 18);
    pub const HIDE_LASER_INTERSECTION: Self = VROverlayFlags(1 << 19);
    pub const IS_PREMULTIPLIED: Self = VROverlayFlags(1 << 21);
    pub const IGNORE_TEXTURE_ALPHA: Self = VROverlayFlags(1 << 22);
}

/// Init status code, transparent over the wire value so codes from newer
/// runtimes pass through unmodified.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[repr(transparent)]
pub struct EVRInitError(pub i32);

impl EVRInitError {
    pub const NONE: Self = EVRInitError(0);
    pub const UNKNOWN: Self = EVRInitError(1);
    pub const INIT_INSTALLATION_NOT_FOUND: Self = EVRInitError(100);
    pub const INIT_INSTALLATION_CORRUPT: Self = EVRInitError(101);
    pub const INIT_VR_CLIENT_DLL_NOT_FOUND: Self = EVRInitError(102);
    pub const INIT_FILE_NOT_FOUND: Self = EVRInitError(103);
    pub const INIT_FACTORY_NOT_FOUND: Self = EVRInitError(104);
    pub const INIT_INTERFACE_NOT_FOUND: Self = EVRInitError(105);
    pub const INIT_INVALID_INTERFACE: Self = EVRInitError(106);
    pub const INIT_USER_CONFIG_DIRECTORY_INVALID: Self = EVRInitError(107);
    pub const INIT_HMD_NOT_FOUND: Self = EVRInitError(108);
    pub const INIT_NOT_INITIALIZED: Self = EVRInitError(109);
    pub const INIT_PATH_REGISTRY_NOT_FOUND: Self = EVRInitError(110);
    pub const INIT_NO_CONFIG_PATH: Self = EVRInitError(111);
    pub const INIT_NO_LOG_PATH: Self = EVRInitError(112);
    pub const INIT_PATH_REGISTRY_NOT_WRITABLE: Self = EVRInitError(113);
    pub const INIT_APP_INFO_INIT_FAILED: Self = EVRInitError(114);
    pub const INIT_RETRY: Self = EVRInitError(115);
    pub const INIT_CANCELED_BY_USER: Self = EVRInitError(116);
    pub const INIT_ANOTHER_APP_LAUNCHING: Self = EVRInitError(117);
    pub const INIT_SETTINGS_INIT_FAILED: Self = EVRInitError(118);
    pub const INIT_SHUTTING_DOWN: Self = EVRInitError(119);
    pub const INIT_TOO_MANY_OBJECTS: Self = EVRInitError(120);
    pub const INIT_NO_SERVER_FOR_BACKGROUND_APP: Self = EVRInitError(121);
    pub const INIT_NOT_SUPPORTED_WITH_COMPOSITOR: Self = EVRInitError(122);
    pub const INIT_NOT_AVAILABLE_TO_UTILITY_APPS: Self = EVRInitError(123);
    pub const INIT_INTERNAL: Self = EVRInitError(124);

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::NONE => "None",
            Self::UNKNOWN => "Unknown",
            Self::INIT_INSTALLATION_NOT_FOUND => "Init_InstallationNotFound",
            Self::INIT_INSTALLATION_CORRUPT => "Init_InstallationCorrupt",
            Self::INIT_VR_CLIENT_DLL_NOT_FOUND => "Init_VRClientDLLNotFound",
            Self::INIT_FILE_NOT_FOUND => "Init_FileNotFound",
            Self::INIT_FACTORY_NOT_FOUND => "Init_FactoryNotFound",
            Self::INIT_INTERFACE_NOT_FOUND => "Init_InterfaceNotFound",
            Self::INIT_INVALID_INTERFACE => "Init_InvalidInterface",
            Self::INIT_USER_CONFIG_DIRECTORY_INVALID => "Init_UserConfigDirectoryInvalid",
            Self::INIT_HMD_NOT_FOUND => "Init_HmdNotFound",
            Self::INIT_NOT_INITIALIZED => "Init_NotInitialized",
            Self::INIT_PATH_REGISTRY_NOT_FOUND => "Init_PathRegistryNotFound",
            Self::INIT_NO_CONFIG_PATH => "Init_NoConfigPath",
            Self::INIT_NO_LOG_PATH => "Init_NoLogPath",
            Self::INIT_PATH_REGISTRY_NOT_WRITABLE => "Init_PathRegistryNotWritable",
            Self::INIT_APP_INFO_INIT_FAILED => "Init_AppInfoInitFailed",
            Self::INIT_RETRY => "Init_Retry",
            Self::INIT_CANCELED_BY_USER => "Init_InitCanceledByUser",
            Self::INIT_ANOTHER_APP_LAUNCHING => "Init_AnotherAppLaunching",
            Self::INIT_SETTINGS_INIT_FAILED => "Init_SettingsInitFailed",
            Self::INIT_SHUTTING_DOWN => "Init_ShuttingDown",
            Self::INIT_TOO_MANY_OBJECTS => "Init_TooManyObjects",
            Self::INIT_NO_SERVER_FOR_BACKGROUND_APP => "Init_NoServerForBackgroundApp",
            Self::INIT_NOT_SUPPORTED_WITH_COMPOSITOR => "Init_NotSupportedWithCompositor",
            Self::INIT_NOT_AVAILABLE_TO_UTILITY_APPS => "Init_NotAvailableToUtilityApps",
            Self::INIT_INTERNAL => "Init_Internal",
            _ => return None,
        };
        Some(name)
    }
}

impl Display for EVRInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "VRInitError({})", self.0),
        }
    }
}

/// Overlay status code, transparent for the same reason as [`EVRInitError`].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[repr(transparent)]
pub struct EVROverlayError(pub i32);

impl EVROverlayError {
    pub const NONE: Self = EVROverlayError(0);
    pub const UNKNOWN_OVERLAY: Self = EVROverlayError(10);
    pub const INVALID_HANDLE: Self = EVROverlayError(11);
    pub const PERMISSION_DENIED: Self = EVROverlayError(12);
    pub const OVERLAY_LIMIT_EXCEEDED: Self = EVROverlayError(13);
    pub const WRONG_VISIBILITY_TYPE: Self = EVROverlayError(14);
    pub const KEY_TOO_LONG: Self = EVROverlayError(15);
    pub const NAME_TOO_LONG: Self = EVROverlayError(16);
    pub const KEY_IN_USE: Self = EVROverlayError(17);
    pub const WRONG_TRANSFORM_TYPE: Self = EVROverlayError(18);
    pub const INVALID_TRACKED_DEVICE: Self = EVROverlayError(19);
    pub const INVALID_PARAMETER: Self = EVROverlayError(20);
    pub const THUMBNAIL_CANT_BE_DESTROYED: Self = EVROverlayError(21);
    pub const ARRAY_TOO_SMALL: Self = EVROverlayError(22);
    pub const REQUEST_FAILED: Self = EVROverlayError(23);
    pub const INVALID_TEXTURE: Self = EVROverlayError(24);
    pub const UNABLE_TO_LOAD_FILE: Self = EVROverlayError(25);

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::NONE => "None",
            Self::UNKNOWN_OVERLAY => "UnknownOverlay",
            Self::INVALID_HANDLE => "InvalidHandle",
            Self::PERMISSION_DENIED => "PermissionDenied",
            Self::OVERLAY_LIMIT_EXCEEDED => "OverlayLimitExceeded",
            Self::WRONG_VISIBILITY_TYPE => "WrongVisibilityType",
            Self::KEY_TOO_LONG => "KeyTooLong",
            Self::NAME_TOO_LONG => "NameTooLong",
            Self::KEY_IN_USE => "KeyInUse",
            Self::WRONG_TRANSFORM_TYPE => "WrongTransformType",
            Self::INVALID_TRACKED_DEVICE => "InvalidTrackedDevice",
            Self::INVALID_PARAMETER => "InvalidParameter",
            Self::THUMBNAIL_CANT_BE_DESTROYED => "ThumbnailCantBeDestroyed",
            Self::ARRAY_TOO_SMALL => "ArrayTooSmall",
            Self::REQUEST_FAILED => "RequestFailed",
            Self::INVALID_TEXTURE => "InvalidTexture",
            Self::UNABLE_TO_LOAD_FILE => "UnableToLoadFile",
            _ => return None,
        };
        Some(name)
    }
}

impl Display for EVROverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "VROverlayError({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn struct_layouts_match_packed_header() {
        assert_eq!(size_of::<HmdVector3>(), 12);
        assert_eq!(size_of::<HmdMatrix34>(), 48);
        assert_eq!(size_of::<VRControllerAxis>(), 8);
        assert_eq!(size_of::<VRControllerState>(), 64);
        assert_eq!(size_of::<TrackedDevicePose>(), 80);
        assert_eq!(align_of::<VRControllerState>(), 8);
        assert_eq!(align_of::<TrackedDevicePose>(), 4);
    }

    #[test]
    fn controller_state_size_constant_matches_struct() {
        assert_eq!(CONTROLLER_STATE_SIZE, 64);
        assert_eq!(CONTROLLER_STATE_SIZE as usize, size_of::<VRControllerState>());
    }

    #[test]
    fn error_codes_stay_transparent() {
        assert_eq!(size_of::<EVRInitError>(), size_of::<i32>());
        assert_eq!(size_of::<EVROverlayError>(), size_of::<i32>());
        // A code past the pinned header generation survives untouched.
        let e = EVRInitError(1234);
        assert_eq!(e.0, 1234);
        assert_eq!(format!("{}", e), "VRInitError(1234)");
        assert_eq!(format!("{}", EVRInitError::INIT_HMD_NOT_FOUND), "Init_HmdNotFound (108)");
        assert_eq!(format!("{}", EVROverlayError::KEY_IN_USE), "KeyInUse (17)");
    }

    #[test]
    fn button_masks_match_header_bit_positions() {
        assert_eq!(BUTTON_MASK_GRIP, 0b100);
        assert_eq!(BUTTON_MASK_TRIGGER, 1u64 << 33);
        assert_eq!(button_mask(2), BUTTON_MASK_GRIP);
        assert_eq!(button_mask(33), BUTTON_MASK_TRIGGER);
    }

    #[test]
    fn translation_matrix_keeps_rotation_identity() {
        let m = HmdMatrix34::translation(1.0, -0.5, -2.0);
        assert_eq!(m.translation_part(), [1.0, -0.5, -2.0]);
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(m.m[row][col], expected);
            }
        }
    }
}
