//! Named camera operations
//!
//! Every operation is one row of the table at the bottom of this module:
//! the Rust method name, the service it runs on, its wire method name, its
//! arguments and the positional `params` they become. The generated methods
//! do nothing but encode the params and call [`CameraClient::invoke`].

use paste::paste;
use rpc_client::{RpcError, Transport};
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::CameraClient;
use crate::service::Service;

/// Encode one positional parameter
fn to_param<S: Serialize>(value: S) -> Result<Value, RpcError> {
    Ok(serde_json::to_value(value)?)
}

/// Generate named operations from table rows
///
/// Each row produces a method on [`CameraClient`], a wire-name constant in
/// [`methods`] and an entry in [`OPERATIONS`].
///
/// # Example
/// ```rust,ignore
/// camera_operations! {
///     /// Switch between still and movie shooting
///     Camera set_shoot_mode = "setShootMode" (mode: &str) => [mode];
/// }
/// ```
macro_rules! camera_operations {
    ($(
        $(#[$doc:meta])*
        $service:ident $name:ident = $method:literal ( $($arg:ident : $ty:ty),* ) => [ $($param:expr),* ];
    )*) => {
        paste! {
            /// Wire method names of the named operations
            pub mod methods {
                $( pub const [<$name:upper>]: &str = $method; )*
            }
        }

        /// `(wire method name, service)` for every named operation
        pub const OPERATIONS: &[(&str, Service)] = &[$( ($method, Service::$service) ),*];

        impl<T: Transport> CameraClient<T> {
            $(
                $(#[$doc])*
                pub fn $name(&self, $($arg: $ty),*) -> Result<Vec<Value>, RpcError> {
                    let params: Vec<Value> = vec![$( to_param($param)? ),*];
                    self.invoke(Service::$service.key(), $method, params)
                }
            )*
        }
    };
}

/// Service a named operation runs on, by wire method name
pub fn service_of(method: &str) -> Option<Service> {
    OPERATIONS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, service)| *service)
}

camera_operations! {
    /// Supported API versions
    Camera get_versions = "getVersions" () => [];
    /// Methods and their parameter types for API `version`
    Camera get_method_types = "getMethodTypes" (version: &str) => [version];
    /// Methods callable in the camera's current state
    Camera get_available_api_list = "getAvailableApiList" () => [];
    /// Camera status; with `long_polling` the call blocks until something changes
    Camera get_event = "getEvent" (long_polling: bool) => [long_polling];
    Camera start_rec_mode = "startRecMode" () => [];
    Camera stop_rec_mode = "stopRecMode" () => [];

    /// Switch between `still`, `movie`, `audio` and `intervalstill`
    Camera set_shoot_mode = "setShootMode" (mode: &str) => [mode];
    Camera get_shoot_mode = "getShootMode" () => [];
    Camera get_supported_shoot_mode = "getSupportedShootMode" () => [];
    Camera get_available_shoot_mode = "getAvailableShootMode" () => [];

    /// Take a picture; the result holds the postview image URLs
    Camera act_take_picture = "actTakePicture" () => [];
    /// Wait for a picture started by `act_take_picture` that returned code 40403
    Camera await_take_picture = "awaitTakePicture" () => [];
    Camera start_cont_shooting = "startContShooting" () => [];
    Camera stop_cont_shooting = "stopContShooting" () => [];
    Camera start_movie_rec = "startMovieRec" () => [];
    Camera stop_movie_rec = "stopMovieRec" () => [];
    Camera start_audio_rec = "startAudioRec" () => [];
    Camera stop_audio_rec = "stopAudioRec" () => [];
    Camera start_interval_still_rec = "startIntervalStillRec" () => [];
    Camera stop_interval_still_rec = "stopIntervalStillRec" () => [];

    /// Start live view; the result holds the live view stream URL
    Camera start_liveview = "startLiveview" () => [];
    Camera stop_liveview = "stopLiveview" () => [];
    /// Start live view at `size` (`L` or `M`)
    Camera start_liveview_with_size = "startLiveviewWithSize" (size: &str) => [size];
    Camera get_liveview_size = "getLiveviewSize" () => [];
    Camera get_supported_liveview_size = "getSupportedLiveviewSize" () => [];
    Camera get_available_liveview_size = "getAvailableLiveviewSize" () => [];
    Camera set_liveview_frame_info = "setLiveviewFrameInfo" (frame_info: bool) => [json!({ "frameInfo": frame_info })];
    Camera get_liveview_frame_info = "getLiveviewFrameInfo" () => [];

    /// Zoom `direction` (`in`/`out`) with `movement` (`start`, `stop` or `1shot`)
    Camera act_zoom = "actZoom" (direction: &str, movement: &str) => [direction, movement];
    Camera set_zoom_setting = "setZoomSetting" (zoom: &str) => [json!({ "zoom": zoom })];
    Camera get_zoom_setting = "getZoomSetting" () => [];
    Camera get_supported_zoom_setting = "getSupportedZoomSetting" () => [];
    Camera get_available_zoom_setting = "getAvailableZoomSetting" () => [];

    Camera act_half_press_shutter = "actHalfPressShutter" () => [];
    Camera cancel_half_press_shutter = "cancelHalfPressShutter" () => [];
    /// Focus on a point given in percent of the live view frame
    Camera set_touch_af_position = "setTouchAFPosition" (x: f64, y: f64) => [x, y];
    Camera get_touch_af_position = "getTouchAFPosition" () => [];
    Camera cancel_touch_af_position = "cancelTouchAFPosition" () => [];
    /// Start tracking the subject at a point given in percent of the frame
    Camera act_tracking_focus = "actTrackingFocus" (x: f64, y: f64) => [json!({ "xPosition": x, "yPosition": y })];
    Camera cancel_tracking_focus = "cancelTrackingFocus" () => [];
    Camera set_tracking_focus = "setTrackingFocus" (tracking_focus: &str) => [json!({ "trackingFocus": tracking_focus })];
    Camera get_tracking_focus = "getTrackingFocus" () => [];
    Camera get_supported_tracking_focus = "getSupportedTrackingFocus" () => [];
    Camera get_available_tracking_focus = "getAvailableTrackingFocus" () => [];

    Camera set_cont_shooting_mode = "setContShootingMode" (mode: &str) => [json!({ "contShootingMode": mode })];
    Camera get_cont_shooting_mode = "getContShootingMode" () => [];
    Camera get_supported_cont_shooting_mode = "getSupportedContShootingMode" () => [];
    Camera get_available_cont_shooting_mode = "getAvailableContShootingMode" () => [];
    Camera set_cont_shooting_speed = "setContShootingSpeed" (speed: &str) => [json!({ "contShootingSpeed": speed })];
    Camera get_cont_shooting_speed = "getContShootingSpeed" () => [];
    Camera get_supported_cont_shooting_speed = "getSupportedContShootingSpeed" () => [];
    Camera get_available_cont_shooting_speed = "getAvailableContShootingSpeed" () => [];

    /// Self-timer delay in seconds, `0` to disable
    Camera set_self_timer = "setSelfTimer" (seconds: u32) => [seconds];
    Camera get_self_timer = "getSelfTimer" () => [];
    Camera get_supported_self_timer = "getSupportedSelfTimer" () => [];
    Camera get_available_self_timer = "getAvailableSelfTimer" () => [];

    Camera set_exposure_mode = "setExposureMode" (mode: &str) => [mode];
    Camera get_exposure_mode = "getExposureMode" () => [];
    Camera get_supported_exposure_mode = "getSupportedExposureMode" () => [];
    Camera get_available_exposure_mode = "getAvailableExposureMode" () => [];

    Camera set_focus_mode = "setFocusMode" (mode: &str) => [mode];
    Camera get_focus_mode = "getFocusMode" () => [];
    Camera get_supported_focus_mode = "getSupportedFocusMode" () => [];
    Camera get_available_focus_mode = "getAvailableFocusMode" () => [];

    /// Exposure compensation as an index into the supported steps
    Camera set_exposure_compensation = "setExposureCompensation" (index: i32) => [index];
    Camera get_exposure_compensation = "getExposureCompensation" () => [];
    Camera get_supported_exposure_compensation = "getSupportedExposureCompensation" () => [];
    Camera get_available_exposure_compensation = "getAvailableExposureCompensation" () => [];

    Camera set_f_number = "setFNumber" (f_number: &str) => [f_number];
    Camera get_f_number = "getFNumber" () => [];
    Camera get_supported_f_number = "getSupportedFNumber" () => [];
    Camera get_available_f_number = "getAvailableFNumber" () => [];

    Camera set_shutter_speed = "setShutterSpeed" (speed: &str) => [speed];
    Camera get_shutter_speed = "getShutterSpeed" () => [];
    Camera get_supported_shutter_speed = "getSupportedShutterSpeed" () => [];
    Camera get_available_shutter_speed = "getAvailableShutterSpeed" () => [];

    Camera set_iso_speed_rate = "setIsoSpeedRate" (iso: &str) => [iso];
    Camera get_iso_speed_rate = "getIsoSpeedRate" () => [];
    Camera get_supported_iso_speed_rate = "getSupportedIsoSpeedRate" () => [];
    Camera get_available_iso_speed_rate = "getAvailableIsoSpeedRate" () => [];

    /// White balance `mode`; `temperature` is only read by the camera when
    /// `temperature_enabled` is set
    Camera set_white_balance = "setWhiteBalance" (mode: &str, temperature_enabled: bool, temperature: u32) => [mode, temperature_enabled, temperature];
    Camera get_white_balance = "getWhiteBalance" () => [];
    Camera get_supported_white_balance = "getSupportedWhiteBalance" () => [];
    Camera get_available_white_balance = "getAvailableWhiteBalance" () => [];

    Camera set_program_shift = "setProgramShift" (shift: i32) => [shift];
    Camera get_supported_program_shift = "getSupportedProgramShift" () => [];

    Camera set_flash_mode = "setFlashMode" (mode: &str) => [mode];
    Camera get_flash_mode = "getFlashMode" () => [];
    Camera get_supported_flash_mode = "getSupportedFlashMode" () => [];
    Camera get_available_flash_mode = "getAvailableFlashMode" () => [];

    /// Still image `aspect` (e.g. `4:3`) and `size` (e.g. `20M`)
    Camera set_still_size = "setStillSize" (aspect: &str, size: &str) => [aspect, size];
    Camera get_still_size = "getStillSize" () => [];
    Camera get_supported_still_size = "getSupportedStillSize" () => [];
    Camera get_available_still_size = "getAvailableStillSize" () => [];
    Camera set_still_quality = "setStillQuality" (quality: &str) => [json!({ "stillQuality": quality })];
    Camera get_still_quality = "getStillQuality" () => [];
    Camera get_supported_still_quality = "getSupportedStillQuality" () => [];
    Camera get_available_still_quality = "getAvailableStillQuality" () => [];

    Camera set_postview_image_size = "setPostviewImageSize" (size: &str) => [size];
    Camera get_postview_image_size = "getPostviewImageSize" () => [];
    Camera get_supported_postview_image_size = "getSupportedPostviewImageSize" () => [];
    Camera get_available_postview_image_size = "getAvailablePostviewImageSize" () => [];

    Camera set_movie_file_format = "setMovieFileFormat" (format: &str) => [json!({ "movieFileFormat": format })];
    Camera get_movie_file_format = "getMovieFileFormat" () => [];
    Camera get_supported_movie_file_format = "getSupportedMovieFileFormat" () => [];
    Camera get_available_movie_file_format = "getAvailableMovieFileFormat" () => [];
    Camera set_movie_quality = "setMovieQuality" (quality: &str) => [quality];
    Camera get_movie_quality = "getMovieQuality" () => [];
    Camera get_supported_movie_quality = "getSupportedMovieQuality" () => [];
    Camera get_available_movie_quality = "getAvailableMovieQuality" () => [];

    Camera set_steady_mode = "setSteadyMode" (mode: &str) => [mode];
    Camera get_steady_mode = "getSteadyMode" () => [];
    Camera get_supported_steady_mode = "getSupportedSteadyMode" () => [];
    Camera get_available_steady_mode = "getAvailableSteadyMode" () => [];
}
