//! Android platform glue using android-activity
//!
//! This wires the safe-area adapter to a live activity: window chrome
//! configuration over JNI, the root content view as the padding sink, inset
//! snapshot queries, and the NativeActivity event loop that drives dispatch.
//!
//! Every JNI step here is best-effort. Window creation must never be aborted
//! by a chrome failure, so errors are logged, any pending Java exception is
//! cleared, and the remaining steps still run.

#![cfg(target_os = "android")]

use std::ffi::CStr;
use std::os::raw::c_char;

use android_activity::{AndroidApp, MainEvent, PollEvent};
use jni::objects::{JObject, JValue};
use jni::{JNIEnv, JavaVM};
use log::{info, warn};

use crate::adapter::{
    apply_safe_area, clear_safe_area_handler, dispatch_insets_changed, last_safe_area,
    register_safe_area_handler, InsetSink,
};
use crate::config::{chrome_config, set_chrome_config, ChromeConfig};
use crate::insets::{Insets, InsetsSnapshot};

/// Attach the current thread to the app's JVM and run `f` with the JNI env
/// and the activity object.
///
/// android-activity owns the activity reference; it is borrowed for the
/// duration of the call and never deleted here.
fn with_activity_env<F>(app: &AndroidApp, f: F)
where
    F: FnOnce(&mut JNIEnv, &JObject),
{
    let vm_ptr = app.vm_as_ptr();
    let activity_ptr = app.activity_as_ptr();
    if vm_ptr.is_null() || activity_ptr.is_null() {
        warn!("JavaVM or activity not available");
        return;
    }

    let vm = match unsafe { JavaVM::from_raw(vm_ptr as *mut _) } {
        Ok(vm) => vm,
        Err(e) => {
            warn!("failed to wrap JavaVM: {:?}", e);
            return;
        }
    };

    let mut env = match vm.attach_current_thread() {
        Ok(env) => env,
        Err(e) => {
            warn!("failed to attach thread to JVM: {:?}", e);
            return;
        }
    };

    let activity = unsafe { JObject::from_raw(activity_ptr as *mut _) };
    f(&mut env, &activity);
}

/// Configure the window for edge-to-edge: the system stops insetting the
/// decor, the bars go transparent, and the cutout mode from the config is
/// written into the window attributes. Called early in window
/// initialization, before insets are first applied.
fn enable_edge_to_edge(env: &mut JNIEnv, activity: &JObject, config: ChromeConfig) {
    // Get the Window from the Activity
    let window = match env.call_method(activity, "getWindow", "()Landroid/view/Window;", &[]) {
        Ok(w) => match w.l() {
            Ok(obj) if !obj.is_null() => obj,
            _ => {
                info!("enable_edge_to_edge: no Window object");
                return;
            }
        },
        Err(e) => {
            info!("enable_edge_to_edge: getWindow failed: {:?}", e);
            let _ = env.exception_clear();
            return;
        }
    };

    // setDecorFitsSystemWindows(false), API 30+. Insets stop being consumed
    // by the decor and arrive at the content view instead.
    let result = env.call_method(&window, "setDecorFitsSystemWindows", "(Z)V", &[JValue::Bool(0)]);
    if result.is_err() || env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
        info!("enable_edge_to_edge: setDecorFitsSystemWindows not available (pre-API 30)");

        // Fallback for older Android: system UI flags on the decor view
        // SYSTEM_UI_FLAG_LAYOUT_STABLE | SYSTEM_UI_FLAG_LAYOUT_FULLSCREEN | SYSTEM_UI_FLAG_LAYOUT_HIDE_NAVIGATION
        let flags: i32 = 0x00000100 | 0x00000400 | 0x00000200;
        if let Ok(decor_view_result) =
            env.call_method(&window, "getDecorView", "()Landroid/view/View;", &[])
        {
            if let Ok(decor_view) = decor_view_result.l() {
                let _ = env.call_method(
                    &decor_view,
                    "setSystemUiVisibility",
                    "(I)V",
                    &[JValue::Int(flags)],
                );
                let _ = env.exception_clear();
            }
        }
    }

    // Transparent status and navigation bars (Color.TRANSPARENT = 0)
    if config.transparent_bars {
        let transparent: i32 = 0;
        let _ = env.call_method(&window, "setStatusBarColor", "(I)V", &[JValue::Int(transparent)]);
        let _ = env.exception_clear();
        let _ = env.call_method(
            &window,
            "setNavigationBarColor",
            "(I)V",
            &[JValue::Int(transparent)],
        );
        let _ = env.exception_clear();
    }

    // Cutout mode goes into the window attributes (API 28+). The constant is
    // resolved by name; where the platform predates cutouts the lookup fails
    // and the step is skipped.
    let mode = env
        .get_static_field(
            "android/view/WindowManager$LayoutParams",
            config.cutout_mode.constant_name(),
            "I",
        )
        .and_then(|v| v.i());
    match mode {
        Ok(mode) => {
            if let Ok(attrs_result) = env.call_method(
                &window,
                "getAttributes",
                "()Landroid/view/WindowManager$LayoutParams;",
                &[],
            ) {
                if let Ok(attrs) = attrs_result.l() {
                    let field_result =
                        env.set_field(&attrs, "layoutInDisplayCutoutMode", "I", JValue::Int(mode));
                    if field_result.is_err() || env.exception_check().unwrap_or(false) {
                        let _ = env.exception_clear();
                        info!("enable_edge_to_edge: layoutInDisplayCutoutMode field not available (pre-API 28)");
                    } else {
                        let _ = env.call_method(
                            &window,
                            "setAttributes",
                            "(Landroid/view/WindowManager$LayoutParams;)V",
                            &[JValue::Object(&attrs)],
                        );
                        let _ = env.exception_clear();
                        info!(
                            "enable_edge_to_edge: set layoutInDisplayCutoutMode={}",
                            config.cutout_mode.constant_name()
                        );
                    }
                }
            }
        }
        Err(_) => {
            let _ = env.exception_clear();
            info!(
                "enable_edge_to_edge: {} not available (pre-API 28)",
                config.cutout_mode.constant_name()
            );
        }
    }

    info!("enable_edge_to_edge: configuration complete");
}

/// Calls a no-arg int method, clearing any raised exception. None on failure.
fn int_method(env: &mut JNIEnv, obj: &JObject, method: &str) -> Option<i32> {
    let result = env.call_method(obj, method, "()I", &[]).and_then(|v| v.i());
    if result.is_err() || env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
        return None;
    }
    result.ok()
}

/// Calls a no-arg static int method, clearing any raised exception.
fn static_int_method(env: &mut JNIEnv, class: &str, method: &str) -> Option<i32> {
    let result = env
        .call_static_method(class, method, "()I", &[])
        .and_then(|v| v.i());
    if result.is_err() || env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
        return None;
    }
    result.ok()
}

/// Reads an int instance field, clearing any raised exception.
fn int_field(env: &mut JNIEnv, obj: &JObject, field: &str) -> Option<i32> {
    let result = env.get_field(obj, field, "I").and_then(|v| v.i());
    if result.is_err() || env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
        return None;
    }
    result.ok()
}

/// Resolves the activity's root content view, `findViewById(android.R.id.content)`.
fn find_content_view<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject,
) -> Option<JObject<'local>> {
    let id = match env.get_static_field("android/R$id", "content", "I").and_then(|v| v.i()) {
        Ok(id) => id,
        Err(e) => {
            let _ = env.exception_clear();
            warn!("android.R$id.content lookup failed: {:?}", e);
            return None;
        }
    };

    let view = match env.call_method(
        activity,
        "findViewById",
        "(I)Landroid/view/View;",
        &[JValue::Int(id)],
    ) {
        Ok(v) => match v.l() {
            Ok(obj) => obj,
            Err(_) => return None,
        },
        Err(e) => {
            let _ = env.exception_clear();
            warn!("findViewById(android.R.id.content) failed: {:?}", e);
            return None;
        }
    };

    if view.is_null() {
        return None;
    }
    Some(view)
}

/// The activity's root content view as a padding sink.
///
/// Re-attaches to the JVM and re-resolves the view on every call, the same
/// per-call discipline as the rest of this module; the view is only valid
/// between InitWindow and TerminateWindow, so nothing is cached.
pub struct ContentView {
    app: AndroidApp,
}

impl ContentView {
    pub fn new(app: AndroidApp) -> Self {
        ContentView { app }
    }
}

impl InsetSink for ContentView {
    fn apply_padding(&mut self, padding: Insets) {
        with_activity_env(&self.app, |env, activity| {
            let view = match find_content_view(env, activity) {
                Some(view) => view,
                None => {
                    warn!("content view not available; padding not applied");
                    return;
                }
            };

            let result = env.call_method(
                &view,
                "setPadding",
                "(IIII)V",
                &[
                    JValue::Int(padding.left),
                    JValue::Int(padding.top),
                    JValue::Int(padding.right),
                    JValue::Int(padding.bottom),
                ],
            );
            if result.is_err() || env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
                warn!("View.setPadding failed");
            }
        });
    }
}

/// Reads one android.graphics.Insets quad out of a WindowInsets by type mask.
fn read_insets_quad(env: &mut JNIEnv, insets: &JObject, type_mask: i32) -> Option<Insets> {
    let quad = match env.call_method(
        insets,
        "getInsets",
        "(I)Landroid/graphics/Insets;",
        &[JValue::Int(type_mask)],
    ) {
        Ok(v) => match v.l() {
            Ok(obj) if !obj.is_null() => obj,
            _ => return None,
        },
        Err(_) => {
            let _ = env.exception_clear();
            return None;
        }
    };

    Some(Insets::new(
        int_field(env, &quad, "left")?,
        int_field(env, &quad, "top")?,
        int_field(env, &quad, "right")?,
        int_field(env, &quad, "bottom")?,
    ))
}

/// API 30+ path: WindowInsets.getInsets(type) per category.
fn read_insets_by_type(env: &mut JNIEnv, insets: &JObject) -> Option<InsetsSnapshot> {
    let bars_mask = match static_int_method(env, "android/view/WindowInsets$Type", "systemBars") {
        Some(mask) => mask,
        None => {
            info!("WindowInsets.Type not available (pre-API 30)");
            return None;
        }
    };
    let cutout_mask = static_int_method(env, "android/view/WindowInsets$Type", "displayCutout")?;

    let system_bars = read_insets_quad(env, insets, bars_mask)?;
    let display_cutout = read_insets_quad(env, insets, cutout_mask)?;
    Some(InsetsSnapshot::new(system_bars, display_cutout))
}

/// Pre-API-30 path: system bars from the per-edge getters, the cutout from
/// DisplayCutout's safe insets. A null cutout means a display without one.
fn read_insets_compat(env: &mut JNIEnv, insets: &JObject) -> Option<InsetsSnapshot> {
    let system_bars = Insets::new(
        int_method(env, insets, "getSystemWindowInsetLeft")?,
        int_method(env, insets, "getSystemWindowInsetTop")?,
        int_method(env, insets, "getSystemWindowInsetRight")?,
        int_method(env, insets, "getSystemWindowInsetBottom")?,
    );

    let display_cutout = match env.call_method(
        insets,
        "getDisplayCutout",
        "()Landroid/view/DisplayCutout;",
        &[],
    ) {
        Ok(v) => match v.l() {
            Ok(cutout) if !cutout.is_null() => Insets::new(
                int_method(env, &cutout, "getSafeInsetLeft")?,
                int_method(env, &cutout, "getSafeInsetTop")?,
                int_method(env, &cutout, "getSafeInsetRight")?,
                int_method(env, &cutout, "getSafeInsetBottom")?,
            ),
            _ => Insets::ZERO,
        },
        Err(_) => {
            let _ = env.exception_clear();
            Insets::ZERO
        }
    };

    Some(InsetsSnapshot::new(system_bars, display_cutout))
}

/// Reads the window's current insets, split by category. None when the view
/// hierarchy is not attached yet or the query fails; callers treat that as
/// the all-zero snapshot.
fn query_insets_snapshot(env: &mut JNIEnv, activity: &JObject) -> Option<InsetsSnapshot> {
    let view = find_content_view(env, activity)?;

    let insets = match env.call_method(
        &view,
        "getRootWindowInsets",
        "()Landroid/view/WindowInsets;",
        &[],
    ) {
        Ok(v) => match v.l() {
            Ok(obj) if !obj.is_null() => obj,
            _ => return None,
        },
        Err(e) => {
            let _ = env.exception_clear();
            warn!("getRootWindowInsets failed: {:?}", e);
            return None;
        }
    };

    if let Some(snapshot) = read_insets_by_type(env, &insets) {
        return Some(snapshot);
    }
    read_insets_compat(env, &insets)
}

/// The window's inset state right now. Public so host code driving its own
/// loop can poll between events.
pub fn current_insets_snapshot(app: &AndroidApp) -> Option<InsetsSnapshot> {
    let mut snapshot = None;
    with_activity_env(app, |env, activity| {
        snapshot = query_insets_snapshot(env, activity);
    });
    snapshot
}

/// Queries the current snapshot (zero when unavailable) and dispatches it to
/// the registered handler.
fn refresh_insets(app: &AndroidApp) {
    let snapshot = current_insets_snapshot(app).unwrap_or_default();
    dispatch_insets_changed(&snapshot);
}

/// Window-creation hook: configure the chrome, register the padding handler
/// against the event source, and run one inset pass so the first frame is
/// already padded.
///
/// Re-runs on every InitWindow; registration replaces the previous handler,
/// so a re-created window still has exactly one.
fn handle_init_window(app: &AndroidApp) {
    info!("window ready, applying edge-to-edge chrome and content padding");

    let config = chrome_config();
    with_activity_env(app, |env, activity| {
        enable_edge_to_edge(env, activity, config);
    });

    let mut sink = ContentView::new(app.clone());
    register_safe_area_handler(Box::new(move |snapshot| apply_safe_area(&mut sink, snapshot)));

    // The framework delivers one initial callback to a freshly installed
    // listener; reproduce that so padding is right before the first draw.
    refresh_insets(app);
}

/// Entry point for android-activity. NativeActivity loads the cdylib and
/// calls this on its own thread; the loop below runs until Destroy.
#[no_mangle]
fn android_main(app: AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag(crate::LOG_TAG),
    );

    info!("android_main: sg_android {} starting", crate::VERSION);
    run_event_loop(app);
}

/// The event loop: window creation installs the adapter, inset-bearing
/// events re-run it, Destroy exits. Input is never read here.
fn run_event_loop(app: AndroidApp) {
    let mut quit = false;

    while !quit {
        app.poll_events(None, |event| {
            if let PollEvent::Main(main_event) = event {
                match main_event {
                    MainEvent::InitWindow { .. } => {
                        info!("InitWindow received");
                        handle_init_window(&app);
                    }
                    MainEvent::TerminateWindow { .. } => {
                        info!("TerminateWindow received");
                        clear_safe_area_handler();
                    }
                    MainEvent::InsetsChanged { .. }
                    | MainEvent::ContentRectChanged { .. }
                    | MainEvent::WindowResized { .. }
                    | MainEvent::ConfigChanged { .. } => {
                        refresh_insets(&app);
                    }
                    MainEvent::Destroy => {
                        info!("Destroy received, exiting");
                        quit = true;
                    }
                    _ => {}
                }
            }
        });
    }

    info!("android_main: event loop exited");
}

/// Copies the last applied safe-area padding into `out` (C ABI). Returns
/// false when `out` is null.
#[no_mangle]
pub extern "C" fn sg_android_get_safe_area(out: *mut Insets) -> bool {
    if out.is_null() {
        return false;
    }
    unsafe {
        *out = last_safe_area();
    }
    true
}

/// Replaces the chrome config from a JSON document (C ABI). Takes effect on
/// the next window creation. Returns false and leaves the config untouched
/// when the pointer is null, the string is not UTF-8, or the document does
/// not parse.
#[no_mangle]
pub extern "C" fn sg_android_set_chrome_config(json: *const c_char) -> bool {
    if json.is_null() {
        return false;
    }

    let text = match unsafe { CStr::from_ptr(json) }.to_str() {
        Ok(text) => text,
        Err(_) => {
            warn!("chrome config is not valid UTF-8");
            return false;
        }
    };

    match ChromeConfig::from_json(text) {
        Ok(config) => {
            set_chrome_config(config);
            true
        }
        Err(e) => {
            warn!("chrome config rejected: {}", e);
            false
        }
    }
}
