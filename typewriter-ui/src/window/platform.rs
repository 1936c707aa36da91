//! Platform-specific window configuration

use tao::window::Window;

/// Configure platform-specific window properties for transparency.
pub fn configure_window(window: &Window, transparent: bool) {
    #[cfg(target_os = "windows")]
    configure_windows(window, transparent);

    #[cfg(not(target_os = "windows"))]
    configure_default(window, transparent);
}

#[cfg(target_os = "windows")]
fn configure_windows(window: &Window, transparent: bool) {
    use tao::platform::windows::WindowExtWindows;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{DwmExtendFrameIntoClientArea, MARGINS};

    if !transparent {
        return;
    }

    unsafe {
        let hwnd = window.hwnd();
        let margins = MARGINS {
            cxLeftWidth: -1,
            cxRightWidth: -1,
            cyTopHeight: -1,
            cyBottomHeight: -1,
        };
        if let Err(e) = DwmExtendFrameIntoClientArea(HWND(hwnd as _), &margins) {
            log::warn!("Failed to extend frame into client area: {:?}", e);
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn configure_default(_window: &Window, transparent: bool) {
    // macOS and Linux compositors honor with_transparent() directly
    if transparent {
        log::debug!("Relying on compositor for window transparency");
    }
}
