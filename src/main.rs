//! esp-csi-streamer - Main entry point
//!
//! Startup order matters:
//! 1. NVS flash (the Wi-Fi driver expects it initialized)
//! 2. Console logger (diagnostic channel, UART console)
//! 3. USB-Serial-JTAG driver (data transport)
//! 4. Radio bring-up + CSI callback registration
//! 5. Drain task, then idle

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]
#![cfg_attr(not(target_os = "espidf"), allow(dead_code))]

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;

#[cfg(target_os = "espidf")]
use core::ffi::c_void;

#[cfg(target_os = "espidf")]
use esp_csi_streamer::{
    config::{RING_CAPACITY, RX_CHANNEL, STAGING_CHUNK, USB_RX_RING, USB_TX_RING},
    drain::drain_task,
    hal::{self, usb::UsbSerialJtag},
    ring::CaptureRing,
};

/// The one buffer both pipeline ends share, alive for the process
/// lifetime. The capture callback gets it as its registration context,
/// the drain task by reference.
#[cfg(target_os = "espidf")]
static RING: CaptureRing<RING_CAPACITY> = CaptureRing::new();

/// Drain staging buffer. Owned exclusively by the drain task.
#[cfg(target_os = "espidf")]
static mut STAGING: [u8; STAGING_CHUNK] = [0; STAGING_CHUNK];

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    init_nvs_flash();

    hal::usb::install(USB_TX_RING, USB_RX_RING).expect("usb-serial-jtag driver install failed");

    let peripherals =
        esp_idf_svc::hal::peripherals::Peripherals::take().expect("peripherals already taken");
    let sysloop =
        esp_idf_svc::eventloop::EspSystemEventLoop::take().expect("event loop unavailable");

    let wifi = hal::wifi::start_capture(peripherals.modem, sysloop, RX_CHANNEL, &RING)
        .expect("wifi bring-up failed");
    // The driver must stay alive as long as the callback fires
    core::mem::forget(wifi);

    log::info!("capture active on channel {}", RX_CHANNEL);

    // SAFETY: drain_entry matches TaskFunction_t; name is NUL-terminated
    let created = unsafe {
        esp_idf_sys::xTaskCreatePinnedToCore(
            Some(drain_entry),
            b"drain\0".as_ptr() as *const core::ffi::c_char,
            8192,
            core::ptr::null_mut(),
            20,
            core::ptr::null_mut(),
            0,
        )
    };
    assert!(created == 1, "drain task creation failed");

    // Main thread goes idle; everything happens in the callback and task
    loop {
        unsafe {
            esp_idf_sys::vTaskDelay(1000);
        }
    }
}

/// FreeRTOS entry for the drain task. Never returns.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn drain_entry(_arg: *mut c_void) {
    let mut sink = UsbSerialJtag::new();

    // SAFETY: this task is the only user of STAGING and is spawned once
    let staging = &mut *core::ptr::addr_of_mut!(STAGING);

    drain_task(&RING, staging, &mut sink)
}

/// NVS flash init with the standard erase-and-retry dance.
#[cfg(target_os = "espidf")]
fn init_nvs_flash() {
    unsafe {
        let mut ret = esp_idf_sys::nvs_flash_init();
        if ret == esp_idf_sys::ESP_ERR_NVS_NO_FREE_PAGES as i32
            || ret == esp_idf_sys::ESP_ERR_NVS_NEW_VERSION_FOUND as i32
        {
            esp_idf_sys::nvs_flash_erase();
            ret = esp_idf_sys::nvs_flash_init();
        }
        esp_idf_sys::esp!(ret).expect("nvs flash init failed");
    }
}

/// Host builds only exist so `cargo test` can link; the firmware
/// entry above is the real main.
#[cfg(not(target_os = "espidf"))]
fn main() {}
