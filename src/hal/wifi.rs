//! Wi-Fi bring-up for CSI capture.
//!
//! Starts the radio in unconnected station mode, forces promiscuous
//! reception on a fixed channel (CSI arrives for ESP-NOW traffic without
//! pairing) and registers the capture callback. Any failure here is
//! fatal at startup; there is nothing to capture without the radio.
//!
//! The safe `EspWifi` wrapper covers init/mode/start; the CSI and
//! promiscuous knobs have no safe wrapper yet and go through raw
//! `esp-idf-sys` calls.

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    sys::{self, EspError},
    wifi::{ClientConfiguration, Configuration, EspWifi},
};

#[cfg(target_os = "espidf")]
use crate::capture::csi_rx_trampoline;
#[cfg(target_os = "espidf")]
use crate::config::RING_CAPACITY;
#[cfg(target_os = "espidf")]
use crate::ring::CaptureRing;

/// Bring up the radio and start delivering CSI events into `ring`.
///
/// The returned `EspWifi` owns the driver; dropping it stops capture,
/// so the caller keeps it alive for the process lifetime.
#[cfg(target_os = "espidf")]
pub fn start_capture(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    channel: u8,
    ring: &'static CaptureRing<RING_CAPACITY>,
) -> Result<EspWifi<'static>, EspError> {
    let mut wifi = EspWifi::new(modem, sysloop, None)?;

    // Unconnected STA; wifi storage stays in RAM (no NVS partition given)
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;

    unsafe {
        // Promiscuous mode: capture ESP-NOW frames without pairing
        sys::esp!(sys::esp_wifi_set_promiscuous(true))?;
        sys::esp!(sys::esp_wifi_set_channel(
            channel,
            sys::wifi_second_chan_t_WIFI_SECOND_CHAN_NONE,
        ))?;

        // Default CSI acquisition config, as the reference deployment uses
        let csi_config = sys::wifi_csi_config_t::default();
        sys::esp!(sys::esp_wifi_set_csi_config(&csi_config))?;
        sys::esp!(sys::esp_wifi_set_csi_rx_cb(
            Some(csi_rx_trampoline),
            ring as *const CaptureRing<RING_CAPACITY> as *mut core::ffi::c_void,
        ))?;
        sys::esp!(sys::esp_wifi_set_csi(true))?;
    }

    Ok(wifi)
}
