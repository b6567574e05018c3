//! `IVRControlPanel`: driver and display enumeration, shared resources, IPD.

use crate::api::NativeApi;
use crate::buffer;
use crate::ffi::NativeTable;
use crate::types::NativeHandle;
use crate::{Result, VrError};

/// Borrowed view of a native `IVRControlPanel` instance.
///
/// Every text-producing call is a two-call query: native code is asked for
/// the required size first, then fills a buffer of that size.
#[derive(Debug, Clone, Copy)]
pub struct VrControlPanel<'a> {
    api: &'a NativeApi,
    handle: NativeHandle,
}

impl<'a> VrControlPanel<'a> {
    pub const INTERFACE: &'static str = "IVRControlPanel";

    pub fn new(api: &'a NativeApi, handle: NativeHandle) -> Self {
        Self { api, handle }
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    fn usable(&self) -> Result<&'a NativeTable> {
        if self.handle.is_null() {
            return Err(VrError::NotConfigured {
                interface: Self::INTERFACE,
            });
        }
        Ok(self.api.table())
    }

    pub fn driver_count(&self) -> Result<u32> {
        let pfn = self.usable()?.control_panel_get_driver_count.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    pub fn driver_id(&self, driver_index: u32) -> Result<String> {
        let pfn = self.usable()?.control_panel_get_driver_id.get()?;
        Ok(buffer::query_string(|buf, len| unsafe {
            pfn(self.handle, driver_index, buf, len)
        }))
    }

    pub fn driver_display_count(&self, driver_id: &str) -> Result<u32> {
        let table = self.usable()?;
        let driver_id = buffer::c_string(driver_id)?;
        let pfn = table.control_panel_get_driver_display_count.get()?;
        Ok(unsafe { pfn(self.handle, driver_id.as_ptr()) })
    }

    pub fn driver_display_id(&self, driver_id: &str, display_index: u32) -> Result<String> {
        let table = self.usable()?;
        let driver_id = buffer::c_string(driver_id)?;
        let pfn = table.control_panel_get_driver_display_id.get()?;
        Ok(buffer::query_string(|buf, len| unsafe {
            pfn(self.handle, driver_id.as_ptr(), display_index, buf, len)
        }))
    }

    pub fn driver_display_model_number(&self, driver_id: &str, display_id: &str) -> Result<String> {
        let table = self.usable()?;
        let driver_id = buffer::c_string(driver_id)?;
        let display_id = buffer::c_string(display_id)?;
        let pfn = table.control_panel_get_driver_display_model_number.get()?;
        Ok(buffer::query_string(|buf, len| unsafe {
            pfn(self.handle, driver_id.as_ptr(), display_id.as_ptr(), buf, len)
        }))
    }

    pub fn driver_display_serial_number(
        &self,
        driver_id: &str,
        display_id: &str,
    ) -> Result<String> {
        let table = self.usable()?;
        let driver_id = buffer::c_string(driver_id)?;
        let display_id = buffer::c_string(display_id)?;
        let pfn = table.control_panel_get_driver_display_serial_number.get()?;
        Ok(buffer::query_string(|buf, len| unsafe {
            pfn(self.handle, driver_id.as_ptr(), display_id.as_ptr(), buf, len)
        }))
    }

    /// Raw bytes of a named resource shipped with the runtime.
    pub fn load_shared_resource(&self, resource_name: &str) -> Result<Vec<u8>> {
        let table = self.usable()?;
        let resource_name = buffer::c_string(resource_name)?;
        let pfn = table.control_panel_load_shared_resource.get()?;
        Ok(buffer::query_bytes(|buf, len| unsafe {
            pfn(self.handle, resource_name.as_ptr(), buf, len)
        }))
    }

    /// Interpupillary distance in meters.
    pub fn ipd(&self) -> Result<f32> {
        let pfn = self.usable()?.control_panel_get_ipd.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    pub fn set_ipd(&self, ipd: f32) -> Result<()> {
        let pfn = self.usable()?.control_panel_set_ipd.get()?;
        unsafe { pfn(self.handle, ipd) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_handle, native_calls, record_call};
    use std::ffi::{c_char, CStr};

    unsafe fn write_reply(reply: &[u8], buf: *mut c_char, len: u32) -> u32 {
        if !buf.is_null() && len as usize >= reply.len() {
            std::ptr::copy_nonoverlapping(reply.as_ptr() as *const c_char, buf, reply.len());
        }
        reply.len() as u32
    }

    unsafe extern "C" fn stub_driver_count(_h: NativeHandle) -> u32 {
        record_call();
        2
    }

    unsafe extern "C" fn stub_driver_id(
        _h: NativeHandle,
        index: u32,
        buf: *mut c_char,
        len: u32,
    ) -> u32 {
        record_call();
        match index {
            0 => write_reply(b"lighthouse\0", buf, len),
            1 => write_reply(b"oculus\0", buf, len),
            _ => 0,
        }
    }

    unsafe extern "C" fn stub_display_count(_h: NativeHandle, driver: *const c_char) -> u32 {
        record_call();
        if CStr::from_ptr(driver).to_bytes() == b"lighthouse" {
            1
        } else {
            0
        }
    }

    unsafe extern "C" fn stub_serial_number(
        _h: NativeHandle,
        driver: *const c_char,
        display: *const c_char,
        buf: *mut c_char,
        len: u32,
    ) -> u32 {
        record_call();
        let driver = CStr::from_ptr(driver).to_bytes();
        let display = CStr::from_ptr(display).to_bytes();
        if driver == b"lighthouse" && display == b"display0" {
            write_reply(b"SN-12345\0", buf, len)
        } else {
            0
        }
    }

    unsafe extern "C" fn stub_shared_resource(
        _h: NativeHandle,
        _name: *const c_char,
        buf: *mut c_char,
        len: u32,
    ) -> u32 {
        record_call();
        // Binary payload with an embedded zero byte.
        write_reply(&[0x89, b'P', 0x00, b'G'], buf, len)
    }

    // Reports a larger size on the fill call than on the probe.
    unsafe extern "C" fn stub_shared_resource_grows(
        _h: NativeHandle,
        _name: *const c_char,
        buf: *mut c_char,
        _len: u32,
    ) -> u32 {
        record_call();
        if buf.is_null() {
            4
        } else {
            6
        }
    }

    unsafe extern "C" fn stub_get_ipd(_h: NativeHandle) -> f32 {
        record_call();
        0.064
    }

    fn bound_table() -> NativeTable {
        let mut table = NativeTable::default();
        table.control_panel_get_driver_count.bind(stub_driver_count);
        table.control_panel_get_driver_id.bind(stub_driver_id);
        table.control_panel_get_driver_display_count.bind(stub_display_count);
        table.control_panel_get_driver_display_serial_number.bind(stub_serial_number);
        table.control_panel_load_shared_resource.bind(stub_shared_resource);
        table.control_panel_get_ipd.bind(stub_get_ipd);
        table
    }

    fn assert_not_configured<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(VrError::NotConfigured { interface }) => assert_eq!(interface, "IVRControlPanel"),
            other => panic!("expected NotConfigured, got {:?}", other),
        }
    }

    #[test]
    fn test_null_handle_rejects_every_operation() {
        let api = NativeApi::from_table(bound_table());
        let panel = api.control_panel(NativeHandle::null());

        assert_not_configured(panel.driver_count());
        assert_not_configured(panel.driver_id(0));
        assert_not_configured(panel.driver_display_count("lighthouse"));
        assert_not_configured(panel.driver_display_id("lighthouse", 0));
        assert_not_configured(panel.driver_display_model_number("lighthouse", "display0"));
        assert_not_configured(panel.driver_display_serial_number("lighthouse", "display0"));
        assert_not_configured(panel.load_shared_resource("icons/logo.png"));
        assert_not_configured(panel.ipd());
        assert_not_configured(panel.set_ipd(0.063));
        // Misuse wins over a bad string argument.
        assert_not_configured(panel.driver_display_count("bad\0id"));

        assert_eq!(native_calls(), 0);
    }

    #[test]
    fn test_enumerate_drivers() {
        let api = NativeApi::from_table(bound_table());
        let panel = api.control_panel(fake_handle());

        let count = panel.driver_count().unwrap();
        let ids: Vec<String> = (0..count).map(|i| panel.driver_id(i).unwrap()).collect();
        assert_eq!(ids, vec!["lighthouse", "oculus"]);
        assert_eq!(panel.driver_id(5).unwrap(), "");

        assert_eq!(panel.driver_display_count("lighthouse").unwrap(), 1);
        assert_eq!(panel.driver_display_count("oculus").unwrap(), 0);
    }

    #[test]
    fn test_serial_number_passes_both_ids() {
        let api = NativeApi::from_table(bound_table());
        let panel = api.control_panel(fake_handle());
        assert_eq!(
            panel
                .driver_display_serial_number("lighthouse", "display0")
                .unwrap(),
            "SN-12345"
        );
        assert_eq!(native_calls(), 2);
    }

    #[test]
    fn test_shared_resource_keeps_binary_bytes() {
        let api = NativeApi::from_table(bound_table());
        let bytes = api
            .control_panel(fake_handle())
            .load_shared_resource("icons/logo.png")
            .unwrap();
        assert_eq!(bytes, vec![0x89, b'P', 0x00, b'G']);
    }

    #[test]
    fn test_shared_resource_that_grows_is_empty() {
        let mut table = bound_table();
        table
            .control_panel_load_shared_resource
            .bind(stub_shared_resource_grows);
        let api = NativeApi::from_table(table);
        let bytes = api
            .control_panel(fake_handle())
            .load_shared_resource("icons/logo.png")
            .unwrap();
        assert!(bytes.is_empty());
        assert_eq!(native_calls(), 2);
    }

    #[test]
    fn test_ipd_and_unbound_setter() {
        let api = NativeApi::from_table(bound_table());
        let panel = api.control_panel(fake_handle());
        assert_eq!(panel.ipd().unwrap(), 0.064);
        assert!(matches!(
            panel.set_ipd(0.07),
            Err(VrError::Unbound {
                symbol: "SteamAPI_vr_IVRControlPanel_SetIPD"
            })
        ));
    }
}
