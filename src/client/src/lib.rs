pub use api::{ApiPath, ApiResponse, HttpApi};
pub use reqwest_api::ReqwestApi;
pub use snmp_device::SnmpDeviceService;

mod api;
mod reqwest_api;
mod snmp_device;

#[cfg(test)]
mod mock;
