pub mod delete_check;
pub mod snmp_device;

pub use delete_check::{DeleteCheck, DeleteCheckItem, DependentObjects};
pub use snmp_device::{normalize, DeviceForm, NormalizeMode, SnmpDeviceCfg};
