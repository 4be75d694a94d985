use std::sync::Arc;

use bytes::Bytes;
use common::error::{SnmpCfgError, SnmpCfgResult};
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use types::{
    console::GetMode,
    devices::{normalize, DeleteCheck, DeleteCheckItem, DeviceForm, NormalizeMode, SnmpDeviceCfg},
};

use crate::{ApiPath, ApiResponse, HttpApi};

const DEVICE_PATH: &str = "/api/cfg/snmpdevice";
const CHECK_ON_DEL_PATH: &str = "/api/cfg/snmpdevice/checkondel";
const PING_PATH: &str = "/api/rt/agent/snmpconsole/ping/";
const QUERY_PATH: &str = "/api/rt/agent/snmpconsole/query";

/// Device configuration calls against the collector API. Every call is an
/// independent request, the service holds no state besides the transport.
#[derive(Clone)]
pub struct SnmpDeviceService {
    api: Arc<dyn HttpApi>,
}

impl SnmpDeviceService {
    pub fn new(api: Arc<dyn HttpApi>) -> Self {
        debug!("snmp device service created");
        Self { api }
    }

    pub async fn add_device(&self, dev: &DeviceForm) -> SnmpCfgResult<SnmpDeviceCfg> {
        let path = ApiPath::from(DEVICE_PATH);
        let body = encode(dev, NormalizeMode::Config)?;
        decode(&path, self.api.post(&path, body).await?)
    }

    pub async fn edit_device(&self, dev: &DeviceForm, id: &str) -> SnmpCfgResult<SnmpDeviceCfg> {
        let path = ApiPath::from(DEVICE_PATH).segment(id);
        let body = encode(dev, NormalizeMode::Config)?;
        decode(&path, self.api.put(&path, body).await?)
    }

    /// Lists devices in server order. A non-empty `filter` keeps the devices
    /// whose ID matches it as a case-insensitive regex.
    pub async fn get_devices(&self, filter: Option<&str>) -> SnmpCfgResult<Vec<SnmpDeviceCfg>> {
        let re = match filter {
            Some(filter) if !filter.is_empty() => {
                Some(RegexBuilder::new(filter).case_insensitive(true).build()?)
            }
            _ => None,
        };

        let path = ApiPath::from(DEVICE_PATH);
        let devs: Option<Vec<SnmpDeviceCfg>> = decode(&path, self.api.get(&path).await?)?;
        let devs = devs.unwrap_or_default();

        match re {
            Some(re) => Ok(devs.into_iter().filter(|dev| re.is_match(&dev.id)).collect()),
            None => Ok(devs),
        }
    }

    pub async fn get_device_by_id(&self, id: &str) -> SnmpCfgResult<SnmpDeviceCfg> {
        let path = ApiPath::from(DEVICE_PATH).segment(id);
        decode(&path, self.api.get(&path).await?)
    }

    pub async fn check_on_delete_snmp_device(&self, id: &str) -> SnmpCfgResult<DeleteCheck> {
        let path = ApiPath::from(CHECK_ON_DEL_PATH).segment(id);
        let items: Option<Vec<DeleteCheckItem>> = decode(&path, self.api.get(&path).await?)?;
        Ok(DeleteCheck::new(id, &items.unwrap_or_default()))
    }

    pub async fn delete_device(&self, id: &str) -> SnmpCfgResult<Value> {
        let path = ApiPath::from(DEVICE_PATH).segment(id);
        decode(&path, self.api.delete(&path).await?)
    }

    pub async fn ping_device(&self, dev: &DeviceForm) -> SnmpCfgResult<Value> {
        let path = ApiPath::from(PING_PATH);
        let body = encode(dev, NormalizeMode::Console)?;
        decode(&path, self.api.post(&path, body).await?)
    }

    pub async fn send_query(
        &self,
        dev: &DeviceForm,
        get_mode: &GetMode,
        oid: &str,
    ) -> SnmpCfgResult<Value> {
        let path = ApiPath::from(QUERY_PATH)
            .segment(get_mode.as_str())
            .segment("oid")
            .segment(oid);
        let body = encode(dev, NormalizeMode::Console)?;
        decode(&path, self.api.post(&path, body).await?)
    }
}

fn encode(dev: &DeviceForm, mode: NormalizeMode) -> SnmpCfgResult<Bytes> {
    let normalized = normalize(dev, mode);
    Ok(Bytes::from(serde_json::to_vec(&normalized)?))
}

fn decode<T: DeserializeOwned>(path: &ApiPath, resp: ApiResponse) -> SnmpCfgResult<T> {
    trace!("{} answered {}: {}", path, resp.status, String::from_utf8_lossy(&resp.body));
    if !resp.is_success() {
        let body = String::from_utf8_lossy(&resp.body).into_owned();
        warn!("{} answered {}: {}", path, resp.status, body);
        return Err(SnmpCfgError::Status {
            status: resp.status,
            body,
        });
    }

    Ok(serde_json::from_slice(&resp.body)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mock::MockApi;

    fn service(api: &Arc<MockApi>) -> SnmpDeviceService {
        SnmpDeviceService::new(api.clone())
    }

    fn form(value: Value) -> DeviceForm {
        DeviceForm::try_from(value).unwrap()
    }

    #[tokio::test]
    async fn add_device() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"ID": "sw1", "Port": 161, "Active": true}));

        let dev = form(json!({
            "ID": "sw1",
            "Port": "161",
            "UpdateFltFreq": "60",
            "Active": "true",
            "ExtraTags": "a,b,c",
            "MeasFilters": "",
        }));
        let created = service(&api).add_device(&dev).await.unwrap();
        assert_eq!(created.id, "sw1");
        assert_eq!(created.port, Some(161));

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/cfg/snmpdevice");
        assert_eq!(
            requests[0].body,
            Some(json!({
                "ID": "sw1",
                "Port": 161,
                "UpdateFltFreq": 60,
                "Active": true,
                "ExtraTags": ["a", "b", "c"],
                "MeasFilters": null,
            }))
        );
    }

    #[tokio::test]
    async fn edit_device() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"ID": "sw2"}));

        let dev = form(json!({"ID": "sw2", "Retries": "2", "UpdateFltFreq": 30}));
        let updated = service(&api).edit_device(&dev, "sw1").await.unwrap();
        assert_eq!(updated.id, "sw2");

        let requests = api.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/api/cfg/snmpdevice/sw1");
        assert_eq!(
            requests[0].body,
            Some(json!({"ID": "sw2", "Retries": 2, "UpdateFltFreq": 30}))
        );
    }

    #[tokio::test]
    async fn get_devices_unfiltered() {
        let api = Arc::new(MockApi::new());
        let devs = json!([{"ID": "core-ABC-1"}, {"ID": "edge-2"}, {"ID": "abc-3"}]);
        api.respond(200, devs.clone());
        api.respond(200, devs);

        let svc = service(&api);
        let all = svc.get_devices(None).await.unwrap();
        assert_eq!(
            all.iter().map(|dev| dev.id.as_str()).collect::<Vec<_>>(),
            vec!["core-ABC-1", "edge-2", "abc-3"]
        );

        let all = svc.get_devices(Some("")).await.unwrap();
        assert_eq!(all.len(), 3);

        let requests = api.requests();
        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].path, "/api/cfg/snmpdevice");
    }

    #[tokio::test]
    async fn get_devices_filtered() {
        let api = Arc::new(MockApi::new());
        api.respond(
            200,
            json!([{"ID": "core-ABC-1"}, {"ID": "edge-2"}, {"ID": "abc-3"}]),
        );

        let matched = service(&api).get_devices(Some("abc")).await.unwrap();
        assert_eq!(
            matched.iter().map(|dev| dev.id.as_str()).collect::<Vec<_>>(),
            vec!["core-ABC-1", "abc-3"]
        );
    }

    #[tokio::test]
    async fn get_devices_null_body() {
        let api = Arc::new(MockApi::new());
        api.respond(200, Value::Null);
        assert!(service(&api).get_devices(Some("x")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_devices_bad_filter() {
        let api = Arc::new(MockApi::new());
        let err = service(&api).get_devices(Some("(")).await.unwrap_err();
        assert!(matches!(err, SnmpCfgError::Regex(_)));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn get_device_by_id() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"ID": "sw1", "Host": "10.0.0.1"}));

        let dev = service(&api).get_device_by_id("sw1").await.unwrap();
        assert_eq!(dev.extra["Host"], json!("10.0.0.1"));
        assert_eq!(api.requests()[0].path, "/api/cfg/snmpdevice/sw1");
    }

    #[tokio::test]
    async fn not_found() {
        let api = Arc::new(MockApi::new());
        api.respond(404, json!("record not found"));

        let err = service(&api).get_device_by_id("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn malformed_body() {
        let api = Arc::new(MockApi::new());
        api.respond_raw(200, "<html>");

        let err = service(&api).delete_device("sw1").await.unwrap_err();
        assert!(matches!(err, SnmpCfgError::JsonErr(_)));
    }

    #[tokio::test]
    async fn check_on_delete() {
        let api = Arc::new(MockApi::new());
        api.respond(
            200,
            json!([
                {"TypeDesc": "Alarm", "Action": "block", "ObID": "1"},
                {"TypeDesc": "Alarm", "Action": "block", "ObID": "2"},
            ]),
        );

        let check = service(&api)
            .check_on_delete_snmp_device("dev1")
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&check).unwrap(),
            json!({"ID": "dev1", "Alarm": {"Description": "block", "items": ["1", "2"]}})
        );

        let requests = api.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/cfg/snmpdevice/checkondel/dev1");
    }

    #[tokio::test]
    async fn delete_device() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!("deleted"));

        let resp = service(&api).delete_device("sw1").await.unwrap();
        assert_eq!(resp, json!("deleted"));

        let requests = api.requests();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, "/api/cfg/snmpdevice/sw1");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn dot_ids_never_reach_the_collection() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!("deleted"));

        let svc = service(&api);
        for id in [".", ".."] {
            let err = svc.delete_device(id).await.unwrap_err();
            assert!(matches!(err, SnmpCfgError::Common(_)));
            assert!(svc.check_on_delete_snmp_device(id).await.is_err());
            assert!(svc
                .edit_device(&form(json!({"ID": id})), id)
                .await
                .is_err());
        }
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn ping_device() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"SysDescr": "Linux sw1"}));

        let dev = form(json!({"ID": "sw1", "Timeout": "20", "UpdateFltFreq": "60", "SnmpDebug": "yes"}));
        let resp = service(&api).ping_device(&dev).await.unwrap();
        assert_eq!(resp["SysDescr"], json!("Linux sw1"));

        let requests = api.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/rt/agent/snmpconsole/ping/");
        assert_eq!(
            requests[0].body,
            Some(json!({"ID": "sw1", "Timeout": 20, "UpdateFltFreq": "60", "SnmpDebug": false}))
        );
    }

    #[tokio::test]
    async fn send_query() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"QueryResult": []}));

        let dev = form(json!({"ID": "sw1", "Port": 161}));
        service(&api)
            .send_query(&dev, &GetMode::Walk, ".1.3.6.1.2.1.1")
            .await
            .unwrap();

        let requests = api.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].path,
            "/api/rt/agent/snmpconsole/query/walk/oid/.1.3.6.1.2.1.1"
        );
    }

    #[tokio::test]
    async fn concurrent_calls() {
        let api = Arc::new(MockApi::new());
        api.respond(200, json!({"ID": "sw1"}));
        api.respond(200, json!({"ID": "sw1"}));

        let svc = service(&api);
        let (a, b) = tokio::join!(svc.get_device_by_id("sw1"), svc.get_device_by_id("sw1"));
        assert_eq!(a.unwrap().id, "sw1");
        assert_eq!(b.unwrap().id, "sw1");
        assert_eq!(api.requests().len(), 2);
    }
}
