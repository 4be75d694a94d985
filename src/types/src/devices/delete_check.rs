use indexmap::IndexMap;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use tracing::warn;

/// One object that references the device, as listed by the API.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct DeleteCheckItem {
    #[serde(rename = "TypeDesc")]
    pub type_desc: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "ObID")]
    pub ob_id: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct DependentObjects {
    #[serde(rename = "Description")]
    pub description: String,
    pub items: Vec<String>,
}

/// Objects blocking the deletion of device `id`, grouped by type in the order
/// the API lists them.
///
/// Serializes flat: `{"ID": id, "<TypeDesc>": {"Description": .., "items": [..]}}`.
#[derive(Debug, PartialEq, Clone)]
pub struct DeleteCheck {
    pub id: String,
    pub objects: IndexMap<String, DependentObjects>,
}

impl DeleteCheck {
    pub fn new(id: impl Into<String>, items: &[DeleteCheckItem]) -> Self {
        let id = id.into();
        let mut objects = IndexMap::new();

        for item in items {
            if item.type_desc == "ID" {
                warn!(
                    "device {} delete check: type desc \"ID\" clashes with the id key, object {} dropped",
                    id, item.ob_id
                );
                continue;
            }
            objects
                .entry(item.type_desc.clone())
                .or_insert_with(DependentObjects::default);
        }

        for item in items {
            if let Some(dependent) = objects.get_mut(&item.type_desc) {
                dependent.description = item.action.clone();
                dependent.items.push(item.ob_id.clone());
            }
        }

        Self { id, objects }
    }

    /// Nothing references the device.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, type_desc: &str) -> Option<&DependentObjects> {
        self.objects.get(type_desc)
    }
}

impl Serialize for DeleteCheck {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.objects.len() + 1))?;
        map.serialize_entry("ID", &self.id)?;
        for (type_desc, dependent) in &self.objects {
            map.serialize_entry(type_desc, dependent)?;
        }
        map.end()
    }
}
