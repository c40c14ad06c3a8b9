use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Consul {
    pub address: String,
    pub token: Option<String>,
    pub datacenter: Option<String>,
    pub namespace: Option<String>,
    pub timeout_millis: Option<u64>,
}

impl Consul {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: None,
            datacenter: None,
            namespace: None,
            timeout_millis: None,
        }
    }
}
