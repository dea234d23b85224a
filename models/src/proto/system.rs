use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct McuPowerStatus {
    #[prost(float, optional, tag = "1")]
    pub power_left: Option<f32>,
    #[prost(bool, optional, tag = "2")]
    pub charging: Option<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct BackendConnections {
    #[prost(bool, optional, tag = "1")]
    pub has_mcu: Option<bool>,
    #[prost(bool, optional, tag = "2")]
    pub has_frontend: Option<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct ScreenStatus {
    #[prost(bool, optional, tag = "1")]
    pub lock: Option<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct ScreenStatusRequest {
    #[prost(bool, optional, tag = "1")]
    pub lock: Option<bool>,
}

/// Link keep-alive. Its arrival refreshes link liveness.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct Ping {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(uint32, optional, tag = "2")]
    pub id: Option<u32>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct Announcement {
    #[prost(uint64, optional, tag = "1")]
    pub time: Option<u64>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub announcement: Option<Vec<u8>>,
}
