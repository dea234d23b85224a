use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum AlarmMuteSource {
    Initialization = 0,
    UserSoftware = 1,
    UserHardware = 2,
    Timeout = 3,
    McuBackendLoss = 4,
    BackendMcuLoss = 5,
    BackendFrontendLoss = 6,
    FrontendBackendLoss = 7,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlarmMute {
    #[prost(bool, optional, tag = "1")]
    pub active: Option<bool>,
    /// Advances on the controller after every local action or serviced request.
    #[prost(uint32, optional, tag = "2")]
    pub seq_num: Option<u32>,
    #[prost(enumeration = "AlarmMuteSource", optional, tag = "3")]
    pub source: Option<i32>,
    /// ms
    #[prost(uint64, optional, tag = "4")]
    pub remaining: Option<u64>,
}

/// Only serviced when `seq_num` is one greater than the controller's [`AlarmMute::seq_num`].
#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlarmMuteRequest {
    #[prost(bool, optional, tag = "1")]
    pub active: Option<bool>,
    #[prost(uint32, optional, tag = "2")]
    pub seq_num: Option<u32>,
    #[prost(enumeration = "AlarmMuteSource", optional, tag = "3")]
    pub source: Option<i32>,
}
