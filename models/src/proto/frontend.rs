use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum Unit {
    Imperial = 0,
    Metric = 1,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum ThemeVariant {
    Dark = 0,
    Light = 1,
}

/// Knob state reported by the panel hardware.
#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct RotaryEncoder {
    #[prost(int32, optional, tag = "1")]
    pub step: Option<i32>,
    #[prost(float, optional, tag = "2")]
    pub last_step_change: Option<f32>,
    #[prost(bool, optional, tag = "3")]
    pub button_pressed: Option<bool>,
    #[prost(float, optional, tag = "4")]
    pub last_button_down: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub last_button_up: Option<f32>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct FrontendDisplaySetting {
    #[prost(enumeration = "ThemeVariant", optional, tag = "1")]
    pub theme: Option<i32>,
    #[prost(enumeration = "Unit", optional, tag = "2")]
    pub unit: Option<i32>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct FrontendDisplaySettingRequest {
    #[prost(enumeration = "ThemeVariant", optional, tag = "1")]
    pub theme: Option<i32>,
    #[prost(enumeration = "Unit", optional, tag = "2")]
    pub unit: Option<i32>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Unix time in seconds.
    #[prost(double, optional, tag = "1")]
    pub date: Option<f64>,
    #[prost(uint32, optional, tag = "2")]
    pub display_brightness: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub seq_num: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct SystemSettingsRequest {
    #[prost(double, optional, tag = "1")]
    pub date: Option<f64>,
    #[prost(uint32, optional, tag = "2")]
    pub display_brightness: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub seq_num: Option<u32>,
}
