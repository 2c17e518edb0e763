//! GetDevices operation

use http_client::Method;
use serde::Deserialize;
use tracing::warn;

use crate::config::BufferSizes;
use crate::model::{truncate_devices, Device, DeviceList};
use crate::operation::{PathBuilder, SpotifyOperation, ValidationError};
use crate::operations::{DEVICES_ENDPOINT, OK};
use crate::Result;

/// List the devices available to the account
pub struct GetDevicesOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDevicesRequest {
    /// Devices past this count are dropped
    pub max_devices: usize,
}

/// A device object as the Web API sends it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DeviceBody {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    device_type: Option<String>,
    is_active: Option<bool>,
    is_restricted: Option<bool>,
    is_private_session: Option<bool>,
    volume_percent: Option<u32>,
}

impl From<DeviceBody> for Device {
    fn from(body: DeviceBody) -> Self {
        Device {
            id: body.id.unwrap_or_default(),
            name: body.name.unwrap_or_default(),
            device_type: body.device_type.unwrap_or_default(),
            is_active: body.is_active.unwrap_or_default(),
            is_restricted: body.is_restricted.unwrap_or_default(),
            is_private_session: body.is_private_session.unwrap_or_default(),
            volume_percent: body.volume_percent.unwrap_or_default().min(100) as u8,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DevicesBody {
    devices: Option<Vec<DeviceBody>>,
}

impl SpotifyOperation for GetDevicesOperation {
    type Request = GetDevicesRequest;
    type Response = DeviceList;

    const METHOD: Method = Method::Get;
    const SUCCESS_STATUS: u16 = OK;
    const NAME: &'static str = "devices";

    fn path(_request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(DEVICES_ENDPOINT).finish()
    }

    fn body_limit(sizes: &BufferSizes) -> Option<usize> {
        Some(sizes.devices)
    }

    fn parse_response(request: &Self::Request, body: &[u8]) -> Result<DeviceList> {
        let parsed: DevicesBody = serde_json::from_slice(body)?;
        let all = parsed.devices.unwrap_or_default();

        let (kept, discarded) = truncate_devices(all, request.max_devices);
        if discarded > 0 {
            warn!(
                "Too many devices: {} > {} (ignoring some)",
                kept.len() + discarded,
                request.max_devices
            );
        }

        Ok(DeviceList {
            devices: kept.into_iter().map(Device::from).collect(),
            discarded,
            error: false,
        })
    }
}
