use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

/// A tracked device, identified by its IMEI.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Device;

impl HasId for Device {
    type IdType = String;
}
