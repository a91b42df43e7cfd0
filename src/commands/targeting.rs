use clap::ValueEnum;
use serde_json::Value;

use crate::commands::AppContext;
use crate::error::Result;
use crate::parameters::ParameterMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetingType {
    Interests,
    Keywords,
    Followers,
    Locations,
    Devices,
}

impl TargetingType {
    pub fn endpoint(self) -> &'static str {
        match self {
            TargetingType::Interests => "/targeting_criteria/interests",
            TargetingType::Keywords => "/targeting_criteria/keywords",
            TargetingType::Followers => "/targeting_criteria/user_lookups",
            TargetingType::Locations => "/targeting_criteria/locations",
            TargetingType::Devices => "/targeting_criteria/devices",
        }
    }
}

pub async fn targeting_options(ctx: &AppContext, kind: TargetingType) -> Result<Value> {
    ctx.client.get(kind.endpoint(), ParameterMap::new()).await
}
