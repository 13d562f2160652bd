//! Azure cloud environments.
//!
//! Each cloud is a separate deployment of the Resource Manager control plane
//! with its own endpoint and its own set of valid locations.

use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// Name of the public Azure cloud.
pub const PUBLIC_CLOUD_NAME: &str = "AzurePublicCloud";

/// A known Azure cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CloudEnvironment {
    /// The global public cloud.
    #[default]
    Public,
    /// Azure operated by 21Vianet.
    China,
    /// Azure for US Government.
    UsGovernment,
    /// The (retired) German sovereign cloud.
    German,
}

impl CloudEnvironment {
    /// All known environments.
    pub const ALL: [CloudEnvironment; 4] = [
        CloudEnvironment::Public,
        CloudEnvironment::China,
        CloudEnvironment::UsGovernment,
        CloudEnvironment::German,
    ];

    /// The canonical environment name, e.g. `AzurePublicCloud`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Public => PUBLIC_CLOUD_NAME,
            Self::China => "AzureChinaCloud",
            Self::UsGovernment => "AzureUSGovernmentCloud",
            Self::German => "AzureGermanCloud",
        }
    }

    /// The Resource Manager endpoint for this cloud.
    pub fn resource_manager_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://management.azure.com/",
            Self::China => "https://management.chinacloudapi.cn/",
            Self::UsGovernment => "https://management.usgovcloudapi.net/",
            Self::German => "https://management.microsoftazure.de/",
        }
    }

    /// Whether this is the public cloud.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Resolve an environment from a user-supplied name.
    ///
    /// Accepts the canonical name (`AzureChinaCloud`), the uppercase form
    /// (`AZURECHINACLOUD`) and short aliases (`china`). Names that do not
    /// match are retried wrapped as `AZURE<NAME>CLOUD`, so `usgovernment`
    /// and `german` resolve as well.
    pub fn from_name(name: &str) -> Result<Self, LocationError> {
        let trimmed = name.trim();
        if let Some(env) = Self::lookup(trimmed) {
            return Ok(env);
        }

        let wrapped = format!("AZURE{}CLOUD", trimmed);
        Self::lookup(&wrapped).ok_or_else(|| {
            LocationError::UnknownEnvironment(format!(
                "there is no cloud environment matching the name {:?}",
                name
            ))
        })
    }

    fn lookup(name: &str) -> Option<Self> {
        let upper = name.to_uppercase();
        match upper.as_str() {
            "PUBLIC" => return Some(Self::Public),
            "AZURECLOUD" => return Some(Self::Public),
            _ => {},
        }
        Self::ALL
            .into_iter()
            .find(|env| env.name().eq_ignore_ascii_case(&upper))
    }
}

impl std::fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
