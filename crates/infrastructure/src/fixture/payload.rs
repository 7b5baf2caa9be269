//! Link document types
//!
//! Wire shape of a link as the server accepts it on `POST v1/link`:
//! inputs are grouped into named configs by the prefix before the first
//! `.` of their key (`linkConfig.jdbcDriver` belongs to `linkConfig`).

#![allow(missing_docs)]

use std::collections::BTreeMap;

use restprobe_domain::Link;
use serde::Serialize;

/// Top-level request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEnvelope {
    pub link: LinkDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDocument {
    pub name: String,
    #[serde(rename = "connector-name")]
    pub connector_name: String,
    pub enabled: bool,
    #[serde(rename = "link-config-values")]
    pub link_config_values: ConfigValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigValues {
    pub configs: Vec<ConfigDocument>,
}

/// One named group of inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDocument {
    pub name: String,
    pub inputs: Vec<InputDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputDocument {
    pub name: String,
    pub value: String,
}

impl From<&Link> for LinkEnvelope {
    fn from(link: &Link) -> Self {
        let mut groups: BTreeMap<&str, Vec<InputDocument>> = BTreeMap::new();
        for (key, value) in &link.inputs {
            let group = key.split_once('.').map_or(key.as_str(), |(prefix, _)| prefix);
            groups.entry(group).or_default().push(InputDocument {
                name: key.clone(),
                value: value.clone(),
            });
        }

        let configs = groups
            .into_iter()
            .map(|(name, inputs)| ConfigDocument {
                name: name.to_string(),
                inputs,
            })
            .collect();

        Self {
            link: LinkDocument {
                name: link.name.clone(),
                connector_name: link.connector_name.clone(),
                enabled: true,
                link_config_values: ConfigValues { configs },
            },
        }
    }
}
