//! Message envelope: the metadata an archive filename is built from.
//!
//! Envelopes are read from TOML, or JSON when the file ends in `.json`:
//!
//! ```toml
//! id = "asf34afasaffas3442"
//! from_party = "testPartyFrom"
//! to_party = "testPartyTo"
//! from_service = "testServiceFrom"
//! to_service = "testServiceTo"
//!
//! [properties."http://sap.com/file"]
//! FileName = "invoice.xml"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::property::{MessageProperties, PropertyLookup};
use crate::template::ResolutionContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub from_party: String,
    #[serde(default)]
    pub to_party: String,
    #[serde(default)]
    pub from_service: String,
    #[serde(default)]
    pub to_service: String,
    /// Dynamic properties, `namespace -> name -> value`.
    #[serde(default)]
    pub properties: MessageProperties,
}

impl Message {
    /// Values for template resolution, borrowing from this message.
    pub fn context(&self) -> ResolutionContext<'_> {
        ResolutionContext {
            message_id: &self.id,
            from_party: &self.from_party,
            to_party: &self.to_party,
            from_service: &self.from_service,
            to_service: &self.to_service,
            properties: &self.properties,
        }
    }

    /// Load an envelope; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read message envelope {}", path.display()))?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let msg: Message = if is_json {
            serde_json::from_str(&data)
                .with_context(|| format!("parse message envelope {}", path.display()))?
        } else {
            toml::from_str(&data)
                .with_context(|| format!("parse message envelope {}", path.display()))?
        };
        Ok(msg)
    }
}

impl PropertyLookup for Message {
    fn property(&self, namespace: &str, name: &str) -> Option<String> {
        self.properties.property(namespace, name)
    }
}
