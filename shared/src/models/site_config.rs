//! Site configuration
//!
//! Single-row table (id 1) holding storefront contact and branding details.

use serde::{Deserialize, Serialize};

/// Row id of the only configuration record
pub const SITE_CONFIG_ID: i64 = 1;

/// Social network handles, empty string when unused
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub pinterest: String,
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub store_name: String,
    pub store_description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    /// Free text, one line per schedule entry
    pub business_hours: String,
    #[serde(default)]
    pub social_media: SocialMedia,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            store_name: "Ubara".to_string(),
            store_description: "Cerámica Artesanal".to_string(),
            contact_email: "info@ubara.com".to_string(),
            contact_phone: "+56 9 1234 5678".to_string(),
            address: "Av. Italia 1234, Providencia, Santiago, Chile".to_string(),
            business_hours: "Lunes a Viernes: 10:00 - 19:00\nSábado: 11:00 - 16:00".to_string(),
            social_media: SocialMedia {
                instagram: "ubara_ceramica".to_string(),
                facebook: "ubaraceramica".to_string(),
                twitter: String::new(),
                pinterest: String::new(),
            },
        }
    }
}

impl SiteConfig {
    /// Apply a partial update in place
    pub fn apply(&mut self, update: SiteConfigUpdate) {
        if let Some(v) = update.store_name {
            self.store_name = v;
        }
        if let Some(v) = update.store_description {
            self.store_description = v;
        }
        if let Some(v) = update.contact_email {
            self.contact_email = v;
        }
        if let Some(v) = update.contact_phone {
            self.contact_phone = v;
        }
        if let Some(v) = update.address {
            self.address = v;
        }
        if let Some(v) = update.business_hours {
            self.business_hours = v;
        }
        if let Some(v) = update.social_media {
            self.social_media = v;
        }
    }
}

/// Partial site configuration update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_update() {
        let mut config = SiteConfig::default();
        config.apply(SiteConfigUpdate {
            contact_phone: Some("+56 9 8765 4321".into()),
            ..Default::default()
        });
        assert_eq!(config.contact_phone, "+56 9 8765 4321");
        assert_eq!(config.store_name, "Ubara");
    }
}
