//! Geolocation lookup by IP.
//!
//! Best-effort: any transport or parse failure degrades to `None` so a dead
//! geo provider can never block chat posts.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Geolocation fields attached to chat messages. All optional; the provider
/// returns whatever it knows about the address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Look up an IP against a freegeoip-style JSON endpoint (`{base_url}/{ip}`).
pub async fn by_ip(base_url: &str, ip: &str) -> Option<GeoInfo> {
    let url = format!("{}/{ip}", base_url.trim_end_matches('/'));

    let resp = match reqwest::get(&url).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, ip, "geo lookup request failed");
            return None;
        }
    };

    if !resp.status().is_success() {
        warn!(status = %resp.status(), ip, "geo lookup returned error status");
        return None;
    }

    match resp.json::<GeoInfo>().await {
        Ok(geo) => Some(geo),
        Err(e) => {
            warn!(error = %e, ip, "geo response parse failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_info_deserializes_partial_payloads() {
        let geo: GeoInfo =
            serde_json::from_str(r#"{"country_name": "France", "city": "Paris", "ip": "1.2.3.4"}"#).unwrap();
        assert_eq!(geo.country_name.as_deref(), Some("France"));
        assert_eq!(geo.city.as_deref(), Some("Paris"));
        assert!(geo.time_zone.is_none());
    }

    #[test]
    fn geo_info_serialization_skips_absent_fields() {
        let geo = GeoInfo { time_zone: Some("Europe/Paris".into()), ..GeoInfo::default() };
        let json = serde_json::to_string(&geo).unwrap();
        assert_eq!(json, r#"{"time_zone":"Europe/Paris"}"#);
    }
}
