use serde::{Deserialize, Serialize};

/// Icon class for a forecast condition code.
///
/// Codes follow the WMO interpretation used by Open-Meteo
/// (<https://open-meteo.com/en/docs#weathervariables>).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconId {
    Sunny,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Storm,
    /// Code outside the documented set; presentation shows no icon.
    Unknown,
}

/// Every condition code the catalog knows about.
pub const KNOWN_CODES: &[i32] = &[
    0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82, 85,
    86, 95, 96, 99,
];

/// Map a condition code to its icon class. Never fails.
pub fn icon_for(code: i32) -> IconId {
    match code {
        0 | 1 => IconId::Sunny,
        2 => IconId::PartlyCloudy,
        3 => IconId::Overcast,
        45 | 48 => IconId::Fog,
        51 | 53 | 55 | 56 | 57 => IconId::Drizzle, // incl. freezing drizzle
        61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => IconId::Rain,
        71 | 73 | 75 | 77 | 85 | 86 => IconId::Snow,
        95 | 96 | 99 => IconId::Storm,
        _ => IconId::Unknown,
    }
}

impl IconId {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconId::Sunny => "sunny",
            IconId::PartlyCloudy => "partly-cloudy",
            IconId::Overcast => "overcast",
            IconId::Fog => "fog",
            IconId::Drizzle => "drizzle",
            IconId::Rain => "rain",
            IconId::Snow => "snow",
            IconId::Storm => "storm",
            IconId::Unknown => "unknown",
        }
    }

    /// Asset file for the icon, `None` for [`IconId::Unknown`].
    pub fn asset(&self) -> Option<&'static str> {
        match self {
            IconId::Sunny => Some("icon-sunny.webp"),
            IconId::PartlyCloudy => Some("icon-partly-cloudy.webp"),
            IconId::Overcast => Some("icon-overcast.webp"),
            IconId::Fog => Some("icon-fog.webp"),
            IconId::Drizzle => Some("icon-drizzle.webp"),
            IconId::Rain => Some("icon-rain.webp"),
            IconId::Snow => Some("icon-snow.webp"),
            IconId::Storm => Some("icon-storm.webp"),
            IconId::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, IconId::Unknown)
    }
}

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_has_an_icon() {
        for code in KNOWN_CODES {
            let icon = icon_for(*code);
            assert!(icon.is_known(), "code {code} should map to an icon");
            assert!(!icon.as_str().is_empty());
            assert!(icon.asset().is_some());
        }
    }

    #[test]
    fn unsupported_codes_map_to_unknown() {
        assert_eq!(icon_for(2000), IconId::Unknown);
        assert_eq!(icon_for(-1), IconId::Unknown);
        assert_eq!(icon_for(4), IconId::Unknown);
        assert_eq!(IconId::Unknown.asset(), None);
    }

    #[test]
    fn categories_collapse_codes() {
        assert_eq!(icon_for(1), IconId::Sunny);
        assert_eq!(icon_for(2), IconId::PartlyCloudy);
        assert_eq!(icon_for(3), IconId::Overcast);
        assert_eq!(icon_for(48), IconId::Fog);
        assert_eq!(icon_for(57), IconId::Drizzle);
        assert_eq!(icon_for(66), IconId::Rain);
        assert_eq!(icon_for(82), IconId::Rain);
        assert_eq!(icon_for(77), IconId::Snow);
        assert_eq!(icon_for(86), IconId::Snow);
        assert_eq!(icon_for(99), IconId::Storm);
    }

    #[test]
    fn serializes_as_slug() {
        let json = serde_json::to_string(&IconId::PartlyCloudy).unwrap();
        assert_eq!(json, "\"partly-cloudy\"");
    }
}
