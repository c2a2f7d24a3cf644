use std::collections::{BTreeMap, HashMap};

/// Read-only access to client-side persisted settings (key -> string).
///
/// Settings are written elsewhere and read fresh on every use, so
/// implementations must not cache parsed values.
pub trait SettingsSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// A source with nothing set; every lookup falls back to defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl SettingsSource for NoSettings {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_are_settings_sources() {
        let mut map = BTreeMap::new();
        map.insert("fogIntensity".to_string(), "40".to_string());
        let source: &dyn SettingsSource = &map;
        assert_eq!(source.get("fogIntensity").as_deref(), Some("40"));
        assert_eq!(source.get("renderDistance"), None);
        assert_eq!(NoSettings.get("fogIntensity"), None);
    }
}
