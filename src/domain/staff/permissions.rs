// Module-level permission grants
// Stored as "module:level" pair strings, exchanged as a module -> level map

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Ordered map of module name to access level
///
/// Keeps entries in insertion order so that encoding to pair strings is
/// deterministic and follows the order the client sent. Inserting a module
/// that is already present replaces its level in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    entries: Vec<(String, String)>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the level granted for `module`
    pub fn insert(&mut self, module: impl Into<String>, level: impl Into<String>) {
        let module = module.into();
        let level = level.into();
        match self.entries.iter_mut().find(|(m, _)| *m == module) {
            Some(entry) => entry.1 = level,
            None => self.entries.push((module, level)),
        }
    }

    pub fn get(&self, module: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| m == module)
            .map(|(_, level)| level.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, l)| (m.as_str(), l.as_str()))
    }
}

impl<M, L> FromIterator<(M, L)> for PermissionMap
where
    M: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (M, L)>>(iter: I) -> Self {
        let mut map = PermissionMap::new();
        for (module, level) in iter {
            map.insert(module, level);
        }
        map
    }
}

impl Serialize for PermissionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (module, level) in &self.entries {
            map.serialize_entry(module, level)?;
        }
        map.end()
    }
}

/// Access level as sent by clients
///
/// Strings are taken as is. Booleans, numbers and null are written out in
/// their JSON form, so `{"inventory": true}` grants `"inventory:true"`.
/// Nested objects and arrays are rejected.
struct Level(String);

struct LevelVisitor;

impl<'de> Visitor<'de> for LevelVisitor {
    type Value = Level;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null access level")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
        Ok(Level(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Level, E> {
        Ok(Level(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Level, E> {
        Ok(Level(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Level, E> {
        Ok(Level(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Level, E> {
        Ok(Level(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Level, E> {
        Ok(Level(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Level, E> {
        Ok(Level("null".to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Level, E> {
        self.visit_unit()
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LevelVisitor)
    }
}

struct PermissionMapVisitor;

impl<'de> Visitor<'de> for PermissionMapVisitor {
    type Value = PermissionMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of module name to access level")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PermissionMap::new();
        while let Some((module, Level(level))) = access.next_entry::<String, Level>()? {
            map.insert(module, level);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for PermissionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PermissionMapVisitor)
    }
}

/// Encodes a permission map as `"module:level"` strings, in map order
///
/// # Example
/// ```
/// use shop_staff_api::domain::staff::permissions::{to_pair_strings, PermissionMap};
///
/// let map: PermissionMap = [("inventory", "write"), ("sales", "read")].into_iter().collect();
/// assert_eq!(to_pair_strings(&map), vec!["inventory:write", "sales:read"]);
/// ```
pub fn to_pair_strings(map: &PermissionMap) -> Vec<String> {
    map.iter()
        .map(|(module, level)| format!("{}:{}", module, level))
        .collect()
}

/// Decodes `"module:level"` strings into a permission map
///
/// Splits on the first ':'. A later entry for the same module overwrites the
/// earlier level. An entry without ':' maps the whole string to an empty level.
pub fn to_map(pairs: &[String]) -> PermissionMap {
    let mut map = PermissionMap::new();
    for pair in pairs {
        match pair.split_once(':') {
            Some((module, level)) => map.insert(module, level),
            None => map.insert(pair.as_str(), ""),
        }
    }
    map
}

/// Permissions as accepted by the update endpoints
///
/// Clients may send the stored representation (a list of pair strings) or
/// the map representation used when creating staff.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum PermissionsInput {
    Pairs(Vec<String>),
    Map(PermissionMap),
}

impl PermissionsInput {
    /// Pair strings are passed through untouched, maps are encoded
    pub fn into_pair_strings(self) -> Vec<String> {
        match self {
            PermissionsInput::Pairs(pairs) => pairs,
            PermissionsInput::Map(map) => to_pair_strings(&map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encodes_in_insertion_order() {
        let map: PermissionMap = [("sales", "read"), ("inventory", "write"), ("reports", "none")]
            .into_iter()
            .collect();

        assert_eq!(
            to_pair_strings(&map),
            pairs(&["sales:read", "inventory:write", "reports:none"])
        );
    }

    #[test]
    fn empty_map_encodes_to_empty_list() {
        assert!(to_pair_strings(&PermissionMap::new()).is_empty());
    }

    #[test]
    fn round_trip_preserves_map() {
        let map: PermissionMap = [("inventory", "write"), ("sales", "read")]
            .into_iter()
            .collect();

        assert_eq!(to_map(&to_pair_strings(&map)), map);
    }

    #[test]
    fn later_duplicate_overwrites_in_place() {
        let map = to_map(&pairs(&["sales:read", "inventory:read", "sales:write"]));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("sales"), Some("write"));
        assert_eq!(
            map.iter().map(|(m, _)| m).collect::<Vec<_>>(),
            vec!["sales", "inventory"]
        );
    }

    #[test]
    fn splits_on_first_colon_only() {
        let map = to_map(&pairs(&["reports:read:archived"]));
        assert_eq!(map.get("reports"), Some("read:archived"));
    }

    #[test]
    fn malformed_entry_maps_to_empty_level() {
        let map = to_map(&pairs(&["dashboard"]));
        assert_eq!(map.get("dashboard"), Some(""));
    }

    #[test]
    fn deserializes_in_document_order() {
        let map: PermissionMap =
            serde_json::from_str(r#"{"sales":"read","inventory":"write","hr":"none"}"#).unwrap();

        assert_eq!(
            to_pair_strings(&map),
            pairs(&["sales:read", "inventory:write", "hr:none"])
        );
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"sales":"read","inventory":"write","hr":"none"}"#
        );
    }

    #[test]
    fn scalar_levels_are_written_out() {
        let map: PermissionMap =
            serde_json::from_str(r#"{"inventory":true,"reports":2,"hr":null}"#).unwrap();

        assert_eq!(
            to_pair_strings(&map),
            pairs(&["inventory:true", "reports:2", "hr:null"])
        );

        let nested: Result<PermissionMap, _> = serde_json::from_str(r#"{"sales":{"level":"read"}}"#);
        assert!(nested.is_err());
    }

    #[test]
    fn input_accepts_both_shapes() {
        let list: PermissionsInput = serde_json::from_str(r#"["sales:read"]"#).unwrap();
        assert_eq!(list.into_pair_strings(), pairs(&["sales:read"]));

        let map: PermissionsInput = serde_json::from_str(r#"{"sales":"write"}"#).unwrap();
        assert_eq!(map.into_pair_strings(), pairs(&["sales:write"]));

        let bad: Result<PermissionsInput, _> = serde_json::from_str("42");
        assert!(bad.is_err());
    }
}
