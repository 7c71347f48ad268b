use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Remote cell painted by a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonTarget {
    pub x: i32,
    pub y: i32,
}

/// Glyphs written to `target` while the button is pressed (`on`) or released (`off`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub on: char,
    pub off: char,
    pub target: ButtonTarget,
}

/// Button table keyed by the digit on the button tile.
///
/// Level files may write it as an object (`{"0": {...}}`) or as an array
/// indexed by id; both deserialize to the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawButtons")]
pub struct ButtonTable(pub BTreeMap<u8, ButtonBinding>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawButtons {
    List(Vec<ButtonBinding>),
    Map(BTreeMap<String, ButtonBinding>),
}

impl TryFrom<RawButtons> for ButtonTable {
    type Error = String;

    fn try_from(raw: RawButtons) -> Result<Self, Self::Error> {
        match raw {
            RawButtons::List(list) => Ok(ButtonTable(
                list.into_iter()
                    .enumerate()
                    .map(|(id, binding)| (id as u8, binding))
                    .collect(),
            )),
            RawButtons::Map(map) => map
                .into_iter()
                .map(|(key, binding)| {
                    key.trim()
                        .parse::<u8>()
                        .map(|id| (id, binding))
                        .map_err(|_| format!("button id {key:?} is not a number"))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(ButtonTable),
        }
    }
}

impl ButtonTable {
    pub fn get(&self, id: u8) -> Option<&ButtonBinding> {
        self.0.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u8, &ButtonBinding)> {
        self.0.iter()
    }
}

/// One level record: rows of glyphs plus its button bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub tiles: Vec<String>,
    #[serde(default)]
    pub buttons: ButtonTable,
}

impl LevelData {
    /// Build a level from newline-separated rows
    pub fn from_rows(rows: &str, buttons: ButtonTable) -> Self {
        Self {
            tiles: rows.lines().map(str::to_string).collect(),
            buttons,
        }
    }
}

/// Ordered list of levels, stored as a bare JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPack(pub Vec<LevelData>);

impl LevelPack {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn levels(&self) -> &[LevelData] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_parse_from_object() {
        let level: LevelData = serde_json::from_str(
            r##"{"tiles": ["#^0#"], "buttons": {"0": {"on": " ", "off": "#", "target": {"x": 3, "y": 0}}}}"##,
        )
        .unwrap();
        let binding = level.buttons.get(0).unwrap();
        assert_eq!(binding.on, ' ');
        assert_eq!(binding.off, '#');
        assert_eq!(binding.target, ButtonTarget { x: 3, y: 0 });
    }

    #[test]
    fn buttons_parse_from_array() {
        let level: LevelData = serde_json::from_str(
            r##"{"tiles": ["#^01#"], "buttons": [
                {"on": "@", "off": " ", "target": {"x": 0, "y": 0}},
                {"on": "~", "off": "#", "target": {"x": 4, "y": 0}}
            ]}"##,
        )
        .unwrap();
        assert_eq!(level.buttons.get(1).unwrap().on, '~');
        assert!(level.buttons.get(2).is_none());
    }

    #[test]
    fn non_numeric_button_keys_are_rejected() {
        let result: Result<LevelData, _> = serde_json::from_str(
            r##"{"tiles": ["^"], "buttons": {"a": {"on": " ", "off": "#", "target": {"x": 0, "y": 0}}}}"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn buttons_default_to_empty() {
        let pack = LevelPack::from_json(r##"[{"tiles": ["^@"]}, {"tiles": ["@^"]}]"##).unwrap();
        assert_eq!(pack.len(), 2);
        assert!(pack.levels()[0].buttons.0.is_empty());
    }

    #[test]
    fn from_rows_splits_lines() {
        let level = LevelData::from_rows("###\n#^#\n###", ButtonTable::default());
        assert_eq!(level.tiles, vec!["###", "#^#", "###"]);
    }
}
