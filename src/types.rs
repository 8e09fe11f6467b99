use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Element {
    Normal,
    Fire,
    Water,
    Leaf,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Normal, Element::Fire, Element::Water, Element::Leaf];

    pub fn name(self) -> &'static str {
        match self {
            Element::Normal => "normal",
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Leaf => "leaf",
        }
    }
}

static ELEMENT_NAMES: phf::Map<&'static str, Element> = phf::phf_map! {
    "normal" => Element::Normal,
    "fire" => Element::Fire,
    "water" => Element::Water,
    "leaf" => Element::Leaf,
    "grass" => Element::Leaf,
};

#[derive(Debug, thiserror::Error)]
#[error("unknown element '{0}' (expected normal, fire, water or leaf)")]
pub struct UnknownElement(String);

impl FromStr for Element {
    type Err = UnknownElement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENT_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownElement(s.to_string()))
    }
}

impl TryFrom<String> for Element {
    type Error = UnknownElement;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Damage multiplier for a skill of `attacking` element hitting a defender of
/// `defending` element.
///
/// Fire beats leaf, leaf beats water, water beats fire; the reverse pairs are
/// resisted. Normal is neutral in both directions.
pub fn type_effectiveness(attacking: Element, defending: Element) -> f32 {
    use Element::*;
    match (attacking, defending) {
        (Fire, Leaf) | (Leaf, Water) | (Water, Fire) => 2.0,
        (Leaf, Fire) | (Water, Leaf) | (Fire, Water) => 0.5,
        _ => 1.0,
    }
}
