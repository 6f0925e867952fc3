//! Layer tags and layer sets.
//!
//! Every variable of a correlation matrix belongs to one layer of a small,
//! closed set. A [`LayerSet`] is the ordered selection of layers analyzed
//! together in one run.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, de};
use thiserror::Error;

/// Errors raised while building layer values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("unknown layer `{0}`, expected one of 1, 2, 3, NT, SD, CD")]
    UnknownTag(String),

    #[error("a layer set needs at least one layer")]
    EmptySet,
}

/// One layer of the multilayer network.
///
/// The numeric value is the conventional layer number; declaration order is
/// the total order used for plane heights and iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerTag {
    /// Neuropsychological test scores.
    NeuroTests = 1,
    /// Subcortical damage (white matter disconnection).
    SubcorticalDamage = 2,
    /// Cortical damage.
    CorticalDamage = 3,
}

impl LayerTag {
    /// All layers in ascending order.
    pub const ALL: [LayerTag; 3] = [
        LayerTag::NeuroTests,
        LayerTag::SubcorticalDamage,
        LayerTag::CorticalDamage,
    ];

    /// Returns the conventional layer number (1, 2 or 3).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Returns the short display code used in labels and legends.
    pub fn code(self) -> &'static str {
        match self {
            Self::NeuroTests => "NT",
            Self::SubcorticalDamage => "SD",
            Self::CorticalDamage => "CD",
        }
    }

    /// Returns a human-readable description of the layer.
    pub fn description(self) -> &'static str {
        match self {
            Self::NeuroTests => "neuropsychological scores",
            Self::SubcorticalDamage => "subcortical damage",
            Self::CorticalDamage => "cortical damage",
        }
    }

    /// Returns the plane height of this layer.
    ///
    /// The mapping reverses the layer order (the highest layer number sits on
    /// plane 0) and depends only on the tag, never on which layers are present.
    pub fn plane(self) -> u8 {
        let max = Self::ALL[Self::ALL.len() - 1].number();
        max - self.number()
    }
}

impl fmt::Display for LayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LayerTag {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1" | "NT" => Ok(Self::NeuroTests),
            "2" | "SD" => Ok(Self::SubcorticalDamage),
            "3" | "CD" => Ok(Self::CorticalDamage),
            _ => Err(LayerError::UnknownTag(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for LayerTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string().parse().map_err(de::Error::custom),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// A non-empty, ordered selection of layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerSet {
    layers: BTreeSet<LayerTag>,
}

impl LayerSet {
    /// Creates a layer set from any collection of tags. Duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::EmptySet`] when no tag is given.
    pub fn new(layers: impl IntoIterator<Item = LayerTag>) -> Result<Self, LayerError> {
        let layers: BTreeSet<LayerTag> = layers.into_iter().collect();
        if layers.is_empty() {
            return Err(LayerError::EmptySet);
        }
        Ok(Self { layers })
    }

    /// The set containing every layer.
    pub fn all() -> Self {
        Self {
            layers: LayerTag::ALL.into_iter().collect(),
        }
    }

    /// Every non-empty layer set, smallest first.
    pub fn every_combination() -> Vec<LayerSet> {
        let mut sets: Vec<LayerSet> = (1u8..(1 << LayerTag::ALL.len()))
            .map(|mask| Self {
                layers: LayerTag::ALL
                    .into_iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, tag)| tag)
                    .collect(),
            })
            .collect();
        sets.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.layers.cmp(&b.layers)));
        sets
    }

    pub fn contains(&self, layer: LayerTag) -> bool {
        self.layers.contains(&layer)
    }

    /// Iterates the layers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = LayerTag> + '_ {
        self.layers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Display for LayerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers: Vec<String> = self.iter().map(|l| l.number().to_string()).collect();
        write!(f, "[{}]", numbers.join(","))
    }
}

impl FromStr for LayerSet {
    type Err = LayerError;

    /// Parses `"1,3"`, `"NT+CD"` or `"nt cd"` style lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tags = s
            .split([',', '+', ' ', '_'])
            .filter(|part| !part.trim().is_empty())
            .map(LayerTag::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tags)
    }
}

impl<'de> Deserialize<'de> for LayerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<LayerTag>),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::List(tags) => LayerSet::new(tags).map_err(de::Error::custom),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_layer_tag_parse() {
        assert_eq!("1".parse::<LayerTag>().unwrap(), LayerTag::NeuroTests);
        assert_eq!("sd".parse::<LayerTag>().unwrap(), LayerTag::SubcorticalDamage);
        assert_eq!(" CD ".parse::<LayerTag>().unwrap(), LayerTag::CorticalDamage);
        assert_eq!(
            "4".parse::<LayerTag>(),
            Err(LayerError::UnknownTag("4".to_string()))
        );
    }

    #[test]
    fn test_plane_reverses_layer_order() {
        assert_eq!(LayerTag::NeuroTests.plane(), 2);
        assert_eq!(LayerTag::SubcorticalDamage.plane(), 1);
        assert_eq!(LayerTag::CorticalDamage.plane(), 0);
    }

    #[test]
    fn test_layer_set_rejects_empty() {
        assert_eq!(LayerSet::new([]), Err(LayerError::EmptySet));
        assert_eq!("".parse::<LayerSet>(), Err(LayerError::EmptySet));
    }

    #[test]
    fn test_layer_set_is_ordered_and_deduplicated() {
        let set = LayerSet::new([
            LayerTag::CorticalDamage,
            LayerTag::NeuroTests,
            LayerTag::CorticalDamage,
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![LayerTag::NeuroTests, LayerTag::CorticalDamage]
        );
        assert_eq!(set.to_string(), "[1,3]");
    }

    #[test]
    fn test_layer_set_from_str() {
        assert_eq!("1,3".parse::<LayerSet>().unwrap(), "NT+CD".parse().unwrap());
        assert_eq!("nt_sd_cd".parse::<LayerSet>().unwrap(), LayerSet::all());
    }

    #[test]
    fn test_every_combination() {
        let sets = LayerSet::every_combination();
        assert_eq!(sets.len(), 7);
        assert_eq!(sets[0].to_string(), "[1]");
        assert_eq!(sets[6], LayerSet::all());
    }

    proptest! {
        #[test]
        fn prop_plane_is_injective(a in 1u8..=3, b in 1u8..=3) {
            let a: LayerTag = a.to_string().parse().unwrap();
            let b: LayerTag = b.to_string().parse().unwrap();
            prop_assert_eq!(a == b, a.plane() == b.plane());
        }
    }
}
