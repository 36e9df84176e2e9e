//! Ad kinds and orientation constraints.

use bitflags::bitflags;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of ad creative requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Banner,
    Interstitial,
}

impl AdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdType::Banner => "banner",
            AdType::Interstitial => "interstitial",
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of device orientations an ad may be shown in.
    ///
    /// An empty set means "no constraint" and is sent as [`AdOrientation::ALL`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct AdOrientation: u8 {
        const PORTRAIT = 0b01;
        const LANDSCAPE = 0b10;
        const ALL = Self::PORTRAIT.bits() | Self::LANDSCAPE.bits();
    }
}

impl Default for AdOrientation {
    fn default() -> Self {
        Self::empty()
    }
}

const ORIENTATION_NAMES: [(AdOrientation, &str); 2] = [
    (AdOrientation::PORTRAIT, "portrait"),
    (AdOrientation::LANDSCAPE, "landscape"),
];

impl AdOrientation {
    /// The set actually sent to the server.
    pub fn normalized(self) -> Self {
        if self.is_empty() {
            Self::ALL
        } else {
            self
        }
    }

    /// Orientation names in this set, portrait first.
    pub fn names(&self) -> Vec<&'static str> {
        ORIENTATION_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Looks up a lowercase wire name such as `"portrait"`, ignoring case.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        ORIENTATION_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(flag, _)| *flag)
    }
}

impl Serialize for AdOrientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AdOrientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrientationVisitor;

        impl<'de> Visitor<'de> for OrientationVisitor {
            type Value = AdOrientation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of orientation names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = AdOrientation::empty();
                while let Some(name) = seq.next_element::<String>()? {
                    set |= AdOrientation::from_wire_name(&name).ok_or_else(|| {
                        de::Error::unknown_variant(&name, &["portrait", "landscape"])
                    })?;
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(OrientationVisitor)
    }
}
