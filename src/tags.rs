//! The tag table and the keybindings derived from it.
//!
//! A river tag is one bit of a 32-bit mask; a window may carry several tags
//! at once.  Every [`TagDefinition`] yields four `map` registrations (see
//! [`TagTable::keybindings`]) that focus, assign and toggle its mask.

use crate::command::{CommandInvocation, Keybinding, Modifier, ParseError};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;

/// Highest number of tags the 32-bit mask can address.
pub const MAX_TAGS: usize = 32;

/// A single-bit tag mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagMask(u32);

impl TagMask {
    /// Mask for the tag at `index` (`1 << index`).
    pub fn from_index(index: u32) -> Option<Self> {
        1u32.checked_shl(index).map(Self)
    }

    /// Accept `bits` only if exactly one bit is set.
    pub fn new(bits: u32) -> Option<Self> {
        bits.is_power_of_two().then_some(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TagMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TagMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        TagMask::new(bits)
            .ok_or_else(|| DeError::custom(format!("tag mask {} is not a single bit", bits)))
    }
}

/// One tag: its display name, the key that addresses it, its mask and the
/// programs associated with it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    pub key: String,
    pub mask: TagMask,
    #[serde(default)]
    pub programs: Vec<String>,
}

impl TagDefinition {
    pub fn new(name: &str, key: &str, mask: TagMask, programs: &[&str]) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            mask,
            programs: programs.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The tag's programs as argument vectors, with variables expanded.
    pub fn program_invocations(&self) -> Result<Vec<CommandInvocation>, ParseError> {
        self.programs
            .iter()
            .map(|p| CommandInvocation::parse(p))
            .collect()
    }

    /// The four bindings for this tag, in registration order.
    pub fn keybindings(&self) -> [Keybinding; 4] {
        let mask = self.mask.to_string();
        let mask = mask.as_str();
        [
            Keybinding::normal(&[Modifier::Super], &self.key, ["set-focused-tags", mask]),
            Keybinding::normal(
                &[Modifier::Super, Modifier::Control],
                &self.key,
                ["set-view-tags", mask],
            ),
            Keybinding::normal(
                &[Modifier::Super, Modifier::Alt],
                &self.key,
                ["toggle-focused-tags", mask],
            ),
            Keybinding::normal(
                &[Modifier::Super, Modifier::Control, Modifier::Alt],
                &self.key,
                ["toggle-view-tags", mask],
            ),
        ]
    }
}

/// Reasons a tag table is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagTableError {
    #[error("{0} tags exceed the limit of 32")]
    TooMany(usize),
    #[error("tag {name:?} reuses mask {mask}")]
    DuplicateMask { name: String, mask: TagMask },
    #[error("tag {0:?} has no key")]
    EmptyKey(String),
    #[error("tag {name:?} has a malformed program: {source}")]
    Program {
        name: String,
        #[source]
        source: ParseError,
    },
}

/// An ordered, validated list of tags.
///
/// Built once at start-up and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTable {
    tags: Vec<TagDefinition>,
}

impl TagTable {
    /// Validate `tags` and wrap them.
    ///
    /// Masks must be pairwise distinct (each is already a single bit by
    /// construction), keys non-empty and every program must split into an
    /// argument vector.
    pub fn new(tags: Vec<TagDefinition>) -> Result<Self, TagTableError> {
        if tags.len() > MAX_TAGS {
            return Err(TagTableError::TooMany(tags.len()));
        }
        let mut seen = HashSet::new();
        for tag in &tags {
            if tag.key.trim().is_empty() {
                return Err(TagTableError::EmptyKey(tag.name.clone()));
            }
            if !seen.insert(tag.mask) {
                return Err(TagTableError::DuplicateMask {
                    name: tag.name.clone(),
                    mask: tag.mask,
                });
            }
            tag.program_invocations()
                .map_err(|source| TagTableError::Program {
                    name: tag.name.clone(),
                    source,
                })?;
        }
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// All derived bindings: four per tag, tags in table order.
    pub fn keybindings(&self) -> impl Iterator<Item = Keybinding> + '_ {
        self.tags.iter().flat_map(|t| t.keybindings())
    }
}

impl Default for TagTable {
    fn default() -> Self {
        Self {
            tags: default_tags(),
        }
    }
}

/// The stock twenty-tag layout: number row then the top letter row.
pub fn default_tags() -> Vec<TagDefinition> {
    let table: [(&str, &str, &[&str]); 20] = [
        ("1:WWW", "1", &["firefox"]),
        ("2:DEV", "2", &["code"]),
        ("3:TRM", "3", &["alacritty --working-directory $HOME/Code"]),
        ("4:GIT", "4", &["gitkraken"]),
        ("5:SYS", "5", &["alacritty -e zellij"]),
        ("6:MDA", "6", &["spotify"]),
        ("7:???", "7", &[]),
        ("8:COM", "8", &[]),
        ("9:GAM", "9", &["lutris"]),
        ("0:???", "0", &[]),
        ("Q:???", "Q", &[]),
        ("W:???", "W", &[]),
        ("E:???", "E", &[]),
        ("R:???", "R", &[]),
        ("T:???", "T", &[]),
        ("Y:???", "Y", &[]),
        ("U:???", "U", &[]),
        ("I:???", "I", &[]),
        ("O:???", "O", &[]),
        ("P:???", "P", &[]),
    ];
    table
        .iter()
        .zip(0u32..)
        .filter_map(|(&(name, key, programs), i)| {
            Some(TagDefinition::new(name, key, TagMask::from_index(i)?, programs))
        })
        .collect()
}
