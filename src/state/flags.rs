//! Render Flags
//!
//! The closed set of render-state categories that scene nodes may override,
//! the total per-node snapshot ([`RenderFlags`]) and the partial override set
//! ([`FlagOverrides`]) that "flags" nodes carry.
//!
//! Both are stored as [`FlagBits`] so that merging an override into its parent
//! is a single mask operation:
//!
//! ```text
//! merged = (parent & !mask) | (values & mask)
//! ```
//!
//! Flags never trigger shader regeneration on their own; they switch features
//! on and off for a subgraph with minimal overhead.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, StrataError};

bitflags! {
    /// Bit storage for render flags, one bit per [`Flag`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FlagBits: u8 {
        const FOG         = 1 << 0;
        const COLOR_TRANS = 1 << 1;
        const PICKING     = 1 << 2;
        const ENABLED     = 1 << 3;
        const VISIBLE     = 1 << 4;
    }
}

/// A single render-state category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    /// Fog enabled.
    Fog,
    /// Effect of color transforms enabled.
    ColorTrans,
    /// Node participates in picking.
    Picking,
    /// Node is traversed at all; `false` culls the whole subtree.
    Enabled,
    /// Node is drawn; when `false` everything happens except the geometry draw.
    Visible,
}

impl Flag {
    /// Every category, in bit order.
    pub const ALL: [Flag; 5] = [
        Flag::Fog,
        Flag::ColorTrans,
        Flag::Picking,
        Flag::Enabled,
        Flag::Visible,
    ];

    #[inline]
    #[must_use]
    pub const fn bit(self) -> FlagBits {
        match self {
            Flag::Fog => FlagBits::FOG,
            Flag::ColorTrans => FlagBits::COLOR_TRANS,
            Flag::Picking => FlagBits::PICKING,
            Flag::Enabled => FlagBits::ENABLED,
            Flag::Visible => FlagBits::VISIBLE,
        }
    }

    /// Name used in configuration objects.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Flag::Fog => "fog",
            Flag::ColorTrans => "colortrans",
            Flag::Picking => "picking",
            Flag::Enabled => "enabled",
            Flag::Visible => "visible",
        }
    }

    /// Looks up a category by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RenderFlags
// ============================================================================

/// The effective value of every category at one point of the traversal.
///
/// A snapshot always holds a value for every [`Flag`]; there is no way to
/// build a partial one. Snapshots are plain `Copy` values, so a sink that
/// receives one cannot keep a live reference into the flag stack.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "FlagTable", into = "FlagTable")]
pub struct RenderFlags {
    bits: FlagBits,
}

impl RenderFlags {
    /// Process-wide baseline: every category enabled.
    pub const DEFAULT: Self = Self {
        bits: FlagBits::all(),
    };

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: FlagBits) -> Self {
        Self { bits }
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> FlagBits {
        self.bits
    }

    #[inline]
    #[must_use]
    pub const fn get(self, flag: Flag) -> bool {
        self.bits.contains(flag.bit())
    }

    /// Returns a copy with `flag` set to `value`.
    #[must_use]
    pub fn with(self, flag: Flag, value: bool) -> Self {
        let mut bits = self.bits;
        bits.set(flag.bit(), value);
        Self { bits }
    }

    #[inline]
    #[must_use]
    pub const fn fog(self) -> bool {
        self.get(Flag::Fog)
    }

    #[inline]
    #[must_use]
    pub const fn color_trans(self) -> bool {
        self.get(Flag::ColorTrans)
    }

    #[inline]
    #[must_use]
    pub const fn picking(self) -> bool {
        self.get(Flag::Picking)
    }

    #[inline]
    #[must_use]
    pub const fn enabled(self) -> bool {
        self.get(Flag::Enabled)
    }

    #[inline]
    #[must_use]
    pub const fn visible(self) -> bool {
        self.get(Flag::Visible)
    }

    /// Iterates `(category, value)` pairs in bit order.
    pub fn iter(self) -> impl Iterator<Item = (Flag, bool)> {
        Flag::ALL.into_iter().map(move |flag| (flag, self.get(flag)))
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for RenderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(flag, value)| (flag.name(), value)))
            .finish()
    }
}

/// Serialized form of [`RenderFlags`]. Missing fields fall back to the baseline.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct FlagTable {
    fog: bool,
    colortrans: bool,
    picking: bool,
    enabled: bool,
    visible: bool,
}

impl Default for FlagTable {
    fn default() -> Self {
        RenderFlags::DEFAULT.into()
    }
}

impl From<FlagTable> for RenderFlags {
    fn from(table: FlagTable) -> Self {
        RenderFlags::from_bits(FlagBits::empty())
            .with(Flag::Fog, table.fog)
            .with(Flag::ColorTrans, table.colortrans)
            .with(Flag::Picking, table.picking)
            .with(Flag::Enabled, table.enabled)
            .with(Flag::Visible, table.visible)
    }
}

impl From<RenderFlags> for FlagTable {
    fn from(flags: RenderFlags) -> Self {
        Self {
            fog: flags.fog(),
            colortrans: flags.color_trans(),
            picking: flags.picking(),
            enabled: flags.enabled(),
            visible: flags.visible(),
        }
    }
}

// ============================================================================
// FlagOverrides
// ============================================================================

/// A partial set of category values carried by a "flags" node.
///
/// Categories that are not mentioned are inherited from the parent snapshot,
/// never reset to the baseline.
///
/// When deserialized from a JSON object, `null` means "inherit", unknown keys
/// are ignored and any other non-boolean value is rejected.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    try_from = "Map<String, Value>",
    into = "BTreeMap<&'static str, bool>"
)]
pub struct FlagOverrides {
    mask: FlagBits,
    values: FlagBits,
}

impl FlagOverrides {
    /// Overrides nothing; pushing it yields a copy of the parent.
    pub const NONE: Self = Self {
        mask: FlagBits::empty(),
        values: FlagBits::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, flag: Flag, value: bool) -> Self {
        self.set(flag, Some(value));
        self
    }

    /// Sets or clears the override for `flag`. `None` means "inherit".
    pub fn set(&mut self, flag: Flag, value: Option<bool>) -> &mut Self {
        let bit = flag.bit();
        match value {
            Some(value) => {
                self.mask.insert(bit);
                self.values.set(bit, value);
            }
            None => {
                self.mask.remove(bit);
                self.values.remove(bit);
            }
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, flag: Flag) -> Option<bool> {
        self.mask
            .contains(flag.bit())
            .then(|| self.values.contains(flag.bit()))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.bits().count_ones() as usize
    }

    /// Iterates the explicitly overridden categories.
    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        Flag::ALL
            .into_iter()
            .filter_map(|flag| self.get(flag).map(|value| (flag, value)))
    }

    /// Merges these overrides on top of `parent`.
    ///
    /// Walks the parent's categories: each takes the override value when one
    /// is present and the parent's value otherwise.
    #[inline]
    #[must_use]
    pub fn apply(&self, parent: RenderFlags) -> RenderFlags {
        RenderFlags::from_bits((parent.bits() & !self.mask) | (self.values & self.mask))
    }

    /// Parses overrides from a JSON value. `null` is treated as no overrides.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::Null => Ok(Self::NONE),
            other => Err(StrataError::InvalidOverrides(format!(
                "expected an object, found {other}"
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut overrides = Self::NONE;
        for (key, value) in map {
            let Some(flag) = Flag::from_name(key) else {
                log::debug!("Ignoring unknown flag override '{key}'");
                continue;
            };
            match value {
                Value::Bool(value) => {
                    overrides.set(flag, Some(*value));
                }
                Value::Null => {}
                other => {
                    return Err(StrataError::InvalidFlagValue {
                        flag: flag.name(),
                        found: other.to_string(),
                    });
                }
            }
        }
        Ok(overrides)
    }
}

impl fmt::Debug for FlagOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(flag, value)| (flag.name(), value)))
            .finish()
    }
}

impl FromIterator<(Flag, bool)> for FlagOverrides {
    fn from_iter<I: IntoIterator<Item = (Flag, bool)>>(iter: I) -> Self {
        let mut overrides = Self::NONE;
        for (flag, value) in iter {
            overrides.set(flag, Some(value));
        }
        overrides
    }
}

impl TryFrom<Map<String, Value>> for FlagOverrides {
    type Error = StrataError;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        Self::from_map(&map)
    }
}

impl From<FlagOverrides> for BTreeMap<&'static str, bool> {
    fn from(overrides: FlagOverrides) -> Self {
        overrides
            .iter()
            .map(|(flag, value)| (flag.name(), value))
            .collect()
    }
}
