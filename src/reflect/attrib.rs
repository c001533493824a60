//! Vertex attribute slots and their lookup tables.
//!
//! The slot set is small and fixed, so every table is a static array indexed
//! by the dense [`Attrib`] discriminant.

use std::fmt;

/// Attribute slot a flattened input or output parameter maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Attrib {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Color0,
    Color1,
    Color2,
    Color3,
    Indices,
    Weight,
    TexCoord0,
    TexCoord1,
    TexCoord2,
    TexCoord3,
    TexCoord4,
    TexCoord5,
    TexCoord6,
    TexCoord7,

    Unknown,
    /// Consumed by the pipeline stage itself (e.g. `SV_Position`); never emitted.
    Internal,
}

/// Number of slots that have table entries.
pub const ATTRIB_COUNT: usize = 18;

/// Sentinel ID for instance-data inputs that must not bind as vertex attributes.
pub const INSTANCE_DATA_ID: u16 = u16::MAX;

const ATTRIBS: [Attrib; ATTRIB_COUNT] = [
    Attrib::Position,
    Attrib::Normal,
    Attrib::Tangent,
    Attrib::Bitangent,
    Attrib::Color0,
    Attrib::Color1,
    Attrib::Color2,
    Attrib::Color3,
    Attrib::Indices,
    Attrib::Weight,
    Attrib::TexCoord0,
    Attrib::TexCoord1,
    Attrib::TexCoord2,
    Attrib::TexCoord3,
    Attrib::TexCoord4,
    Attrib::TexCoord5,
    Attrib::TexCoord6,
    Attrib::TexCoord7,
];

const NAMES: [&str; ATTRIB_COUNT] = [
    "POSITION", "NORMAL", "TANGENT", "BITANGENT", "COLOR0", "COLOR1", "COLOR2", "COLOR3",
    "INDICES", "WEIGHT", "TEXCOORD0", "TEXCOORD1", "TEXCOORD2", "TEXCOORD3", "TEXCOORD4",
    "TEXCOORD5", "TEXCOORD6", "TEXCOORD7",
];

// Runtime attribute IDs. Color2/Color3 were added late and live after TexCoord7.
const IDS: [u16; ATTRIB_COUNT] = [
    0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0018, 0x0019, 0x000e, 0x000f, 0x0010,
    0x0011, 0x0012, 0x0013, 0x0014, 0x0015, 0x0016, 0x0017,
];

const RUNTIME_NAMES: [&str; ATTRIB_COUNT] = [
    "a_position",
    "a_normal",
    "a_tangent",
    "a_bitangent",
    "a_color0",
    "a_color1",
    "a_color2",
    "a_color3",
    "a_indices",
    "a_weight",
    "a_texcoord0",
    "a_texcoord1",
    "a_texcoord2",
    "a_texcoord3",
    "a_texcoord4",
    "a_texcoord5",
    "a_texcoord6",
    "a_texcoord7",
];

/// Instance data is fed through the texture coordinate slots from the top down.
const INSTANCE_DATA_NAMES: [(Attrib, &str); 5] = [
    (Attrib::TexCoord7, "i_data0"),
    (Attrib::TexCoord6, "i_data1"),
    (Attrib::TexCoord5, "i_data2"),
    (Attrib::TexCoord4, "i_data3"),
    (Attrib::TexCoord3, "i_data4"),
];

const COLOR_SLOTS: [Attrib; 4] = [Attrib::Color0, Attrib::Color1, Attrib::Color2, Attrib::Color3];

const TEXCOORD_SLOTS: [Attrib; 8] = [
    Attrib::TexCoord0,
    Attrib::TexCoord1,
    Attrib::TexCoord2,
    Attrib::TexCoord3,
    Attrib::TexCoord4,
    Attrib::TexCoord5,
    Attrib::TexCoord6,
    Attrib::TexCoord7,
];

impl Attrib {
    /// Every slot with table entries, in discriminant order.
    pub fn all() -> &'static [Attrib] {
        &ATTRIBS
    }

    fn table_index(self) -> Option<usize> {
        let index = self as usize;
        (index < ATTRIB_COUNT).then_some(index)
    }

    /// Classify a semantic name/index pair.
    ///
    /// Unrecognised semantics, and numbered semantics past their last slot,
    /// yield [`Attrib::Unknown`].
    pub fn from_semantic(name: &str, index: u32) -> Attrib {
        let is = |expected: &str| name.eq_ignore_ascii_case(expected);
        let numbered = |slots: &[Attrib]| {
            slots
                .get(index as usize)
                .copied()
                .unwrap_or(Attrib::Unknown)
        };

        if is("POSITION") {
            Attrib::Position
        } else if is("NORMAL") {
            Attrib::Normal
        } else if is("TANGENT") {
            Attrib::Tangent
        } else if is("BITANGENT") {
            Attrib::Bitangent
        } else if is("COLOR") {
            numbered(&COLOR_SLOTS)
        } else if is("TEXCOORD") {
            numbered(&TEXCOORD_SLOTS)
        } else if is("SV_POSITION") || is("SV_TARGET") {
            Attrib::Internal
        } else {
            Attrib::Unknown
        }
    }

    /// Display name, `"unknown"` for slots without an entry.
    pub fn name(self) -> &'static str {
        self.table_index().map_or("unknown", |i| NAMES[i])
    }

    /// Runtime attribute ID.
    pub fn id(self) -> Option<u16> {
        self.table_index().map(|i| IDS[i])
    }

    /// Canonical runtime GLSL attribute name (`a_texcoord0`).
    pub fn runtime_name(self) -> Option<&'static str> {
        self.table_index().map(|i| RUNTIME_NAMES[i])
    }

    /// Runtime name when the slot carries per-instance data (`i_data0`).
    pub fn instance_data_name(self) -> Option<&'static str> {
        INSTANCE_DATA_NAMES
            .iter()
            .find(|(attrib, _)| *attrib == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Attrib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
