//! Converting engine byte offsets into the unit consumers index strings by.

use serde::{Deserialize, Serialize};

/// Unit used for `pos`/`end` (and `start`/`end` on native trees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// UTF-16 code units, i.e. JavaScript string indices.
    #[default]
    Utf16,
    /// Bytes of the UTF-8 source.
    Utf8,
    /// Unicode scalar values.
    Chars,
}

/// Byte offset -> unit offset lookup for one source text.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// `None` when byte offsets already are unit offsets.
    table: Option<Vec<u32>>,
}

impl OffsetMap {
    pub fn new(source: &str, unit: OffsetUnit) -> Self {
        if unit == OffsetUnit::Utf8 || source.is_ascii() {
            return Self { table: None };
        }

        let mut table = Vec::with_capacity(source.len() + 1);
        let mut units = 0u32;
        for ch in source.chars() {
            for _ in 0..ch.len_utf8() {
                table.push(units);
            }
            units += match unit {
                OffsetUnit::Utf16 => ch.len_utf16() as u32,
                OffsetUnit::Chars | OffsetUnit::Utf8 => 1,
            };
        }
        table.push(units);

        Self { table: Some(table) }
    }

    /// Offset of `byte`. Bytes inside a multi-byte character map to the
    /// start of that character; offsets past the end clamp to the length.
    pub fn offset(&self, byte: usize) -> usize {
        match &self.table {
            None => byte,
            Some(table) => {
                let index = byte.min(table.len() - 1);
                table[index] as usize
            }
        }
    }
}
