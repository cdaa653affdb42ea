// batchloc: Batch operations for game localization
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Translatable file types and entry estimation.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Localization file formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileType {
    Json,
    Po,
    Resx,
    Csv,
    Txt,
    Srt,
    Vtt,
    Ass,
    Xml,
    Yaml,
    Properties,
    Ini,
    Unknown,
}

impl FileType {
    /// Maps a file extension (any case, without dot) to a type.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "po" | "pot" => Self::Po,
            "resx" => Self::Resx,
            "csv" => Self::Csv,
            "txt" => Self::Txt,
            "srt" => Self::Srt,
            "vtt" => Self::Vtt,
            "ass" | "ssa" => Self::Ass,
            "xml" => Self::Xml,
            "yaml" | "yml" => Self::Yaml,
            "properties" => Self::Properties,
            "ini" | "cfg" => Self::Ini,
            _ => Self::Unknown,
        }
    }

    /// Detects the type of a path from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Returns whether the type holds translatable text.
    #[must_use]
    pub const fn is_translatable(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Estimates the number of translatable entries in `content`.
    #[must_use]
    pub fn estimate_entries(self, content: &str) -> usize {
        match self {
            Self::Json => count_matches(json_key_regex(), content),
            // The first msgid is the catalog header.
            Self::Po => count_matches(po_msgid_regex(), content).saturating_sub(1),
            Self::Srt | Self::Vtt => content
                .replace("\r\n", "\n")
                .split("\n\n")
                .filter(|block| !block.trim().is_empty())
                .count(),
            Self::Ass => count_matches(ass_dialogue_regex(), content),
            Self::Csv => content.lines().count().saturating_sub(1),
            Self::Resx => count_matches(resx_data_regex(), content),
            Self::Properties => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
                .count(),
            _ => content.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }
}

fn json_key_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r#""(?:[^"\\]|\\.)*"[ \t\r\n]*:"#)
}

fn po_msgid_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r#"(?m)^msgid ""#)
}

fn ass_dialogue_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r"(?m)^Dialogue:")
}

fn resx_data_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r"<data[ \t\r\n>]")
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .inspect_err(|e| tracing::error!(pattern, error = %e, "Invalid built-in pattern"))
            .ok()
    })
    .as_ref()
}

fn count_matches(re: Option<&Regex>, content: &str) -> usize {
    re.map_or(0, |re| re.find_iter(content).count())
}
