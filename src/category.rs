// src/category.rs
//! Deal categories and the bracket-tag table used to classify post titles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ammo,
    Handgun,
    Rifle,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Ammo, Category::Handgun, Category::Rifle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ammo => "ammo",
            Category::Handgun => "handgun",
            Category::Rifle => "rifle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ammo" => Ok(Category::Ammo),
            "handgun" => Ok(Category::Handgun),
            "rifle" => Ok(Category::Rifle),
            other => anyhow::bail!("unknown category: {other}"),
        }
    }
}

/// Title tags in evaluation order. Every row is checked; a title may hit several.
pub const TAG_TABLE: &[(&str, Category)] = &[
    ("[ammo]", Category::Ammo),
    ("[rifle]", Category::Rifle),
    ("[handgun]", Category::Handgun),
    ("[pistol]", Category::Handgun),
];

/// Case-insensitive substring match against [`TAG_TABLE`].
/// Returns categories in table order, each at most once.
pub fn classify(title: &str) -> Vec<Category> {
    let lowered = title.to_lowercase();
    let mut out = Vec::new();
    for (tag, category) in TAG_TABLE {
        if lowered.contains(tag) && !out.contains(category) {
            out.push(*category);
        }
    }
    out
}
