use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Variant identifier. Declaration order is upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantTag {
    Original,
    Mobile,
    Thumbnail,
}

impl VariantTag {
    pub const ALL: [VariantTag; 3] = [VariantTag::Original, VariantTag::Mobile, VariantTag::Thumbnail];

    pub fn as_str(self) -> &'static str {
        match self {
            VariantTag::Original => "original",
            VariantTag::Mobile => "mobile",
            VariantTag::Thumbnail => "thumbnail",
        }
    }
}

impl FromStr for VariantTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(VariantTag::Original),
            "mobile" => Ok(VariantTag::Mobile),
            "thumbnail" => Ok(VariantTag::Thumbnail),
            _ => Err(anyhow::anyhow!("Invalid variant tag: {}", s)),
        }
    }
}

impl Display for VariantTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// How a source is fitted into a variant's target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Scale to fit inside the box without cropping.
    #[default]
    Contain,
    /// Scale and center-crop to fill the box exactly.
    Cover,
}

/// A named resize target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub tag: VariantTag,
    pub max_width: u32,
    pub max_height: u32,
    pub fit: Fit,
}

impl VariantSpec {
    pub const fn new(tag: VariantTag, max_width: u32, max_height: u32, fit: Fit) -> Self {
        Self {
            tag,
            max_width,
            max_height,
            fit,
        }
    }
}

/// The process-wide variant table.
pub const DEFAULT_VARIANTS: [VariantSpec; 3] = [
    VariantSpec::new(VariantTag::Original, 1920, 1920, Fit::Contain),
    VariantSpec::new(VariantTag::Mobile, 640, 640, Fit::Contain),
    VariantSpec::new(VariantTag::Thumbnail, 200, 200, Fit::Cover),
];
