//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Book category.
///
/// Serialized as its upper-case name. On input the name is matched without
/// regard to case, and the numeric codes `0`, `1`, `2` are accepted too.
/// Anything unrecognized, `null` included, becomes `Unspecified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "CategoryRepr")]
#[repr(i32)]
pub enum Category {
    #[default]
    Unspecified = 0,
    Technology = 1,
    Fiction = 2,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Code(i64),
    Name(String),
    Other(serde::de::IgnoredAny),
}

impl From<CategoryRepr> for Category {
    fn from(repr: CategoryRepr) -> Self {
        match repr {
            CategoryRepr::Code(code) => Category::from_code(code),
            CategoryRepr::Name(name) => Category::from(name.as_str()),
            CategoryRepr::Other(_) => Category::Unspecified,
        }
    }
}

impl Category {
    /// Map a wire code of any width, out-of-range codes included
    pub fn from_code(code: i64) -> Self {
        i32::try_from(code).map(Category::from).unwrap_or_default()
    }
}

impl From<i32> for Category {
    fn from(v: i32) -> Self {
        match v {
            1 => Category::Technology,
            2 => Category::Fiction,
            _ => Category::Unspecified,
        }
    }
}

impl From<Category> for i32 {
    fn from(c: Category) -> Self {
        c as i32
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Category::from_code(code);
        }
        match s.to_ascii_uppercase().as_str() {
            "TECHNOLOGY" => Category::Technology,
            "FICTION" => Category::Fiction,
            _ => Category::Unspecified,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Unspecified => "UNSPECIFIED",
            Category::Technology => "TECHNOLOGY",
            Category::Fiction => "FICTION",
        };
        write!(f, "{}", label)
    }
}
