//! Category types

use crate::RecordId;
use serde::{Deserialize, Serialize};

/// Product category
///
/// Categories organize products for the storefront. Internal categories never
/// appear publicly but can still group products, f.e. for discounting.
/// Nesting is limited to a single level: a parent must not have a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub is_active: bool,
    pub is_internal: bool,
    pub name: String,
    pub slug: String,
    pub ordering: u32,
    pub description: String,
    pub parent_id: Option<RecordId>,
}

impl Category {
    pub fn is_public(&self) -> bool {
        self.is_active && !self.is_internal
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Human readable label, prefixed with the parent's name when nested
    pub fn label(&self, parent: Option<&Category>) -> String {
        match parent {
            Some(parent) if self.parent_id == Some(parent.id) => {
                format!("{} - {}", parent.name, self.name)
            }
            _ => self.name.clone(),
        }
    }
}

/// Which categories a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Active,
    /// Active and not internal
    Public,
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Active => category.is_active,
            CategoryFilter::Public => category.is_public(),
        }
    }
}

/// Category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub is_active: bool,
    pub is_internal: bool,
    pub name: String,
    pub slug: String,
    pub ordering: u32,
    pub description: String,
    pub parent_id: Option<RecordId>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            is_active: true,
            is_internal: false,
            name: name.into(),
            slug: slug.into(),
            ordering: 0,
            description: String::new(),
            parent_id: None,
        }
    }

    pub fn parent(mut self, parent_id: RecordId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn internal(mut self) -> Self {
        self.is_internal = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn ordering(mut self, ordering: u32) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn into_category(self, id: RecordId) -> Category {
        Category {
            id,
            is_active: self.is_active,
            is_internal: self.is_internal,
            name: self.name,
            slug: self.slug,
            ordering: self.ordering,
            description: self.description,
            parent_id: self.parent_id,
        }
    }
}
