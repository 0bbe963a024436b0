//! Category grouping and the switchable-category checkbox model.

use crate::core::config::parse_id_list;
use crate::data::poi::{Category, PointOfInterest};
use crate::prelude::HashSet;

/// Collects the categories eligible for a checkbox: referenced by at least
/// one record AND present in the configured allow-list. Insertion order,
/// unique by id.
pub fn group_categories(pois: &[PointOfInterest], allow_list: &str) -> Vec<Category> {
    let allowed: HashSet<u64> = parse_id_list(allow_list).into_iter().collect();
    let mut seen = HashSet::default();
    let mut grouped = Vec::new();

    for poi in pois {
        for category in &poi.categories {
            if allowed.contains(&category.uid) && seen.insert(category.uid) {
                grouped.push(category.clone());
            }
        }
    }

    grouped
}

/// One checkbox of the category filter
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryToggle {
    pub category: Category,
    pub checked: bool,
}

impl CategoryToggle {
    /// DOM id of the checkbox element
    pub fn checkbox_id(&self) -> String {
        format!("checkCategory_{}", self.category.uid)
    }
}

/// Checkbox-per-category filter rendered next to the map.
///
/// Each toggle flips the visibility of exactly the clicked category's
/// markers. A marker registered under two categories is therefore re-shown
/// by re-checking either of them, even while its other category stays
/// unchecked. That matches the behavior existing installations rely on; do
/// not "fix" it here.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    toggles: Vec<CategoryToggle>,
    form_id: String,
}

impl CategoryFilter {
    /// All checkboxes start checked
    pub fn new(categories: Vec<Category>, content_uid: u64) -> Self {
        Self {
            toggles: categories
                .into_iter()
                .map(|category| CategoryToggle {
                    category,
                    checked: true,
                })
                .collect(),
            form_id: format!("poimapForm-{content_uid}"),
        }
    }

    /// DOM id of the surrounding form element
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn toggles(&self) -> &[CategoryToggle] {
        &self.toggles
    }

    pub fn is_checked(&self, category: u64) -> bool {
        self.toggles
            .iter()
            .any(|toggle| toggle.category.uid == category && toggle.checked)
    }

    /// Updates the checkbox state; returns false for an unknown category
    pub fn set_checked(&mut self, category: u64, checked: bool) -> bool {
        match self
            .toggles
            .iter_mut()
            .find(|toggle| toggle.category.uid == category)
        {
            Some(toggle) => {
                toggle.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.toggles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }
}
