//! Read-only cafe/coffee catalog and the cascading coffee filter.

use crate::collaborators::CatalogSource;
use crate::error::CoreError;
use crate::models::{Cafe, Coffee};
use crate::types::DbId;

/// Placeholder shown on the coffee picker while no cafe is selected.
pub const CHOOSE_CAFE_FIRST: &str = "Choose a cafe first";

/// Placeholder shown on the coffee picker once a cafe is selected.
pub const SELECT_A_COFFEE: &str = "Select a coffee";

/// Placeholder shown on the cafe picker.
pub const SELECT_A_CAFE: &str = "Select a cafe";

/// The cafes and coffees available for selection, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    cafes: Vec<Cafe>,
    coffees: Vec<Coffee>,
}

impl Catalog {
    pub fn new(cafes: Vec<Cafe>, coffees: Vec<Coffee>) -> Self {
        Self { cafes, coffees }
    }

    /// Fetch both lists from a [`CatalogSource`].
    pub async fn load(source: &dyn CatalogSource) -> Result<Self, CoreError> {
        let cafes = source.cafes().await?;
        let coffees = source.coffees().await?;
        tracing::debug!(
            cafes = cafes.len(),
            coffees = coffees.len(),
            "Catalog loaded"
        );
        Ok(Self::new(cafes, coffees))
    }

    pub fn cafes(&self) -> &[Cafe] {
        &self.cafes
    }

    pub fn coffees(&self) -> &[Coffee] {
        &self.coffees
    }

    pub fn cafe(&self, id: DbId) -> Option<&Cafe> {
        self.cafes.iter().find(|c| c.id == id)
    }

    pub fn coffee(&self, id: DbId) -> Option<&Coffee> {
        self.coffees.iter().find(|c| c.id == id)
    }

    /// Coffees served by `cafe_id`, in catalog order.
    pub fn coffees_at(&self, cafe_id: DbId) -> impl Iterator<Item = &Coffee> {
        coffees_for_cafe(&self.coffees, cafe_id)
    }

    /// What the coffee picker should offer for the given cafe selection.
    pub fn coffee_options(&self, selected_cafe: Option<DbId>) -> CoffeeOptions<'_> {
        match selected_cafe {
            None => CoffeeOptions::Disabled,
            Some(cafe_id) => CoffeeOptions::Available(self.coffees_at(cafe_id).collect()),
        }
    }
}

/// Filter `coffees` down to those whose owning cafe is `cafe_id`.
pub fn coffees_for_cafe(coffees: &[Coffee], cafe_id: DbId) -> impl Iterator<Item = &Coffee> {
    coffees.iter().filter(move |c| c.cafe_id == cafe_id)
}

/// State of the coffee picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoffeeOptions<'a> {
    /// No cafe selected; the picker is disabled.
    Disabled,
    /// A cafe is selected; these are its coffees (possibly none).
    Available(Vec<&'a Coffee>),
}

impl CoffeeOptions<'_> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Disabled => CHOOSE_CAFE_FIRST,
            Self::Available(_) => SELECT_A_COFFEE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
