//! The user's favorite cities.

use serde::{Deserialize, Serialize};

/// Ordered list of unique city names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoritesList {
    cities: Vec<String>,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list, dropping repeats after their first occurrence.
    pub fn from_cities<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for city in cities {
            let city = city.into();
            if !list.contains(&city) {
                list.cities.push(city);
            }
        }
        list
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// A copy with `city` removed if present, appended otherwise.
    pub fn toggled(&self, city: &str) -> Self {
        let mut cities = self.cities.clone();
        if let Some(pos) = cities.iter().position(|c| c == city) {
            cities.remove(pos);
        } else {
            cities.push(city.to_string());
        }
        Self { cities }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl From<Vec<String>> for FavoritesList {
    fn from(cities: Vec<String>) -> Self {
        Self::from_cities(cities)
    }
}

impl From<FavoritesList> for Vec<String> {
    fn from(list: FavoritesList) -> Self {
        list.cities
    }
}

/// Toggle `city` in `current`, leaving `current` untouched.
pub fn toggle(current: &FavoritesList, city: &str) -> FavoritesList {
    current.toggled(city)
}

/// Stored shape of a user's favorites: `{ "cities": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesDocument {
    #[serde(default)]
    pub cities: FavoritesList,
}
