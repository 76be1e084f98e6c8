use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Icon identifiers the views know how to render.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IconKey {
    Home,
    PawPrint,
    Truck,
    Wifi,
    Zap,
    User,
    CreditCard,
    Fuel,
    Building,
    Landmark,
}

/// Display metadata for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryMeta {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: IconKey,
}

impl CategoryMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: IconKey,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon,
        }
    }
}

static FALLBACK_META: Lazy<CategoryMeta> =
    Lazy::new(|| CategoryMeta::new("other", "Outros", "#6b7280", IconKey::CreditCard));

/// The single owner of category metadata. Views resolve ids through this
/// registry instead of keeping their own lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRegistry {
    entries: BTreeMap<String, CategoryMeta>,
}

impl CategoryRegistry {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry seeded with the product's stock categories.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for meta in default_categories() {
            registry.insert(meta);
        }
        registry
    }

    pub fn insert(&mut self, meta: CategoryMeta) {
        self.entries.insert(meta.id.clone(), meta);
    }

    pub fn remove(&mut self, id: &str) -> Option<CategoryMeta> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&CategoryMeta> {
        self.entries.get(id)
    }

    /// Metadata for an id, substituting a neutral fallback for unknown ids so
    /// rendering never fails on stale references.
    pub fn resolve(&self, id: &str) -> &CategoryMeta {
        self.entries.get(id).unwrap_or(&FALLBACK_META)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryMeta> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_categories() -> Vec<CategoryMeta> {
    vec![
        CategoryMeta::new("condominio", "Condomínio", "#3b82f6", IconKey::Home),
        CategoryMeta::new("billy", "Billy", "#f59e0b", IconKey::PawPrint),
        CategoryMeta::new("carro", "Financiamento Carro", "#8b5cf6", IconKey::Truck),
        CategoryMeta::new("internet", "Teleson Internet", "#6366f1", IconKey::Wifi),
        CategoryMeta::new("energia", "Conta de Energia", "#eab308", IconKey::Zap),
        CategoryMeta::new("aline", "Aline Veloso", "#ec4899", IconKey::User),
        CategoryMeta::new("credcard", "Credcard", "#8b5cf6", IconKey::CreditCard),
        CategoryMeta::new("itau_signature", "Itaú Signature", "#ea580c", IconKey::CreditCard),
        CategoryMeta::new("click_itau", "Cartão Click Itaú", "#f97316", IconKey::CreditCard),
        CategoryMeta::new("nubank", "Cartão Nubank", "#820ad1", IconKey::CreditCard),
        CategoryMeta::new("shell", "Posto Shell", "#eab308", IconKey::Fuel),
        CategoryMeta::new(
            "financiamento_apto",
            "Financiamento Apartamento",
            "#0ea5e9",
            IconKey::Building,
        ),
        CategoryMeta::new("emprestimos", "Empréstimos", "#10b981", IconKey::Landmark),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_stock_categories() {
        let registry = CategoryRegistry::with_defaults();
        assert_eq!(registry.len(), 13);
        assert!(registry.contains("nubank"));
        assert_eq!(registry.get("shell").unwrap().icon, IconKey::Fuel);
    }

    #[test]
    fn resolve_falls_back_for_unknown_ids() {
        let registry = CategoryRegistry::with_defaults();
        let meta = registry.resolve("deleted_category");
        assert_eq!(meta.id, "other");
        assert_eq!(meta.icon, IconKey::CreditCard);
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let mut registry = CategoryRegistry::empty();
        registry.insert(CategoryMeta::new("spotify", "Spotify", "#1db954", IconKey::CreditCard));
        assert!(registry.contains("spotify"));
        let removed = registry.remove("spotify").unwrap();
        assert_eq!(removed.name, "Spotify");
        assert!(registry.is_empty());
    }
}
