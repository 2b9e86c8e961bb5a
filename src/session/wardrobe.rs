use crate::{data_url::DataUrl, error::Result, models::WardrobeItem};
use std::path::Path;

/// In-memory garment collection for one session.
#[derive(Debug, Clone, Default)]
pub struct Wardrobe {
    items: Vec<WardrobeItem>,
}

impl Wardrobe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an uploaded garment file into a new item named after the file.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<WardrobeItem> {
        let path = path.as_ref();
        let url = DataUrl::from_file(path).await?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("garment")
            .to_string();
        Ok(WardrobeItem::new(name, url).with_file(path))
    }

    pub fn add(&mut self, item: WardrobeItem) -> &WardrobeItem {
        log::info!("👕 Added '{}' to the wardrobe", item.name);
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn remove(&mut self, id: &str) -> Option<WardrobeItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&WardrobeItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[WardrobeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
