use crate::data_url::DataUrl;
use crate::models::WardrobeItem;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct OutfitLayer {
    /// `None` for the bare model at the bottom of the stack.
    pub garment: Option<WardrobeItem>,
    pub base_image: DataUrl,
    /// Re-posed renders of `base_image`, keyed by pose instruction.
    pub pose_images: HashMap<String, DataUrl>,
}

impl OutfitLayer {
    fn new(garment: Option<WardrobeItem>, base_image: DataUrl) -> Self {
        Self {
            garment,
            base_image,
            pose_images: HashMap::new(),
        }
    }

    pub fn image_for(&self, pose: Option<&str>) -> &DataUrl {
        pose.and_then(|pose| self.pose_images.get(pose))
            .unwrap_or(&self.base_image)
    }
}

/// Garments stacked on a model image, the last one on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outfit {
    layers: Vec<OutfitLayer>,
}

impl Outfit {
    pub fn new(model_image: DataUrl) -> Self {
        Self {
            layers: vec![OutfitLayer::new(None, model_image)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[OutfitLayer] {
        &self.layers
    }

    pub fn model_image(&self) -> Option<&DataUrl> {
        self.layers.first().map(|layer| &layer.base_image)
    }

    pub fn top(&self) -> Option<&OutfitLayer> {
        self.layers.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut OutfitLayer> {
        self.layers.last_mut()
    }

    pub fn garments(&self) -> impl Iterator<Item = &WardrobeItem> {
        self.layers.iter().filter_map(|layer| layer.garment.as_ref())
    }

    pub fn push_garment(&mut self, garment: WardrobeItem, image: DataUrl) {
        self.layers.push(OutfitLayer::new(Some(garment), image));
    }

    /// Removes the top garment. The bare model layer is never removed.
    pub fn pop_garment(&mut self) -> Option<WardrobeItem> {
        if self.layers.len() <= 1 {
            return None;
        }
        self.layers.pop().and_then(|layer| layer.garment)
    }
}
