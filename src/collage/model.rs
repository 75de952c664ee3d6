use crate::assets::encoded::EncodedImage;
use crate::collage::config::SlotCount;
use crate::collage::layout::{GridLayout, layout_for};
use crate::foundation::error::{SnapError, SnapResult};

/// One fixed position in the collage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSlot {
    /// 0-based slot index.
    pub index: usize,
    /// Captured photo, `None` until taken.
    pub image: Option<EncodedImage>,
}

/// Fixed-capacity array of captured photos.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollageModel {
    slot_count: SlotCount,
    slots: Vec<CaptureSlot>,
}

impl Default for CollageModel {
    fn default() -> Self {
        Self::new(SlotCount::default())
    }
}

impl CollageModel {
    /// Empty collage with `slot_count` slots.
    pub fn new(slot_count: SlotCount) -> Self {
        let mut model = Self {
            slot_count,
            slots: Vec::new(),
        };
        model.reset(slot_count);
        model
    }

    /// Drop every photo and reshape to `slot_count`.
    pub fn reset(&mut self, slot_count: SlotCount) {
        self.slot_count = slot_count;
        self.slots = (0..slot_count.get())
            .map(|index| CaptureSlot { index, image: None })
            .collect();
    }

    /// Configured slot count.
    pub fn slot_count(&self) -> SlotCount {
        self.slot_count
    }

    /// All slots in index order.
    pub fn slots(&self) -> &[CaptureSlot] {
        &self.slots
    }

    /// Photo in slot `index`, if taken.
    pub fn image(&self, index: usize) -> Option<&EncodedImage> {
        self.slots.get(index).and_then(|s| s.image.as_ref())
    }

    /// Store a fresh capture in an empty slot.
    pub fn write_slot(&mut self, index: usize, image: EncodedImage) -> SnapResult<()> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SnapError::SlotIndexOutOfRange { index, count })?;
        if slot.image.is_some() {
            return Err(SnapError::SlotAlreadyFilled { index });
        }
        slot.image = Some(image);
        Ok(())
    }

    /// Swap the photo of an already filled slot, returning the previous one.
    pub fn replace_slot(&mut self, index: usize, image: EncodedImage) -> SnapResult<EncodedImage> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SnapError::SlotIndexOutOfRange { index, count })?;
        match slot.image.as_mut() {
            Some(current) => Ok(std::mem::replace(current, image)),
            None => Err(SnapError::validation(format!(
                "slot {index} has no photo to replace"
            ))),
        }
    }

    /// Lowest-indexed slot without a photo.
    pub fn lowest_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.image.is_none())
    }

    /// Number of slots holding a photo.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.image.is_some()).count()
    }

    /// Return `true` once every slot holds a photo.
    pub fn is_complete(&self) -> bool {
        self.lowest_empty().is_none()
    }

    /// Grid shape for the configured slot count.
    pub fn layout(&self) -> GridLayout {
        layout_for(self.slot_count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collage/model.rs"]
mod tests;
