use crate::foundation::error::{SnapError, SnapResult};

/// Number of photos in one collage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SlotCount {
    /// Three photos: one wide on top, two below.
    #[default]
    Three,
    /// Four photos in a 2x2 grid.
    Four,
    /// Six photos in three columns and two rows.
    Six,
}

impl SlotCount {
    /// Every supported slot count.
    pub const ALL: [SlotCount; 3] = [Self::Three, Self::Four, Self::Six];

    /// Number of slots.
    pub fn get(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
            Self::Six => 6,
        }
    }
}

impl TryFrom<u8> for SlotCount {
    type Error = SnapError;

    fn try_from(n: u8) -> SnapResult<Self> {
        match n {
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            _ => Err(SnapError::validation(format!(
                "slot count must be 3, 4 or 6 (got {n})"
            ))),
        }
    }
}

impl From<SlotCount> for u8 {
    fn from(c: SlotCount) -> Self {
        c.get() as u8
    }
}

/// Countdown before each shot, in whole seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CountdownSecs(u32);

impl CountdownSecs {
    /// Durations offered by the booth.
    pub const ALLOWED: [u32; 6] = [2, 3, 4, 5, 6, 10];

    /// Validate and wrap a countdown length.
    pub fn new(secs: u32) -> SnapResult<Self> {
        if Self::ALLOWED.contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(SnapError::validation(format!(
                "countdown must be one of {:?} seconds (got {secs})",
                Self::ALLOWED
            )))
        }
    }

    /// Seconds.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CountdownSecs {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u32> for CountdownSecs {
    type Error = SnapError;

    fn try_from(secs: u32) -> SnapResult<Self> {
        Self::new(secs)
    }
}

impl From<CountdownSecs> for u32 {
    fn from(c: CountdownSecs) -> Self {
        c.0
    }
}

/// Which physical camera supplies the stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// User-facing camera; captures are mirrored.
    #[default]
    #[serde(alias = "user")]
    Front,
    /// World-facing camera.
    #[serde(alias = "environment")]
    Back,
}

impl FacingMode {
    /// The other camera.
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Booth settings chosen before or during a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CollageConfig {
    /// Number of collage slots.
    pub slot_count: SlotCount,
    /// Countdown before each shot.
    pub countdown: CountdownSecs,
    /// Active camera.
    pub facing: FacingMode,
}

impl CollageConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> SnapResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| SnapError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> SnapResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SnapError::serde(e.to_string()))
    }

    /// Re-check invariants of values built by hand.
    pub fn validate(&self) -> SnapResult<()> {
        CountdownSecs::new(self.countdown.get())?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collage/config.rs"]
mod tests;
