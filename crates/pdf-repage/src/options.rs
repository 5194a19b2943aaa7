use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Booklet imposition configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookletOptions {
    pub paper: PaperFormat,
    pub direction: ReadingDirection,
    pub split: SplitMode,
}

impl BookletOptions {
    /// Options suggested for a document of `page_count` pages.
    ///
    /// Booklets that would exceed the comfortable fold thickness are split
    /// into parts of [`DEFAULT_SHEETS_PER_PART`] sheets.
    pub fn recommended_for(page_count: usize) -> Self {
        let sheets = page_count.div_ceil(PAGES_PER_SHEET);
        let split = if sheets > SPLIT_WARNING_SHEETS {
            SplitMode::BySheets(DEFAULT_SHEETS_PER_PART)
        } else {
            SplitMode::Single
        };
        Self {
            split,
            ..Self::default()
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RepageError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RepageError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let SplitMode::BySheets(sheets) = self.split {
            if sheets == 0 {
                return Err(RepageError::Config(
                    "Sheets per part must be at least 1".to_string(),
                ));
            }
            if sheets.checked_mul(PAGES_PER_SHEET).is_none() {
                return Err(RepageError::Config(format!(
                    "Sheets per part is too large: {}",
                    sheets
                )));
            }
        }
        Ok(())
    }
}

/// Lossy image re-compression applied when saving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionSettings {
    /// JPEG quality, 1-100
    pub quality: u8,
    /// Images larger than this on either axis are downscaled to fit
    pub max_side: u32,
}

impl CompressionSettings {
    /// Small files for on-screen reading
    pub fn web() -> Self {
        Self {
            quality: WEB_JPEG_QUALITY,
            max_side: WEB_MAX_SIDE_PX,
        }
    }

    /// Keeps enough resolution for office printing
    pub fn print() -> Self {
        Self {
            quality: PRINT_JPEG_QUALITY,
            max_side: PRINT_MAX_SIDE_PX,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(RepageError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        if self.max_side == 0 {
            return Err(RepageError::Config(
                "Maximum image side must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for writing a document to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaveOptions {
    /// `None` keeps images untouched
    pub compression: Option<CompressionSettings>,
}

impl SaveOptions {
    pub fn compressed(settings: CompressionSettings) -> Self {
        Self {
            compression: Some(settings),
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RepageError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.compression {
            Some(settings) => settings.validate(),
            None => Ok(()),
        }
    }
}
