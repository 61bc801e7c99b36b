use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::assets::decode::StillImage;
use crate::foundation::error::{ReelError, ReelResult};

/// Reference to a short video clip on local storage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipRef {
    /// Clip file path.
    pub path: PathBuf,
    /// Known clip length; probed lazily when absent.
    #[serde(default)]
    pub duration: Option<Duration>,
}

impl ClipRef {
    /// Clip with unknown duration.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            duration: None,
        }
    }
}

/// Reference to a music track muxed into the export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioRef {
    /// Audio file path (any container `ffmpeg` can read).
    pub path: PathBuf,
}

/// Named media slots, used in planner errors and template requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaField {
    /// The fridge/ingredients "before" photo.
    Before,
    /// The finished dish "after" photo.
    After,
    /// The plated meal photo.
    PlatedMeal,
    /// At least one usable video clip.
    Clips,
    /// Any still image.
    AnyStill,
}

impl fmt::Display for MediaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::After => "after",
            Self::PlatedMeal => "plated_meal",
            Self::Clips => "clips",
            Self::AnyStill => "any_still",
        })
    }
}

/// Media supplied alongside a recipe.
///
/// Stills are decoded by the caller before the request; clips and music are file references.
#[derive(Clone, Debug, Default)]
pub struct MediaBundle {
    /// Before photo.
    pub before: Option<StillImage>,
    /// After photo.
    pub after: Option<StillImage>,
    /// Plated meal photo.
    pub plated_meal: Option<StillImage>,
    /// Optional short clips in playback order.
    pub clips: Vec<ClipRef>,
    /// Optional music track.
    pub music: Option<AudioRef>,
}

impl MediaBundle {
    /// Require at least one still image.
    pub fn validate(&self) -> ReelResult<()> {
        if self.stills().is_empty() {
            return Err(ReelError::validation(
                "media bundle must contain at least one still image",
            ));
        }
        Ok(())
    }

    /// Return `true` when `field` can be satisfied by this bundle.
    pub fn has(&self, field: MediaField) -> bool {
        match field {
            MediaField::Before => self.before.is_some(),
            MediaField::After => self.after.is_some(),
            MediaField::PlatedMeal => self.plated_meal.is_some(),
            MediaField::Clips => !self.usable_clips().is_empty(),
            MediaField::AnyStill => !self.stills().is_empty(),
        }
    }

    /// Present stills in before, after, plated order.
    pub fn stills(&self) -> Vec<&StillImage> {
        [&self.before, &self.after, &self.plated_meal]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Clips the renderer can decode in this build.
    pub fn usable_clips(&self) -> &[ClipRef] {
        if cfg!(feature = "media-ffmpeg") {
            &self.clips
        } else {
            &[]
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/media.rs"]
mod tests;
