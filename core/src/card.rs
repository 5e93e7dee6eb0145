use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Opaque handle to a card picture, usually a URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the player currently sees on a card.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    #[default]
    Back,
    Front,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    image: ImageId,
    flipped: bool,
    matched: bool,
}

impl Card {
    pub fn new(id: CardId, image: ImageId) -> Self {
        Self {
            id,
            image,
            flipped: false,
            matched: false,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn image(&self) -> &ImageId {
        &self.image
    }

    /// Face-up and waiting for its pair to be resolved.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }

    pub fn face(&self) -> CardFace {
        match (self.flipped, self.matched) {
            (_, true) => CardFace::Matched,
            (true, false) => CardFace::Front,
            (false, false) => CardFace::Back,
        }
    }

    pub(crate) fn flip_up(&mut self) {
        self.flipped = true;
    }

    pub(crate) fn flip_down(&mut self) {
        self.flipped = false;
    }

    pub(crate) fn mark_matched(&mut self) {
        self.flipped = false;
        self.matched = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_follows_flip_and_match_flags() {
        let mut card = Card::new(3, ImageId::from("a.png"));
        assert_eq!(card.face(), CardFace::default());
        assert_eq!(card.face(), CardFace::Back);
        assert!(card.is_selectable());

        card.flip_up();
        assert_eq!(card.face(), CardFace::Front);
        assert!(!card.is_selectable());

        card.mark_matched();
        assert_eq!(card.face(), CardFace::Matched);
        assert!(!card.is_flipped());
        assert!(!card.is_selectable());
    }

    #[test]
    fn image_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ImageId::from("https://img/1")).unwrap();
        assert_eq!(json, "\"https://img/1\"");
    }
}
