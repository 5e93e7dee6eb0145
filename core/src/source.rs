use alloc::format;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt::Display;
use core::future::Future;

use crate::*;

/// Base URL for the placeholder pictures used when the real source is unavailable.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/200/300";

/// Supplies distinct card pictures for a deal.
pub trait ImageSource {
    type Error: Display;

    fn fetch(
        &self,
        count: usize,
    ) -> impl Future<Output = core::result::Result<Vec<ImageId>, Self::Error>>;
}

/// Deterministic placeholder set, distinct per index.
pub fn placeholder_images(count: usize) -> Vec<ImageId> {
    (0..count)
        .map(|i| ImageId::new(format!("{PLACEHOLDER_IMAGE_URL}?random={i}")))
        .collect()
}

/// Wraps a source so that fetching never fails: errors, short answers and repeated images are replaced
/// with placeholders.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackImageSource<S> {
    inner: S,
}

impl<S> FallbackImageSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ImageSource> ImageSource for FallbackImageSource<S> {
    type Error = Infallible;

    async fn fetch(&self, count: usize) -> core::result::Result<Vec<ImageId>, Self::Error> {
        match self.inner.fetch(count).await {
            Ok(images) if images.len() == count && all_distinct(&images) => Ok(images),
            Ok(images) if images.len() == count => {
                log::warn!("image source repeated an image, using placeholders");
                Ok(placeholder_images(count))
            }
            Ok(images) => {
                log::warn!(
                    "image source returned {} images instead of {}, using placeholders",
                    images.len(),
                    count
                );
                Ok(placeholder_images(count))
            }
            Err(err) => {
                log::warn!("image source failed, using placeholders: {}", err);
                Ok(placeholder_images(count))
            }
        }
    }
}

/// Serves a fixed list of images, failing when asked for more than it holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticImageSource {
    images: Vec<ImageId>,
}

impl StaticImageSource {
    pub fn new(images: Vec<ImageId>) -> Self {
        Self { images }
    }
}

impl ImageSource for StaticImageSource {
    type Error = GameError;

    async fn fetch(&self, count: usize) -> Result<Vec<ImageId>> {
        match self.images.get(..count) {
            Some(images) => Ok(images.to_vec()),
            None => Err(GameError::WrongImageCount {
                expected: count,
                actual: self.images.len(),
            }),
        }
    }
}
