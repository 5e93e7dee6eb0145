use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::prelude::*;

use crate::*;

/// Unbiased in-place Fisher-Yates shuffle driven by the given generator.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Checks that `images` can back a deck of `pairs` pairs.
pub fn validate_images(images: &[ImageId], pairs: PairCount) -> Result<()> {
    if pairs == 0 {
        return Err(GameError::NoPairs);
    }
    if pairs > GameConfig::MAX_PAIRS {
        return Err(GameError::TooManyPairs);
    }

    let expected = usize::from(pairs);
    if images.len() != expected {
        return Err(GameError::WrongImageCount {
            expected,
            actual: images.len(),
        });
    }

    if all_distinct(images) {
        Ok(())
    } else {
        Err(GameError::DuplicateImage)
    }
}

pub fn all_distinct(images: &[ImageId]) -> bool {
    let mut seen = HashSet::with_capacity(images.len());
    images.iter().all(|image| seen.insert(image))
}

/// Builds a shuffled deck holding every image exactly twice.
///
/// Card ids are assigned sequentially before shuffling, so id `i` and id `i + pairs` always share an image.
pub fn deal<R: Rng + ?Sized>(
    images: &[ImageId],
    pairs: PairCount,
    rng: &mut R,
) -> Result<Vec<Card>> {
    validate_images(images, pairs)?;

    let mut cards: Vec<Card> = images
        .iter()
        .chain(images)
        .zip(0..=CardId::MAX)
        .map(|(image, id)| Card::new(id, image.clone()))
        .collect();
    shuffle(&mut cards, rng);

    log::debug!("dealt {} cards from {} images", cards.len(), images.len());
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use alloc::vec;
    use rand::rngs::SmallRng;

    #[test]
    fn deal_holds_every_image_exactly_twice() {
        let images = images(8);
        let mut rng = SmallRng::seed_from_u64(7);

        let cards = deal(&images, 8, &mut rng).unwrap();

        assert_eq!(cards.len(), 16);
        for image in &images {
            let count = cards.iter().filter(|card| card.image() == image).count();
            assert_eq!(count, 2, "{image} should appear twice");
        }

        let mut ids: Vec<CardId> = cards.iter().map(Card::id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<CardId>>());
        assert!(cards.iter().all(|card| card.face() == CardFace::Back));
    }

    #[test]
    fn deal_is_reproducible_for_a_seed() {
        let images = images(8);

        let first = deal(&images, 8, &mut SmallRng::seed_from_u64(99)).unwrap();
        let second = deal(&images, 8, &mut SmallRng::seed_from_u64(99)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn deal_rejects_wrong_count_and_duplicates() {
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(
            deal(&images(7), 8, &mut rng),
            Err(GameError::WrongImageCount {
                expected: 8,
                actual: 7
            })
        );

        let doubled = vec![ImageId::from("a"), ImageId::from("a")];
        assert_eq!(deal(&doubled, 2, &mut rng), Err(GameError::DuplicateImage));
        assert_eq!(deal(&images(65), 65, &mut rng), Err(GameError::TooManyPairs));
    }

    #[test]
    fn deal_rejects_an_empty_deck() {
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(deal(&[], 0, &mut rng), Err(GameError::NoPairs));
    }

    #[test]
    fn shuffle_keeps_the_same_multiset() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut SmallRng::seed_from_u64(3));

        assert_ne!(items, (0..50).collect::<Vec<u32>>());
        items.sort_unstable();
        assert_eq!(items, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);

        let mut one = [42];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [42]);
    }

    #[test]
    fn shuffle_positions_are_uniform() {
        const SIZE: usize = 16;
        const TRIALS: usize = 16_000;

        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut counts = [[0u32; SIZE]; SIZE];
        for _ in 0..TRIALS {
            let mut items: [usize; SIZE] = core::array::from_fn(|i| i);
            shuffle(&mut items, &mut rng);
            for (position, &item) in items.iter().enumerate() {
                counts[position][item] += 1;
            }
        }

        let expected = (TRIALS / SIZE) as f64;
        let chi_square: f64 = counts
            .iter()
            .flatten()
            .map(|&observed| {
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum();

        // 225 degrees of freedom, 99.9th percentile is roughly 296
        assert!(chi_square < 300.0, "chi-square too large: {chi_square}");
    }
}
