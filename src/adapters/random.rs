use crate::domain::FieldDetails;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use tracing::trace;

/// Seedable generator used for every reproducible decision of one fill call.
///
/// Each call to [`RandomSource::with_seed`] reseeds from a structural path,
/// so a decision depends only on where it happens in the response and never
/// on what was generated before it. Instances are meant to live for a single
/// call; they are not `Sync`.
pub struct RandomSource {
    rng: RefCell<StdRng>,
    null_probability: f64,
}

impl RandomSource {
    pub fn new(null_probability: f64) -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
            null_probability: null_probability.clamp(0.0, 1.0),
        }
    }

    pub fn seed(&self, seed: u64) {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed);
    }

    pub fn next_u64(&self) -> u64 {
        self.rng.borrow_mut().gen()
    }

    /// Run `func` with the generator seeded from `keypath` plus `offset`,
    /// then reseed to an unrelated value.
    pub fn with_seed<T>(&self, keypath: &[FieldDetails], offset: usize, func: impl FnOnce() -> T) -> T {
        let seed = seed_from_keypath(keypath) + offset as u64;
        trace!(seed, depth = keypath.len(), "seeding random source");
        self.seed(seed);
        let value = func();
        self.seed(rand::thread_rng().gen());
        value
    }

    pub fn word(&self) -> String {
        Word().fake_with_rng::<String, _>(&mut *self.rng.borrow_mut())
    }

    pub fn integer(&self) -> i64 {
        self.rng.borrow_mut().gen_range(0..=99_999)
    }

    /// Two decimal places
    pub fn float(&self) -> f64 {
        let cents: i64 = self.rng.borrow_mut().gen_range(0..=9_999_999);
        cents as f64 / 100.0
    }

    pub fn boolean(&self) -> bool {
        self.rng.borrow_mut().gen()
    }

    pub fn uuid(&self) -> String {
        let bytes: [u8; 16] = self.rng.borrow_mut().gen();
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }

    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut *self.rng.borrow_mut())
    }

    /// Coin flip deciding whether a nullable value comes out as `null`
    pub fn choose_null(&self) -> bool {
        self.rng.borrow_mut().gen_bool(self.null_probability)
    }
}

/// Additive hash of the keypath: the sum of the character codes of every
/// rendered element. Paths that are permutations of the same characters
/// collide; generated values rely on this exact function, so it stays.
pub fn seed_from_keypath(keypath: &[FieldDetails]) -> u64 {
    keypath
        .iter()
        .map(|field| seed_from_key(&field.keypath_element()))
        .sum()
}

fn seed_from_key(key: &str) -> u64 {
    key.chars().map(|character| character as u64).sum()
}
