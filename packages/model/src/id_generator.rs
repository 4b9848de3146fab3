use crate::node::NodeId;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Node id generator: `<type>-<unix millis>-<random base36 suffix>`.
///
/// The suffix keeps ids apart when several nodes of the same type are
/// created within one millisecond.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic suffixes, for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the next id for a node of type `kind`
    pub fn new_id(&mut self, kind: &str) -> NodeId {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[self.rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        NodeId(format!("{}-{}-{}", kind, millis, suffix))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
