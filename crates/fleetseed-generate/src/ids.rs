use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Prefixed identifier with a short base-36 suffix, e.g. `car4k9x0q2ab`.
pub fn random_id<R: Rng>(prefix: &str, rng: &mut R) -> String {
    let mut id = String::with_capacity(prefix.len() + ID_SUFFIX_LEN);
    id.push_str(prefix);
    for _ in 0..ID_SUFFIX_LEN {
        let idx = rng.random_range(0..ID_ALPHABET.len());
        id.push(char::from(ID_ALPHABET[idx]));
    }
    id
}
