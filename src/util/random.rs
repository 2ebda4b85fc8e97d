use crate::core::types::RfpToken;
use crate::sso::constants::RFP_TOKEN_BYTES;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for RfpToken {
    fn from_random() -> Self {
        RfpToken(random_bytes(RFP_TOKEN_BYTES))
    }
}

fn random_bytes(size: usize) -> Vec<u8> {
    use rand::RngCore;

    let mut bytes = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
