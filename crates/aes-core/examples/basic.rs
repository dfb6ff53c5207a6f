//! Encrypts a short message in CBC mode with the experimental S-box and
//! decrypts it again.

use aes_core::{CipherConfig, Context, Key, SboxTable};

fn main() {
    let key = Key::from([0x2bu8; 16]);
    let iv: [u8; 16] = core::array::from_fn(|i| i as u8);
    let config = CipherConfig::with_sbox(SboxTable::EXPERIMENTAL);

    let mut block = [0u8; 32];
    block[..16].copy_from_slice(b"first block here");
    block[16..].copy_from_slice(b"second blockhere");
    let plaintext = block;

    Context::with_iv(&key, &iv, &config)
        .encrypt_cbc(&mut block)
        .expect("32 bytes is block aligned");
    assert_ne!(block, plaintext);

    Context::with_iv(&key, &iv, &config)
        .decrypt_cbc(&mut block)
        .expect("32 bytes is block aligned");
    assert_eq!(block, plaintext);

    println!("example succeeded; CBC round trip recovered the plaintext");
}
