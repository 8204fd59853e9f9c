pub mod alphabet;

pub use alphabet::{Alphabet, PADDING};

pub static BASE64_ALPHABET: Alphabet<64> = match Alphabet::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/") {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("Could not build alphabet"),
};

pub fn encode_table() -> [char; 64] {
    BASE64_ALPHABET.encode_table()
}

pub fn decode_table() -> &'static [Option<u8>; 128] {
    BASE64_ALPHABET.decode_table()
}

#[cfg(test)]
mod tests {
    use super::{decode_table, encode_table};

    #[test]
    fn encode_table_order() {
        let table = encode_table();
        assert_eq!(table[0], 'A');
        assert_eq!(table[25], 'Z');
        assert_eq!(table[26], 'a');
        assert_eq!(table[51], 'z');
        assert_eq!(table[52], '0');
        assert_eq!(table[61], '9');
        assert_eq!(table[62], '+');
        assert_eq!(table[63], '/');
    }

    #[test]
    fn tables_are_inverse() {
        let encode = encode_table();
        let decode = decode_table();
        for value in 0..64 {
            assert_eq!(decode[encode[value] as usize], Some(value as u8));
        }
        assert_eq!(decode.iter().filter(|value| value.is_some()).count(), 64);
        assert_eq!(decode[b'=' as usize], None);
    }
}
