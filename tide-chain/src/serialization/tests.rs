use std::io::Cursor;

use proptest::prelude::*;

use super::*;

#[test]
fn length_prefix_is_big_endian() {
    let _init_guard = tide_test::init();

    let mut data = Vec::new();
    data.write_bytes(&[0xaa, 0xbb]).expect("vec writes don't fail");
    assert_eq!(data, vec![0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb]);
}

#[test]
fn oversized_length_prefix_is_rejected_before_allocating() {
    let _init_guard = tide_test::init();

    let data = [0xff, 0xff, 0xff, 0xff, 0x00];
    let err = Cursor::new(&data[..])
        .read_bytes()
        .expect_err("length over the message limit");
    assert_eq!(
        err,
        SerializationError::Parse("byte array longer than MAX_TIDE_MESSAGE_LEN")
    );
}

#[test]
fn truncated_data_is_an_io_error() {
    let _init_guard = tide_test::init();

    let data = [0x00, 0x00, 0x00, 0x04, 0x01];
    let err = Cursor::new(&data[..])
        .read_bytes()
        .expect_err("missing bytes");
    assert!(matches!(err, SerializationError::Io(_)));
}

#[test]
fn invalid_option_flag() {
    let _init_guard = tide_test::init();

    let err = Cursor::new(&[0x02][..])
        .read_optional_bytes()
        .expect_err("flag must be 0 or 1");
    assert_eq!(err, SerializationError::Parse("invalid option flag"));
}

proptest! {
    #[test]
    fn string_roundtrip(string in ".{0,64}") {
        let bytes = string.tide_serialize_to_vec().expect("vec writes don't fail");
        let decoded: String = Cursor::new(&bytes).tide_deserialize_into()?;
        prop_assert_eq!(decoded, string);
    }
}
