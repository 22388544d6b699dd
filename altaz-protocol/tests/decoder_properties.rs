use altaz_protocol::{CommandDecoder, MountCommand};
use proptest::prelude::*;

fn decode_all(chunks: &[&[u8]]) -> Vec<MountCommand> {
    let mut decoder = CommandDecoder::new();
    let mut out = Vec::new();
    for chunk in chunks {
        for &b in chunk.iter() {
            if let Some(cmd) = decoder.feed(b) {
                out.push(cmd);
            }
        }
    }
    out
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let mut decoder = CommandDecoder::new();
        for b in bytes {
            if let Some(cmd) = decoder.feed(b) {
                prop_assert!(cmd.azimuth_deg.is_finite());
                prop_assert!(cmd.altitude_deg.is_finite());
            }
        }
        let stats = decoder.stats();
        prop_assert_eq!(stats.records, stats.commands + stats.dropped);
    }

    #[test]
    fn chunking_does_not_change_decoded_commands(
        az in -720i32..720,
        alt in -90i32..90,
        split in 0usize..40,
    ) {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"noise\r\n");
        stream.extend_from_slice(format!("AZ:{}ALT:{}\r\n", az, alt).as_bytes());
        stream.extend_from_slice(b"ALT:5\n");

        let split = split.min(stream.len());
        let whole = decode_all(&[&stream]);
        let (a, b) = stream.split_at(split);
        let chunked = decode_all(&[a, b]);

        prop_assert_eq!(&whole, &chunked);
        prop_assert_eq!(whole, vec![MountCommand::new(az as f32, alt as f32)]);
    }
}
