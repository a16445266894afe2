use image::{ImageBuffer, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use stegbit::{
    analyze_cover, decode, encode, hide_payload, recover_payload, ContainerKind, SecurityToken,
    StegConfig, StegError,
};
use tempfile::tempdir;

fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill(&mut bytes[..]);
    bytes
}

fn write_wav(path: &Path, data_len: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(44 + data_len);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.resize(44, 0x11);
    bytes.extend(noise(data_len, 3));
    fs::write(path, &bytes).unwrap();
    bytes
}

fn only_lsb_differs(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x & 0xFE == y & 0xFE)
}

#[test]
fn wav_helloworld_scenario() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.wav");
    let payload = dir.path().join("hello.txt");
    let carrier = dir.path().join("carrier.wav");

    let cover_bytes = write_wav(&cover, 10_000);
    fs::write(&payload, b"HELLOWORLD").unwrap();

    let report = encode(&cover, &payload, &carrier, &SecurityToken::Int(42)).unwrap();
    assert_eq!(report.descriptor.kind, ContainerKind::Wav);
    assert_eq!(report.descriptor.start_offset, 44);

    let carrier_bytes = fs::read(&carrier).unwrap();
    assert_eq!(carrier_bytes.len(), cover_bytes.len());
    assert_eq!(&carrier_bytes[..44], &cover_bytes[..44]);
    // 12 header bytes + 10 payload bytes, 8 cover bytes each
    assert!(only_lsb_differs(&carrier_bytes[44..44 + 176], &cover_bytes[44..44 + 176]));
    assert_eq!(&carrier_bytes[44 + 176..], &cover_bytes[44 + 176..]);

    let recovered = dir.path().join("recovered.txt");
    decode(&carrier, &recovered, &SecurityToken::Int(42)).unwrap();
    assert_eq!(fs::read(&recovered).unwrap(), b"HELLOWORLD");

    let wrong = dir.path().join("wrong.txt");
    assert!(matches!(
        decode(&carrier, &wrong, &SecurityToken::Int(43)),
        Err(StegError::InvalidKey)
    ));
    assert!(!wrong.exists());

    let truncated = dir.path().join("truncated.wav");
    fs::write(&truncated, &carrier_bytes[..50]).unwrap();
    assert!(matches!(
        decode(&truncated, &dir.path().join("t.txt"), &SecurityToken::Int(42)),
        Err(StegError::InsufficientBytes { .. })
    ));
}

#[test]
fn capacity_boundary_is_exact() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.txt");
    let payload = dir.path().join("payload.bin");
    fs::write(&cover, noise(1000, 11)).unwrap();

    let token = SecurityToken::Long(-5);
    let analysis = analyze_cover(&cover, &token, &StegConfig::default(), None).unwrap();
    // floor(1000 / 8) - 16
    assert_eq!(analysis.max_payload_bytes, 109);
    assert!(analysis.fits(109));
    assert!(!analysis.fits(110));

    fs::write(&payload, noise(109, 12)).unwrap();
    let carrier = dir.path().join("fits.txt");
    encode(&cover, &payload, &carrier, &token).unwrap();
    let recovered = dir.path().join("fits.bin");
    decode(&carrier, &recovered, &token).unwrap();
    assert_eq!(fs::read(&recovered).unwrap(), fs::read(&payload).unwrap());

    fs::write(&payload, noise(110, 12)).unwrap();
    let overflow = dir.path().join("overflow.txt");
    assert!(matches!(
        encode(&cover, &payload, &overflow, &token),
        Err(StegError::InsufficientMemory { .. })
    ));
    assert!(!overflow.exists());
}

#[test]
fn offset_shifts_the_embedded_region() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.txt");
    let payload = dir.path().join("payload.bin");
    let carrier = dir.path().join("carrier.txt");
    let cover_bytes = noise(3000, 21);
    fs::write(&cover, &cover_bytes).unwrap();
    fs::write(&payload, b"offset payload").unwrap();

    let config = StegConfig::default().with_offset(777).unwrap();
    let token = SecurityToken::Float(0.5);
    hide_payload(&cover, &payload, &carrier, &token, &config, None).unwrap();

    let carrier_bytes = fs::read(&carrier).unwrap();
    assert_eq!(&carrier_bytes[..777], &cover_bytes[..777]);

    let recovered = dir.path().join("recovered.bin");
    recover_payload(&carrier, &recovered, &token, &config, None).unwrap();
    assert_eq!(fs::read(&recovered).unwrap(), b"offset payload");

    // Without the offset the header lands somewhere else entirely
    let misaligned = recover_payload(
        &carrier,
        &dir.path().join("misaligned.bin"),
        &token,
        &StegConfig::default(),
        None,
    );
    assert!(misaligned.is_err());
}

#[test]
fn mp4_embeds_only_inside_mdat() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("clip.mp4");
    let payload = dir.path().join("payload.bin");
    let carrier = dir.path().join("carrier.mp4");

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&16u32.to_be_bytes());
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0, 0, 2, 0]);
    bytes.extend_from_slice(&(8u32 + 2000).to_be_bytes());
    bytes.extend_from_slice(b"mdat");
    bytes.extend(noise(2000, 31));
    bytes.extend_from_slice(&108u32.to_be_bytes());
    bytes.extend_from_slice(b"moov");
    bytes.extend(noise(100, 32));
    fs::write(&cover, &bytes).unwrap();

    let payload_bytes = noise(200, 33);
    fs::write(&payload, &payload_bytes).unwrap();

    let token = SecurityToken::Password("clip key".into());
    let report = encode(&cover, &payload, &carrier, &token).unwrap();
    assert_eq!(report.descriptor.start_offset, 24);
    assert_eq!(report.descriptor.capacity_bytes, 2000);

    let carrier_bytes = fs::read(&carrier).unwrap();
    assert_eq!(carrier_bytes.len(), bytes.len());
    assert_eq!(&carrier_bytes[..24], &bytes[..24]);
    assert!(only_lsb_differs(&carrier_bytes[24..2024], &bytes[24..2024]));
    assert_eq!(&carrier_bytes[2024..], &bytes[2024..]);

    let recovered = dir.path().join("recovered.bin");
    decode(&carrier, &recovered, &token).unwrap();
    assert_eq!(fs::read(&recovered).unwrap(), payload_bytes);
}

#[test]
fn mp4_without_mdat_is_rejected() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("clip.mp4");
    let payload = dir.path().join("payload.bin");
    fs::write(&cover, noise(4096, 41).iter().map(|b| b & 0x3F).collect::<Vec<_>>()).unwrap();
    fs::write(&payload, b"x").unwrap();

    assert!(matches!(
        encode(&cover, &payload, &dir.path().join("out.mp4"), &SecurityToken::Int(1)),
        Err(StegError::FormatNotFound(_))
    ));
}

#[test]
fn png_changes_only_raster_lsbs() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    let payload = dir.path().join("payload.bin");
    let carrier = dir.path().join("carrier.png");

    let pixels = noise(40 * 30 * 3, 51);
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(40, 30, pixels).unwrap();
    image.save(&cover).unwrap();

    let payload_bytes = noise(200, 52);
    fs::write(&payload, &payload_bytes).unwrap();

    let token = SecurityToken::Double(-1.75);
    let report = encode(&cover, &payload, &carrier, &token).unwrap();
    assert_eq!(report.descriptor.capacity_bytes, 3600);

    let before = image::open(&cover).unwrap().to_rgb8();
    let after = image::open(&carrier).unwrap().to_rgb8();
    assert_eq!(before.dimensions(), after.dimensions());
    assert!(only_lsb_differs(before.as_raw(), after.as_raw()));
    assert_ne!(before.as_raw(), after.as_raw());

    let recovered = dir.path().join("recovered.bin");
    decode(&carrier, &recovered, &token).unwrap();
    assert_eq!(fs::read(&recovered).unwrap(), payload_bytes);
}

#[test]
fn password_and_float_tokens_gate_decoding() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.txt");
    let payload = dir.path().join("payload.bin");
    fs::write(&cover, noise(4000, 61)).unwrap();
    fs::write(&payload, b"tokens").unwrap();

    let cases = [
        (SecurityToken::Password("hunter2".into()), SecurityToken::Password("hunter3".into())),
        (SecurityToken::Password("abc".into()), SecurityToken::Password("abcd".into())),
        (SecurityToken::Float(f32::NAN), SecurityToken::Float(1.0)),
        (SecurityToken::Double(0.0), SecurityToken::Double(-0.0)),
        (SecurityToken::Long(i64::MIN), SecurityToken::Long(i64::MAX)),
    ];

    for (i, (right, wrong)) in cases.iter().enumerate() {
        let carrier = dir.path().join(format!("carrier{}.txt", i));
        encode(&cover, &payload, &carrier, right).unwrap();

        let recovered = dir.path().join(format!("recovered{}.bin", i));
        decode(&carrier, &recovered, right).unwrap();
        assert_eq!(fs::read(&recovered).unwrap(), b"tokens");

        assert!(matches!(
            decode(&carrier, &dir.path().join(format!("wrong{}.bin", i)), wrong),
            Err(StegError::InvalidKey)
        ));
    }
}

#[test]
fn empty_payload_roundtrips() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("cover.txt");
    let payload = dir.path().join("empty.bin");
    let carrier = dir.path().join("carrier.txt");
    fs::write(&cover, noise(96, 71)).unwrap();
    fs::write(&payload, b"").unwrap();

    // 12 header bytes fill the 96-byte cover exactly
    encode(&cover, &payload, &carrier, &SecurityToken::Int(5)).unwrap();
    let recovered = dir.path().join("recovered.bin");
    let report = decode(&carrier, &recovered, &SecurityToken::Int(5)).unwrap();
    assert_eq!(report.stats.payload_bytes, 0);
    assert!(fs::read(&recovered).unwrap().is_empty());
}

#[test]
fn unsupported_and_missing_files() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("photo.jpeg");
    let payload = dir.path().join("payload.bin");
    fs::write(&cover, noise(1000, 81)).unwrap();
    fs::write(&payload, b"x").unwrap();

    assert!(matches!(
        encode(&cover, &payload, &dir.path().join("out.jpeg"), &SecurityToken::Int(1)),
        Err(StegError::UnsupportedFileFormat(ext)) if ext == "jpeg"
    ));

    let missing = dir.path().join("missing.txt");
    let err = decode(&missing, &dir.path().join("out.bin"), &SecurityToken::Int(1)).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("The system cannot find the source file specified"));
}

#[test]
fn png_with_impossible_dimensions_is_an_error() {
    let dir = tempdir().unwrap();
    let cover = dir.path().join("huge.png");

    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&u32::MAX.to_be_bytes());
    bytes.extend_from_slice(&u32::MAX.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    fs::write(&cover, &bytes).unwrap();

    assert!(matches!(
        analyze_cover(&cover, &SecurityToken::Int(1), &StegConfig::default(), None),
        Err(StegError::FormatNotFound(_))
    ));
    assert!(matches!(
        decode(&cover, &dir.path().join("out.bin"), &SecurityToken::Int(1)),
        Err(StegError::FormatNotFound(_))
    ));
}
