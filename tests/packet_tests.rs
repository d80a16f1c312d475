//! Byte-exact packet tables and codec laws

use rs_dcc::{
    accessory::basic_accessory_packet,
    address::{decode_accessory_address_bytes, encode_accessory_address_bytes, encode_loco_address},
    broadcast::{IDLE, RESET, STOP_ALL},
    checksum, speed, Accessory, DccError, Direction, Loco, Packet, SpeedStepMode, State,
    WireFormat,
};

// ============================================================================
// Broadcast Packets
// ============================================================================

#[test]
fn broadcast_bytes_exact() {
    assert_eq!(RESET.as_bytes(), &[0x00, 0x00, 0x00]);
    assert_eq!(IDLE.as_bytes(), &[0xFF, 0x00, 0xFF]);
    assert_eq!(STOP_ALL.as_bytes(), &[0x00, 0x70, 0x70]);
}

#[test]
fn broadcast_checksums_match_computed() {
    for p in [RESET, IDLE, STOP_ALL] {
        assert_eq!(p.checksum(), checksum::compute(p.data()));
        assert!(p.is_valid());
    }
}

// ============================================================================
// Locomotive Packets
// ============================================================================

#[test]
fn speed_128_step_table() {
    let mut loco = Loco::new(3, SpeedStepMode::Steps128).unwrap();
    let p = loco.speed_and_direction(60, Direction::Forward).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x3F, 0x80 | 61, 0x03 ^ 0x3F ^ (0x80 | 61)]);

    let p = loco.speed_and_direction(-1, Direction::Reverse).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x3F, 0x00, 0x3C]);
}

#[test]
fn speed_28_step_table() {
    let mut loco = Loco::new(3, SpeedStepMode::Steps28).unwrap();
    // speed + 3 = 13 = 0b01101, low bit moves to C
    let p = loco.speed_and_direction(10, Direction::Forward).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x76, 0x75]);

    let p = loco.speed_and_direction(-3, Direction::Forward).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x60, 0x63]);
}

#[test]
fn speed_14_step_shares_28_step_range() {
    let mut loco = Loco::new(3, SpeedStepMode::Steps14).unwrap();
    let p = loco.speed_and_direction(20, Direction::Forward).unwrap();
    // speed + 3 = 23 = 0b10111, low bit moves to C
    assert_eq!(p.as_bytes(), &[0x03, 0x7B, 0x78]);

    let p = loco.speed_and_direction(-3, Direction::Forward).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x60, 0x63]);
    let p = loco.speed_and_direction(28, Direction::Reverse).unwrap();
    assert_eq!(p.as_bytes(), &[0x03, 0x5F, 0x5C]);
}

#[test]
fn function_group_one_table() {
    let mut loco = Loco::new(5, SpeedStepMode::Steps128).unwrap();
    let p = loco.set_function(0, true).unwrap();
    assert_eq!(p.as_bytes(), &[0x05, 0x90, 0x95]);
    let p = loco.set_function(2, true).unwrap();
    assert_eq!(p.as_bytes(), &[0x05, 0x92, 0x97]);
}

#[test]
fn function_set_is_idempotent() {
    let mut loco = Loco::new(5, SpeedStepMode::Steps128).unwrap();
    let first = loco.set_function(3, true).unwrap();
    let second = loco.set_function(3, true).unwrap();
    assert_eq!(first, second);
    assert!(loco.functions().get(3).unwrap());
}

#[test]
fn function_out_of_range_leaves_states() {
    let mut loco = Loco::new(5, SpeedStepMode::Steps128).unwrap();
    loco.set_function(1, true).unwrap();
    loco.set_function(12, true).unwrap();
    let before = *loco.functions();

    assert_eq!(loco.set_function(13, true), Err(DccError::FunctionNotAvailable));
    assert_eq!(*loco.functions(), before);
}

// ============================================================================
// Accessory Packets
// ============================================================================

#[test]
fn accessory_table() {
    // addr 300 = 0b1_0010_1100: low six 101100, high three 100 complemented to 011
    let p = basic_accessory_packet(300, true, 5).unwrap();
    assert_eq!(p.as_bytes()[0], 0b1010_1100);
    assert_eq!(p.as_bytes()[1], 0b1011_1101);
    assert!(p.is_valid());
}

#[test]
fn accessory_address_roundtrip_extremes() {
    for addr in [1u16, 63, 64, 511] {
        let (b1, b2) = encode_accessory_address_bytes(addr, false, 7).unwrap();
        let f = decode_accessory_address_bytes(b1, b2).unwrap();
        assert_eq!(f.address.value(), addr);
        assert!(!f.active);
        assert_eq!(f.sub_state, 7);
    }
}

#[test]
fn accessory_unknown_state_keeps_previous() {
    let mut acc = Accessory::with_states(12, &["closed", "thrown"]).unwrap();
    acc.set_named("thrown").unwrap();
    let (active, sub) = (acc.is_active(), acc.sub_state());

    assert_eq!(acc.set_named("halfway"), Err(DccError::StateNotAvailable));
    assert_eq!(acc.set_state(State::Named(5)), Err(DccError::StateNotAvailable));
    assert_eq!((acc.is_active(), acc.sub_state()), (active, sub));
    assert_eq!(acc.state_name(), Some("thrown"));
}

// ============================================================================
// Codec Laws
// ============================================================================

#[test]
fn loco_address_law() {
    for addr in 1u16..=127 {
        let byte = encode_loco_address(addr).unwrap();
        assert_eq!(byte & 0x80, 0);
        assert_eq!(byte as u16, addr);
    }
    assert_eq!(encode_loco_address(0), Err(DccError::InvalidAddress));
    assert_eq!(encode_loco_address(128), Err(DccError::InvalidAddress));
    assert_eq!(encode_loco_address(255), Err(DccError::InvalidAddress));
}

#[test]
fn speed_128_roundtrip() {
    for s in [-1i16, 0, 1, 63, 126] {
        for dir in [Direction::Forward, Direction::Reverse] {
            let bytes = speed::encode(SpeedStepMode::Steps128, s, dir).unwrap();
            assert_eq!(speed::decode(SpeedStepMode::Steps128, &bytes).unwrap(), (s, dir));
        }
    }
}

#[test]
fn checksum_law_over_generated_packets() {
    let mut loco = Loco::new(99, SpeedStepMode::Steps28).unwrap();
    let mut packets = vec![RESET, IDLE, STOP_ALL];
    for s in -3..=28 {
        packets.push(loco.speed_and_direction(s, Direction::Reverse).unwrap());
    }
    for f in 0..13 {
        packets.push(loco.set_function(f, f % 2 == 0).unwrap());
    }
    for addr in [1u16, 255, 256, 511] {
        packets.push(basic_accessory_packet(addr, true, 3).unwrap());
    }
    for p in packets {
        assert_eq!(p.as_bytes().iter().fold(0, |acc, b| acc ^ b), 0, "{:?}", p);
    }
}

#[test]
fn invalid_input_never_builds_packet() {
    let mut loco = Loco::new(3, SpeedStepMode::Steps14).unwrap();
    assert_eq!(loco.speed_and_direction(29, Direction::Forward), Err(DccError::InvalidSpeed));
    assert_eq!(loco.speed_and_direction(-4, Direction::Forward), Err(DccError::InvalidSpeed));
    assert_eq!(loco.speed(), SpeedStepMode::Steps14.stop());
    assert_eq!(Loco::new(0, SpeedStepMode::Steps28).err(), Some(DccError::InvalidAddress));
    assert_eq!(Accessory::new(512).err(), Some(DccError::InvalidAddress));
    assert_eq!(basic_accessory_packet(1, true, 8), Err(DccError::InvalidSubState));
}

// ============================================================================
// Framing and Wire Rendering
// ============================================================================

#[test]
fn frame_structure() {
    let frame = STOP_ALL.frame(14);
    let bits = frame.bits();
    assert_eq!(frame.len(), 14 + 3 * 9 + 1);
    assert!(bits[..14].all());
    // start bits before each byte
    assert!(!bits[14]);
    assert!(!bits[23]);
    assert!(!bits[32]);
    assert!(bits[frame.len() - 1]);
}

#[test]
fn longer_preamble_shifts_payload() {
    let short = IDLE.frame(14).to_bit_string();
    let long = IDLE.frame(20).to_bit_string();
    assert_eq!(long.len(), short.len() + 6);
    assert!(long.ends_with(short.as_str()));
}

#[test]
fn wire_bytes_format() {
    let wire = Packet::new(&[0x03, 0x60]).unwrap().to_wire(WireFormat::Bytes, 14);
    assert_eq!(wire.as_slice(), &[b'<', 0x03, 0x60, 0x63, b'>']);
}

#[test]
fn wire_ascii_format() {
    let wire = RESET.to_wire(WireFormat::AsciiBits, 14);
    assert_eq!(wire.first(), Some(&b'<'));
    assert_eq!(wire.last(), Some(&b'>'));
    assert_eq!(
        &wire[1..wire.len() - 1],
        b"111111111111110000000000000000000000000001".as_slice()
    );
}
