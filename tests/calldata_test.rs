//! Call data encoding checked against pinned fixtures and alloy's ABI encoder

use alloy_sol_types::{sol, SolCall};
use merkl_claim::{encode_claim_hex, parse_address, ClaimCall, ClaimError, B256, CLAIM_SELECTOR, U256};

sol! {
    function claim(address[] users, address[] tokens, uint256[] amounts, bytes32[][] proofs);
}

const USER: &str = "0x1111111111111111111111111111111111111111";
const TOKEN: &str = "0xAB067d0832D40619EF445B7fAE510f5Da606Ab0A";

const GOLDEN: &str = concat!(
    "0x71ee95c0",
    "0000000000000000000000000000000000000000000000000000000000000080",
    "00000000000000000000000000000000000000000000000000000000000000c0",
    "0000000000000000000000000000000000000000000000000000000000000100",
    "0000000000000000000000000000000000000000000000000000000000000140",
    "0000000000000000000000000000000000000000000000000000000000000001",
    "0000000000000000000000001111111111111111111111111111111111111111",
    "0000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000ab067d0832d40619ef445b7fae510f5da606ab0a",
    "0000000000000000000000000000000000000000000000000000000000000001",
    "00000000000000000000000000000000000000000000000000000000000f4240",
    "0000000000000000000000000000000000000000000000000000000000000001",
    "0000000000000000000000000000000000000000000000000000000000000020",
    "0000000000000000000000000000000000000000000000000000000000000002",
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
    "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
);

fn fixture_proof() -> Vec<String> {
    vec![format!("0x{}", "aa".repeat(32)), format!("0x{}", "bb".repeat(32))]
}

fn reference_encoding(call: &ClaimCall) -> Vec<u8> {
    claimCall {
        users: vec![call.user],
        tokens: vec![call.token],
        amounts: vec![call.amount],
        proofs: vec![call.proof.clone()],
    }
    .abi_encode()
}

#[test]
fn test_golden_fixture() {
    let data = encode_claim_hex(USER, TOKEN, "1000000", &fixture_proof()).unwrap();
    assert_eq!(data, GOLDEN);
    assert_eq!((data.len() - 2) / 2, 4 + 15 * 32);
}

#[test]
fn test_selector_matches_canonical_signature() {
    assert_eq!(CLAIM_SELECTOR, claimCall::SELECTOR);
}

#[test]
fn test_matches_reference_encoder() {
    let user = parse_address(USER).unwrap();
    let token = parse_address(TOKEN).unwrap();

    for len in [0usize, 1, 2, 50] {
        let proof: Vec<B256> = (0..len).map(|i| B256::repeat_byte(i as u8 + 1)).collect();
        for amount in [U256::ZERO, U256::from(1_000_000u64), U256::MAX] {
            let call = ClaimCall::new(user, token, amount, proof.clone());
            assert_eq!(
                call.encode().to_vec(),
                reference_encoding(&call),
                "proof length {}, amount {}",
                len,
                amount
            );
        }
    }
}

#[test]
fn test_reference_encoding_decodes() {
    let call = ClaimCall::from_strs(USER, TOKEN, "123456789", &fixture_proof()).unwrap();
    let decoded = ClaimCall::decode(&reference_encoding(&call)).unwrap();
    assert_eq!(decoded, call);
}

#[test]
fn test_address_case_does_not_change_output() {
    let upper_token = TOKEN.to_uppercase().replacen("0X", "0x", 1);
    let upper = encode_claim_hex(USER, &upper_token, "1", &fixture_proof()).unwrap();
    let lower = encode_claim_hex(USER, &TOKEN.to_lowercase(), "1", &fixture_proof()).unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, upper.to_lowercase());
}

#[test]
fn test_hex_amount_equals_decimal_amount() {
    let decimal = encode_claim_hex(USER, TOKEN, "1000000", &fixture_proof()).unwrap();
    let hex = encode_claim_hex(USER, TOKEN, "0xF4240", &fixture_proof()).unwrap();
    assert_eq!(decimal, hex);
}

#[test]
fn test_malformed_inputs_produce_no_output() {
    let proof = fixture_proof();
    let short_proof = vec![format!("0x{}", "aa".repeat(31))];
    let long_proof = vec![format!("0x{}", "aa".repeat(33))];
    let over = format!("0x1{}", "0".repeat(64));

    let cases: Vec<(&str, &str, &str, &[String])> = vec![
        ("0x111111111111111111111111111111111111111", TOKEN, "1", proof.as_slice()),
        (USER, "0xAB067d0832D40619EF445B7fAE510f5Da606Ab0A00", "1", proof.as_slice()),
        (USER, TOKEN, "-1", proof.as_slice()),
        (USER, TOKEN, "1.0", proof.as_slice()),
        (USER, TOKEN, over.as_str(), proof.as_slice()),
        (USER, TOKEN, "1", short_proof.as_slice()),
        (USER, TOKEN, "1", long_proof.as_slice()),
    ];

    for (user, token, amount, proof) in cases {
        let result = encode_claim_hex(user, token, amount, proof);
        assert!(
            matches!(result, Err(ClaimError::InvalidInput(_))),
            "expected InvalidInput for ({}, {}, {}, {:?}), got {:?}",
            user,
            token,
            amount,
            proof,
            result
        );
    }
}
