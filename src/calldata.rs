//! Call data for the distributor's `claim(address[],address[],uint256[],bytes32[][])`
//! entry point, built by hand for one user claiming one token.
//!
//! Only the single-entry shape is supported. The four head offsets are
//! constants for that shape (each of the first three arrays is a length word
//! plus one element), so only the proofs tail varies in size. Claiming for
//! several users or tokens in one call needs a general ABI encoder instead.
//!
//! Layout after the 4-byte selector, one 32-byte word per row:
//!
//! ```text
//! 0x80 0xc0 0x100 0x140         head offsets (users, tokens, amounts, proofs)
//! 1 user                        users
//! 1 token                       tokens
//! 1 amount                      amounts
//! 1 0x20 n proof[0..n]          proofs (one inner bytes32[] of n elements)
//! ```

use alloy_primitives::{Address, Bytes, B256, U256};
use num_bigint::{BigInt, Sign};

use crate::error::{ClaimError, Result};

/// First four bytes of `keccak256("claim(address[],address[],uint256[],bytes32[][])")`.
///
/// Kept as a literal: the distributor ABI is fixed, so a different contract
/// version needs this value re-derived by hand.
pub const CLAIM_SELECTOR: [u8; 4] = [0x71, 0xee, 0x95, 0xc0];

/// ABI word size in bytes
pub const WORD: usize = 32;

const USERS_OFFSET: u64 = 0x80;
const TOKENS_OFFSET: u64 = 0xc0;
const AMOUNTS_OFFSET: u64 = 0x100;
const PROOFS_OFFSET: u64 = 0x140;
const INNER_PROOF_OFFSET: u64 = 0x20;

/// Words preceding the proof elements: 4 heads, 3 x (length + element), proofs envelope.
const FIXED_WORDS: usize = 4 + 3 * 2 + 3;

/// A single-user, single-token distributor claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCall {
    pub user: Address,
    pub token: Address,
    pub amount: U256,
    /// Merkle path from leaf to root, order preserved as received
    pub proof: Vec<B256>,
}

impl ClaimCall {
    pub fn new(user: Address, token: Address, amount: U256, proof: Vec<B256>) -> Self {
        Self { user, token, amount, proof }
    }

    /// Build a claim from the string forms returned by the rewards API
    pub fn from_strs<S: AsRef<str>>(
        user: &str,
        token: &str,
        amount: &str,
        proof: &[S],
    ) -> Result<Self> {
        let user = parse_address(user)?;
        let token = parse_address(token)?;
        let amount = parse_amount(amount)?;
        let proof = parse_proofs(proof)?;

        Ok(Self::new(user, token, amount, proof))
    }

    /// Total call data size for a proof of `proof_len` elements
    pub const fn encoded_len(proof_len: usize) -> usize {
        CLAIM_SELECTOR.len() + (FIXED_WORDS + proof_len) * WORD
    }

    /// Encode selector, head and tail into the exact bytes the distributor expects
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(Self::encoded_len(self.proof.len()));
        out.extend_from_slice(&CLAIM_SELECTOR);

        for offset in [USERS_OFFSET, TOKENS_OFFSET, AMOUNTS_OFFSET, PROOFS_OFFSET] {
            out.extend_from_slice(&word(offset));
        }

        out.extend_from_slice(&word(1));
        out.extend_from_slice(self.user.into_word().as_slice());

        out.extend_from_slice(&word(1));
        out.extend_from_slice(self.token.into_word().as_slice());

        out.extend_from_slice(&word(1));
        out.extend_from_slice(&self.amount.to_be_bytes::<WORD>());

        out.extend_from_slice(&word(1));
        out.extend_from_slice(&word(INNER_PROOF_OFFSET));
        out.extend_from_slice(&word(self.proof.len() as u64));
        for element in &self.proof {
            out.extend_from_slice(element.as_slice());
        }

        debug_assert_eq!(out.len(), Self::encoded_len(self.proof.len()));
        Bytes::from(out)
    }

    /// Encode as a `0x`-prefixed lower-case hex string
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Parse `0x`-prefixed hex call data, see [`ClaimCall::decode`]
    pub fn decode_hex(input: &str) -> Result<Self> {
        let digits = strip_hex_prefix(input.trim()).ok_or_else(|| {
            ClaimError::invalid_input(format!("call data must be 0x-prefixed hex: {:?}", input))
        })?;
        let data = hex::decode(digits)
            .map_err(|e| ClaimError::invalid_input(format!("call data is not valid hex: {}", e)))?;
        Self::decode(&data)
    }

    /// Parse call data produced by [`ClaimCall::encode`].
    ///
    /// Anything that deviates from the single-entry layout is rejected,
    /// including calls that are valid ABI for the same function but claim
    /// for several users.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < Self::encoded_len(0) {
            return Err(ClaimError::invalid_input(format!(
                "call data too short: {} bytes, need at least {}",
                data.len(),
                Self::encoded_len(0)
            )));
        }

        let (selector, args) = data.split_at(CLAIM_SELECTOR.len());
        if selector != &CLAIM_SELECTOR[..] {
            return Err(ClaimError::invalid_input(format!(
                "unexpected selector 0x{}",
                hex::encode(selector)
            )));
        }
        if args.len() % WORD != 0 {
            return Err(ClaimError::invalid_input(format!(
                "argument section is {} bytes, not a multiple of {}",
                args.len(),
                WORD
            )));
        }

        let words: Vec<&[u8]> = args.chunks(WORD).collect();
        let expect_word = |index: usize, value: u64, what: &str| -> Result<()> {
            if words[index] != &word(value)[..] {
                return Err(ClaimError::invalid_input(format!(
                    "{} at word {} is 0x{}, expected {:#x}",
                    what,
                    index,
                    hex::encode(words[index]),
                    value
                )));
            }
            Ok(())
        };

        expect_word(0, USERS_OFFSET, "users offset")?;
        expect_word(1, TOKENS_OFFSET, "tokens offset")?;
        expect_word(2, AMOUNTS_OFFSET, "amounts offset")?;
        expect_word(3, PROOFS_OFFSET, "proofs offset")?;

        expect_word(4, 1, "users length")?;
        let user = word_to_address(words[5], "user")?;

        expect_word(6, 1, "tokens length")?;
        let token = word_to_address(words[7], "token")?;

        expect_word(8, 1, "amounts length")?;
        let amount = U256::from_be_slice(words[9]);

        expect_word(10, 1, "proofs length")?;
        expect_word(11, INNER_PROOF_OFFSET, "inner proof offset")?;

        let proof_len = U256::from_be_slice(words[12]);
        let available = words.len() - FIXED_WORDS;
        if proof_len != U256::from(available) {
            return Err(ClaimError::invalid_input(format!(
                "proof length word is {}, but {} proof words follow",
                proof_len, available
            )));
        }

        let proof = words[FIXED_WORDS..]
            .iter()
            .map(|w| B256::from_slice(w))
            .collect();

        Ok(Self::new(user, token, amount, proof))
    }
}

/// Encode a claim from string inputs into `0x`-prefixed hex call data
pub fn encode_claim_hex<S: AsRef<str>>(
    user: &str,
    token: &str,
    amount: &str,
    proof: &[S],
) -> Result<String> {
    Ok(ClaimCall::from_strs(user, token, amount, proof)?.encode_hex())
}

/// Parse a `0x`-prefixed, 40 hex digit address (any letter case)
pub fn parse_address(input: &str) -> Result<Address> {
    decode_fixed_hex::<20>(input, "address").map(Address::from)
}

/// Parse a `0x`-prefixed, 64 hex digit proof element
pub fn parse_proof(input: &str) -> Result<B256> {
    decode_fixed_hex::<32>(input, "proof element").map(B256::from)
}

/// Parse every proof element, keeping order
pub fn parse_proofs<S: AsRef<str>>(proof: &[S]) -> Result<Vec<B256>> {
    proof
        .iter()
        .enumerate()
        .map(|(i, element)| {
            parse_proof(element.as_ref()).map_err(|e| match e {
                ClaimError::InvalidInput(msg) => {
                    ClaimError::InvalidInput(format!("proof[{}]: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Parse a reward amount given as decimal digits or `0x`-prefixed hex.
///
/// The value is parsed at arbitrary precision first, so negative numbers and
/// anything at or above 2^256 are reported instead of wrapping.
pub fn parse_amount(input: &str) -> Result<U256> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (radix, digits) = match strip_hex_prefix(unsigned) {
        Some(rest) => (16, rest),
        None => (10, unsigned),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ClaimError::invalid_input(format!(
            "amount is not an integer: {:?}",
            input
        )));
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| {
        ClaimError::invalid_input(format!("amount is not an integer: {:?}", input))
    })?;
    let value = if negative { -magnitude } else { magnitude };

    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus {
        return Err(ClaimError::invalid_input(format!(
            "amount must not be negative: {:?}",
            input
        )));
    }
    if bytes.len() > WORD {
        return Err(ClaimError::invalid_input(format!(
            "amount does not fit in 256 bits: {:?}",
            input
        )));
    }

    Ok(U256::from_be_slice(&bytes))
}

fn strip_hex_prefix(input: &str) -> Option<&str> {
    input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"))
}

fn decode_fixed_hex<const N: usize>(input: &str, what: &str) -> Result<[u8; N]> {
    let digits = strip_hex_prefix(input).ok_or_else(|| {
        ClaimError::invalid_input(format!("{} must be 0x-prefixed hex: {:?}", what, input))
    })?;

    if digits.len() != N * 2 {
        return Err(ClaimError::invalid_input(format!(
            "{} must be {} bytes ({} hex digits), got {} hex digits: {:?}",
            what,
            N,
            N * 2,
            digits.len(),
            input
        )));
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| {
        ClaimError::invalid_input(format!("{} is not valid hex ({}): {:?}", what, e, input))
    })?;

    Ok(out)
}

fn word(value: u64) -> [u8; WORD] {
    U256::from(value).to_be_bytes::<WORD>()
}

fn word_to_address(word: &[u8], what: &str) -> Result<Address> {
    let (padding, address) = word.split_at(WORD - 20);
    if padding.iter().any(|b| *b != 0) {
        return Err(ClaimError::invalid_input(format!(
            "{} word has non-zero padding: 0x{}",
            what,
            hex::encode(word)
        )));
    }
    Ok(Address::from_slice(address))
}
