//! Coupon Codes
//!
//! Codes are derived deterministically from a campaign id and a pool index:
//! the pair is packed into a single 128-bit block, run through AES-128 under a
//! key derived from the campaign id, and the output bytes are rendered as one
//! digit, one syllable, and an eight symbol body drawn from both alphabets.
//!
//! The cipher only scrambles the sequence; the key is derivable from the
//! campaign id, so codes carry no secrecy.

use aes::{
    Aes128,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};
use mockall::automock;
use thiserror::Error;

use crate::domain::coupons::models::CampaignId;

/// Leading digit alphabet.
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Leading syllable alphabet.
pub const SYLLABLES: [char; 28] = [
    '가', '나', '다', '라', '마', '바', '사', '아', '자', '차', '카', '타', '파', '하', '거', '너',
    '더', '러', '머', '버', '서', '어', '저', '처', '커', '터', '퍼', '허',
];

/// Body alphabet: digits followed by syllables.
pub const SYMBOLS: [char; 38] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '가', '나', '다', '라', '마', '바', '사', '아',
    '자', '차', '카', '타', '파', '하', '거', '너', '더', '러', '머', '버', '서', '어', '저', '처',
    '커', '터', '퍼', '허',
];

/// Number of symbols in every generated code.
pub const CODE_LENGTH: usize = 10;

const BODY_LENGTH: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// Pool indices occupy the low 32 bits of the block.
    #[error("coupon index {0} does not fit in 32 bits")]
    IndexOutOfRange(u64),
}

/// Maps a campaign and pool index to a display code.
#[automock]
pub trait CodeGenerator: Send + Sync {
    /// Derive the code for the `index`th coupon of `campaign`.
    fn generate(&self, campaign: CampaignId, index: u64) -> Result<String, CodeError>;
}

/// AES-128 backed [`CodeGenerator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCipherCodes;

impl BlockCipherCodes {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CodeGenerator for BlockCipherCodes {
    fn generate(&self, campaign: CampaignId, index: u64) -> Result<String, CodeError> {
        if index > u64::from(u32::MAX) {
            return Err(CodeError::IndexOutOfRange(index));
        }

        let sequence = campaign.sequence();
        let block = permute(campaign_key(sequence), (sequence << 32) | index);

        Ok(render(block))
    }
}

/// Per-campaign key. A salt, not a secret.
fn campaign_key(sequence: u64) -> [u8; 16] {
    let mut key = [0_u8; 16];

    for (position, byte) in (0_u64..).zip(key.iter_mut()) {
        let mixed = (sequence >> (position % 8)) ^ (position * 7);

        *byte = mixed.to_le_bytes()[0];
    }

    key
}

fn permute(key: [u8; 16], sequence: u64) -> [u8; 16] {
    let mut plain = [0_u8; 16];

    for (slot, byte) in plain.iter_mut().skip(8).zip(sequence.to_be_bytes()) {
        *slot = byte;
    }

    let cipher = Aes128::new(&GenericArray::from(key));
    let mut block = GenericArray::from(plain);

    cipher.encrypt_block(&mut block);

    block.into()
}

#[expect(
    clippy::indexing_slicing,
    reason = "every index is reduced modulo the length of the alphabet it addresses"
)]
fn render(block: [u8; 16]) -> String {
    let [digit, syllable, _, _, _, _, _, _, body @ ..] = block;

    let mut value = u64::from_be_bytes(body);
    let mut symbols = [SYMBOLS[0]; BODY_LENGTH];

    for symbol in symbols.iter_mut().rev() {
        *symbol = SYMBOLS[usize::try_from(value % 38).unwrap_or_default()];
        value /= 38;
    }

    let mut code = String::with_capacity(CODE_LENGTH * 3);

    code.push(DIGITS[usize::from(digit % 10)]);
    code.push(SYLLABLES[usize::from(syllable % 28)]);
    code.extend(symbols);

    code
}
