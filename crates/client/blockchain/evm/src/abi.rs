//! Solidity ABI encoding for the arena contract's three functions and one event.
//!
//! Only the shapes the contract actually returns are supported:
//! a dynamic tuple of strings and `uint256`s, and a two-word event payload.

use client_blockchain_core::{BossState, CharacterState, RawNotification};

use crate::error::AbiError;

const WORD: usize = 32;

/// `getBigBoss()`
pub const GET_BIG_BOSS: [u8; 4] = [0x06, 0x65, 0xf9, 0x61];
/// `attackBoss()`
pub const ATTACK_BOSS: [u8; 4] = [0xd4, 0xf2, 0x4c, 0x5b];
/// `checkIfUserHasNFT()`
pub const CHECK_IF_USER_HAS_NFT: [u8; 4] = [0xc8, 0xcf, 0x27, 0xf4];
/// `AttackComplete(uint256,uint256)`
pub const ATTACK_COMPLETE_TOPIC: &str =
    "0x838ab28464562786a6c4ab2311964b82fa60bd9b14aa7e856af1f3f18d41a414";

/// Calldata for a no-argument function.
pub fn calldata(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Decode `0x`-prefixed hex into bytes.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, AbiError> {
    Ok(hex::decode(value.strip_prefix("0x").unwrap_or(value))?)
}

/// Decode the return value of `getBigBoss()`.
///
/// Layout: `(string name, string imageURI, uint256 hp, uint256 maxHp, uint256 attackDamage)`.
pub fn decode_boss(data: &[u8]) -> Result<BossState, AbiError> {
    let tuple = Tuple::at_offset(data)?;
    let boss = BossState::new(
        tuple.string(0)?,
        tuple.string(1)?,
        tuple.uint(2)?,
        tuple.uint(3)?,
        tuple.uint(4)?,
    )?;
    Ok(boss)
}

/// Decode the return value of `checkIfUserHasNFT()`.
///
/// Layout: `(uint256 characterIndex, string name, string imageURI, uint256 hp,
/// uint256 maxHp, uint256 attackDamage)`. The contract returns an all-empty
/// struct for accounts without a character; that decodes to `None`.
pub fn decode_character(data: &[u8]) -> Result<Option<CharacterState>, AbiError> {
    let tuple = Tuple::at_offset(data)?;
    let name = tuple.string(1)?;
    if name.is_empty() {
        return Ok(None);
    }

    let character = CharacterState::new(
        tuple.uint(0)?,
        name,
        tuple.string(2)?,
        tuple.uint(3)?,
        tuple.uint(4)?,
        tuple.uint(5)?,
    )?;
    Ok(Some(character))
}

/// Decode `AttackComplete(uint256 newBossHp, uint256 newPlayerHp)` log data.
///
/// Missing or oversized words leave the field empty so the consumer can
/// reject the notification as malformed.
pub fn decode_attack_complete(data: &[u8]) -> RawNotification {
    let field = |index: usize| word(data, index).ok().and_then(|w| word_to_u64(w).ok());
    RawNotification {
        boss_hp: field(0),
        player_hp: field(1),
        transaction_id: None,
    }
}

/// Head section of an ABI-encoded dynamic tuple.
struct Tuple<'a> {
    data: &'a [u8],
}

impl<'a> Tuple<'a> {
    /// A dynamic tuple returned on its own is preceded by its offset.
    fn at_offset(data: &'a [u8]) -> Result<Self, AbiError> {
        let offset = word_to_usize(word(data, 0)?)?;
        let data = data.get(offset..).ok_or(AbiError::Truncated {
            needed: offset,
            len: data.len(),
        })?;
        Ok(Self { data })
    }

    fn uint(&self, index: usize) -> Result<u64, AbiError> {
        word_to_u64(word(self.data, index)?)
    }

    fn string(&self, index: usize) -> Result<String, AbiError> {
        let offset = word_to_usize(word(self.data, index)?)?;
        let tail = self.data.get(offset..).ok_or(AbiError::Truncated {
            needed: offset,
            len: self.data.len(),
        })?;
        let len = word_to_usize(word(tail, 0)?)?;
        let end = WORD.checked_add(len).ok_or(AbiError::Overflow)?;
        let bytes = tail.get(WORD..end).ok_or(AbiError::Truncated {
            needed: end,
            len: tail.len(),
        })?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
    }
}

fn word(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    data.get(start..start + WORD).ok_or(AbiError::Truncated {
        needed: start + WORD,
        len: data.len(),
    })
}

fn word_to_u64(word: &[u8]) -> Result<u64, AbiError> {
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|&b| b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(low);
    Ok(u64::from_be_bytes(bytes))
}

fn word_to_usize(word: &[u8]) -> Result<usize, AbiError> {
    usize::try_from(word_to_u64(word)?).map_err(|_| AbiError::Overflow)
}
