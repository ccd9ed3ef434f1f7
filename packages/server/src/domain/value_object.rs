//! Value Objects
//!
//! 不変で、生成時にバリデーションされる値。ドメイン層の他の型はこれらを通して
//! 入力を受け取るため、不正な文字列がドメインに入り込むことはない。

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Room ID の長さ
pub const ROOM_ID_LENGTH: usize = 5;

/// 単語の長さ（固定）
pub const WORD_LENGTH: usize = 5;

/// PlayerId の最大長
pub const PLAYER_ID_MAX_LENGTH: usize = 64;

/// Username の最大長
pub const USERNAME_MAX_LENGTH: usize = 32;

const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ========================================
// RoomId
// ========================================

/// Room の短いコード（5 文字の英大文字・数字）
///
/// 入力は大文字に正規化される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.len() != ROOM_ID_LENGTH
            || !normalized.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(ValueObjectError::InvalidRoomId(value));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId の生成器
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// ランダムな RoomId を生成する（衝突チェックは呼び出し側の責務）
    pub fn generate() -> RoomId {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> RoomId {
        let code: String = (0..ROOM_ID_LENGTH)
            .map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        RoomId(code)
    }
}

// ========================================
// PlayerId
// ========================================

/// 認証済みプレイヤーの ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty()
            || value.len() > PLAYER_ID_MAX_LENGTH
            || value.chars().any(char::is_whitespace)
        {
            return Err(ValueObjectError::InvalidPlayerId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// Username
// ========================================

/// 表示名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > USERNAME_MAX_LENGTH {
            return Err(ValueObjectError::InvalidUsername(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

// ========================================
// ConnectionId
// ========================================

/// WebSocket 接続ごとに払い出される ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ========================================
// Word
// ========================================

/// 5 文字の英単語（大文字に正規化済み）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Word(String);

impl Word {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.chars().count() != WORD_LENGTH
            || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ValueObjectError::InvalidWord(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 各位置の文字（常に WORD_LENGTH 個）
    pub fn letters(&self) -> [u8; WORD_LENGTH] {
        let mut letters = [0u8; WORD_LENGTH];
        letters.copy_from_slice(self.0.as_bytes());
        letters
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// Category
// ========================================

/// 出題カテゴリ（小文字に正規化）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValueObjectError::InvalidCategory(value.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// Timestamp
// ========================================

/// Unix timestamp（JST, milliseconds）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_room_id_is_normalized_to_uppercase() {
        // テスト項目: RoomId は大文字に正規化される
        // given (前提条件):
        let raw = "ab3xy".to_string();

        // when (操作):
        let room_id = RoomId::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "AB3XY");
    }

    #[test]
    fn test_room_id_rejects_wrong_length_and_symbols() {
        // テスト項目: 長さ違い・記号を含む RoomId は拒否される
        // then (期待する結果):
        assert!(RoomId::new("ABCD".to_string()).is_err());
        assert!(RoomId::new("ABCDEF".to_string()).is_err());
        assert!(RoomId::new("AB-XY".to_string()).is_err());
    }

    #[test]
    fn test_room_id_factory_generates_valid_codes() {
        // テスト項目: 生成された RoomId は常に有効な形式である
        // given (前提条件):
        let mut rng = StdRng::seed_from_u64(7);

        // when (操作):
        let ids: Vec<RoomId> = (0..100)
            .map(|_| RoomIdFactory::generate_with(&mut rng))
            .collect();

        // then (期待する結果):
        for id in ids {
            assert!(RoomId::new(id.as_str().to_string()).is_ok());
        }
    }

    #[test]
    fn test_player_id_rejects_blank_and_whitespace() {
        // テスト項目: 空文字・空白を含む PlayerId は拒否される
        // then (期待する結果):
        assert!(PlayerId::new("".to_string()).is_err());
        assert!(PlayerId::new("   ".to_string()).is_err());
        assert!(PlayerId::new("ali ce".to_string()).is_err());
        assert!(PlayerId::new("alice".to_string()).is_ok());
    }

    #[test]
    fn test_username_is_trimmed() {
        // テスト項目: Username は前後の空白が除去される
        // when (操作):
        let username = Username::new("  Alice ".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(username.as_str(), "Alice");
    }

    #[test]
    fn test_word_is_uppercased() {
        // テスト項目: Word は大文字に正規化される
        // when (操作):
        let word = Word::new("crane").unwrap();

        // then (期待する結果):
        assert_eq!(word.as_str(), "CRANE");
        assert_eq!(word.letters(), *b"CRANE");
    }

    #[test]
    fn test_word_rejects_invalid_input() {
        // テスト項目: 5 文字でない、または英字以外を含む単語は拒否される
        // then (期待する結果):
        assert!(Word::new("CRAN").is_err());
        assert!(Word::new("CRANES").is_err());
        assert!(Word::new("CR4NE").is_err());
        assert!(Word::new("").is_err());
    }

    #[test]
    fn test_category_is_lowercased() {
        // テスト項目: Category は小文字に正規化される
        // when (操作):
        let category = Category::new(" Animals ").unwrap();

        // then (期待する結果):
        assert_eq!(category.as_str(), "animals");
    }
}
