//! 組み込み単語リストを使った WordSupplier 実装

use std::collections::BTreeMap;

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tokio::sync::Mutex;

use crate::domain::{Category, Word, WordSupplier, WordSupplyError};

const BUILTIN_WORDS: &[(&str, &[&str])] = &[
    (
        "animals",
        &[
            "BISON", "CAMEL", "EAGLE", "HORSE", "KOALA", "LEMUR", "MOOSE", "OTTER", "PANDA",
            "SHEEP", "SKUNK", "TIGER", "WHALE", "ZEBRA",
        ],
    ),
    (
        "food",
        &[
            "APPLE", "BACON", "BREAD", "CANDY", "CREPE", "GRAPE", "LEMON", "MANGO", "OLIVE",
            "PASTA", "PEACH", "PIZZA", "SALAD", "TOAST",
        ],
    ),
    (
        "nature",
        &[
            "BEACH", "BROOK", "CLOUD", "CORAL", "FIELD", "FROST", "GRASS", "OCEAN", "RIVER",
            "STONE", "STORM", "SWAMP",
        ],
    ),
    (
        "objects",
        &[
            "CHAIR", "CLOCK", "CRANE", "KNIFE", "LAMPS", "PAPER", "PIANO", "SHELF", "SPOON",
            "TABLE", "TORCH", "WATCH",
        ],
    ),
];

/// カテゴリ別の単語リストからランダムに出題する WordSupplier
///
/// `seed` を指定すると出題順が決定的になる（テスト用）。
pub struct BuiltinWordSupplier {
    words: BTreeMap<Category, Vec<Word>>,
    rng: Mutex<StdRng>,
}

impl BuiltinWordSupplier {
    /// 組み込みの単語リストで作成
    pub fn new(seed: Option<u64>) -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .filter_map(|(category, words)| {
                let category = Category::new(category).ok()?;
                let words = words.iter().filter_map(|w| Word::new(w).ok()).collect();
                Some((category, words))
            })
            .collect();
        Self::with_words(words, seed)
    }

    /// 任意の単語リストで作成
    pub fn with_words(words: BTreeMap<Category, Vec<Word>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            words,
            rng: Mutex::new(rng),
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.words.keys().cloned().collect()
    }
}

impl Default for BuiltinWordSupplier {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl WordSupplier for BuiltinWordSupplier {
    async fn random_word(
        &self,
        category: Option<Category>,
    ) -> Result<(Word, Category), WordSupplyError> {
        let mut rng = self.rng.lock().await;

        let category = match category {
            Some(category) => {
                if !self.words.contains_key(&category) {
                    return Err(WordSupplyError::UnknownCategory(category.to_string()));
                }
                category
            }
            None => {
                let categories: Vec<&Category> = self.words.keys().collect();
                categories
                    .choose(&mut *rng)
                    .map(|c| (*c).clone())
                    .ok_or_else(|| WordSupplyError::Unavailable("no categories".to_string()))?
            }
        };

        let word = self
            .words
            .get(&category)
            .and_then(|words| words.choose(&mut *rng))
            .cloned()
            .ok_or_else(|| {
                WordSupplyError::Unavailable(format!("category '{}' has no words", category))
            })?;

        tracing::debug!("Drew a word from category '{}'", category);
        Ok((word, category))
    }

    async fn is_valid_word(
        &self,
        word: &Word,
        category: &Category,
    ) -> Result<bool, WordSupplyError> {
        let words = self
            .words
            .get(category)
            .ok_or_else(|| WordSupplyError::UnknownCategory(category.to_string()))?;
        Ok(words.contains(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_random_word_from_named_category() {
        // テスト項目: 指定したカテゴリの単語が出題される
        // given (前提条件):
        let supplier = BuiltinWordSupplier::new(Some(7));

        // when (操作):
        let (word, drawn) = supplier
            .random_word(Some(category("animals")))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(drawn, category("animals"));
        assert!(supplier.is_valid_word(&word, &drawn).await.unwrap());
    }

    #[tokio::test]
    async fn test_random_word_without_category() {
        // テスト項目: カテゴリ未指定なら組み込みカテゴリのいずれかから出題される
        // given (前提条件):
        let supplier = BuiltinWordSupplier::new(Some(42));

        // when (操作):
        let (word, drawn) = supplier.random_word(None).await.unwrap();

        // then (期待する結果):
        assert!(supplier.categories().contains(&drawn));
        assert_eq!(word.as_str().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_category() {
        // テスト項目: 存在しないカテゴリは UnknownCategory エラーになる
        // given (前提条件):
        let supplier = BuiltinWordSupplier::new(Some(1));

        // when (操作):
        let result = supplier.random_word(Some(category("planets"))).await;

        // then (期待する結果):
        assert!(matches!(result, Err(WordSupplyError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn test_is_valid_word() {
        // テスト項目: 単語リストに含まれない単語は無効と判定される
        // given (前提条件):
        let mut words = BTreeMap::new();
        words.insert(category("objects"), vec![Word::new("crane").unwrap()]);
        let supplier = BuiltinWordSupplier::with_words(words, Some(1));

        // when (操作):
        let known = supplier
            .is_valid_word(&Word::new("CRANE").unwrap(), &category("objects"))
            .await
            .unwrap();
        let unknown = supplier
            .is_valid_word(&Word::new("CRONE").unwrap(), &category("objects"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(known);
        assert!(!unknown);
    }

    #[tokio::test]
    async fn test_empty_supplier_is_unavailable() {
        // テスト項目: 単語リストが空なら Unavailable エラーになる
        // given (前提条件):
        let supplier = BuiltinWordSupplier::with_words(BTreeMap::new(), Some(1));

        // when (操作):
        let result = supplier.random_word(None).await;

        // then (期待する結果):
        assert!(matches!(result, Err(WordSupplyError::Unavailable(_))));
    }
}
