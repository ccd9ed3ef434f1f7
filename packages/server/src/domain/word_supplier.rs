//! WordSupplier trait 定義

use async_trait::async_trait;

use super::{Category, Word, WordSupplyError};

/// 出題単語の供給元
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordSupplier: Send + Sync {
    /// ランダムな単語とそのカテゴリを返す。`category` が指定されればその中から選ぶ
    async fn random_word(
        &self,
        category: Option<Category>,
    ) -> Result<(Word, Category), WordSupplyError>;

    /// 単語がカテゴリの単語リストに含まれるか
    async fn is_valid_word(&self, word: &Word, category: &Category)
    -> Result<bool, WordSupplyError>;
}
