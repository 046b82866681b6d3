use std::sync::Arc;

use tracing::{info, instrument};

use crate::db::Repository;
use crate::db::models::Account;
use crate::error::AppError;
use crate::riot::{GameDataSource, RiotApiError};
use crate::sync::RetryPolicy;

/// Maps Riot IDs to stored accounts, registering them on first sight.
#[derive(Clone, Debug)]
pub struct AccountResolver {
    db: Repository,
    source: Arc<dyn GameDataSource>,
    retry: RetryPolicy,
}

impl AccountResolver {
    pub fn new(db: Repository, source: Arc<dyn GameDataSource>, retry: RetryPolicy) -> Self {
        Self { db, source, retry }
    }

    #[instrument(skip(self))]
    pub async fn find_or_register(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, AppError> {
        let (game_name, tag_line) = (game_name.trim(), tag_line.trim());

        if let Some(account) = self.db.account_by_riot_id(game_name, tag_line).await? {
            return Ok(account);
        }

        let source = self.source.as_ref();
        let identity = self
            .retry
            .run("resolve_account", move || {
                source.resolve_account(game_name, tag_line)
            })
            .await
            .map_err(|e| match e {
                RiotApiError::NotFound => AppError::AccountNotFound {
                    game_name: game_name.to_string(),
                    tag_line: tag_line.to_string(),
                },
                other => other.into(),
            })?;

        let account = self.db.upsert_account(&identity).await?;
        info!(account_id = account.id, riot_id = %account.riot_id(), "👤 Account registered");
        Ok(account)
    }

    /// Store lookup only.
    pub async fn find_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Option<Account>, AppError> {
        self.db
            .account_by_riot_id(game_name.trim(), tag_line.trim())
            .await
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, AppError> {
        self.db.accounts_by_ids(ids).await
    }

    /// Records a completed full sync. Returns the stored timestamp.
    pub async fn mark_synced(&self, account: &Account) -> Result<i64, AppError> {
        self.db.mark_synced(account.id).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{FakeSource, RESOLVE_ACCOUNT, identity};

    fn resolver(db: &Repository, source: Arc<FakeSource>) -> AccountResolver {
        AccountResolver::new(db.clone(), source, RetryPolicy::new(Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn registers_once_then_reads_store() {
        let db = Repository::in_memory().await;
        let source = Arc::new(FakeSource::default());
        source.add_account(identity("p1", "Setsuko", "KR1"));
        let resolver = resolver(&db, source.clone());

        let first = resolver.find_or_register("  Setsuko ", "KR1 ").await.unwrap();
        let second = resolver.find_or_register("setsuko", "kr1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.riot_id(), "Setsuko#KR1");
        assert_eq!(source.calls(RESOLVE_ACCOUNT), 1);
    }

    #[tokio::test]
    async fn unknown_riot_id_is_account_not_found() {
        let db = Repository::in_memory().await;
        let resolver = resolver(&db, Arc::new(FakeSource::default()));

        let err = resolver.find_or_register("nobody", "0000").await.unwrap_err();

        assert!(err.is_client_error());
        assert!(matches!(
            err,
            AppError::AccountNotFound { ref game_name, .. } if game_name == "nobody"
        ));
    }

    #[tokio::test]
    async fn renamed_account_keeps_its_row() {
        let db = Repository::in_memory().await;
        let old = db.upsert_account(&identity("p1", "OldName", "KR1")).await.unwrap();
        let source = Arc::new(FakeSource::default());
        source.add_account(identity("p1", "NewName", "KR1"));

        let renamed = resolver(&db, source)
            .find_or_register("NewName", "KR1")
            .await
            .unwrap();

        assert_eq!(renamed.id, old.id);
        assert_eq!(renamed.game_name, "NewName");
    }

    #[tokio::test]
    async fn bulk_lookup_reads_store_only() {
        let db = Repository::in_memory().await;
        let a = db.upsert_account(&identity("p1", "Alpha", "KR1")).await.unwrap();
        let b = db.upsert_account(&identity("p2", "Bravo", "KR1")).await.unwrap();
        let source = Arc::new(FakeSource::default());

        let mut found = resolver(&db, source.clone())
            .find_by_ids(&[b.id, 999, a.id])
            .await
            .unwrap();
        found.sort_by_key(|account| account.id);

        assert_eq!(found, vec![a, b]);
        assert_eq!(source.total_calls(), 0);
    }
}
