use crate::error::Result;
use crate::model::{StudentForm, StudentRecord};
use crate::view::{self, DerivedView, QueryState};

use super::api::StudentsApi;

/// In-memory copy of the server's records.
///
/// Every successful mutation is followed by a full re-fetch; records are never
/// patched locally. If that re-fetch fails the write still reports success and
/// the list stays as it was until the next `refresh`.
#[derive(Debug)]
pub struct StudentCache<A> {
    api: A,
    records: Vec<StudentRecord>,
}

impl<A: StudentsApi> StudentCache<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.st_id == id)
    }

    pub async fn refresh(&mut self) -> Result<&[StudentRecord]> {
        match self.api.list().await {
            Ok(rows) => {
                tracing::debug!(count = rows.len(), "student cache refreshed");
                self.records = rows;
                Ok(self.records.as_slice())
            }
            Err(e) => {
                tracing::warn!(error = %e, "error fetching students");
                Err(e)
            }
        }
    }

    pub async fn fetch(&self, id: &str) -> Result<StudentRecord> {
        self.api.get(id).await
    }

    pub async fn create(&mut self, form: &StudentForm) -> Result<StudentRecord> {
        let payload = form.to_payload()?;
        let created = self.api.create(&payload).await?;
        self.refresh_after_write().await;
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, form: &StudentForm) -> Result<StudentRecord> {
        let payload = form.to_payload()?;
        let updated = self.api.update(id, &payload).await?;
        self.refresh_after_write().await;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<StudentRecord> {
        let deleted = self.api.delete(id).await?;
        self.refresh_after_write().await;
        Ok(deleted)
    }

    /// The write already landed; a failed re-fetch leaves the list stale
    /// (logged by `refresh`) instead of failing the write.
    async fn refresh_after_write(&mut self) {
        let _ = self.refresh().await;
    }

    pub fn view(&self, query: &QueryState) -> DerivedView<'_> {
        view::derive(&self.records, query)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::client::api::LocalStudentsApi;
    use crate::model::{Gender, NewStudent};
    use crate::store::StudentStore;

    /// Counts calls so tests can see which operations hit the network.
    struct Counting {
        inner: LocalStudentsApi,
        lists: AtomicUsize,
        writes: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            let store = Arc::new(StudentStore::in_memory().unwrap());
            Self {
                inner: LocalStudentsApi::new(store),
                lists: AtomicUsize::new(0),
                writes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StudentsApi for Counting {
        async fn list(&self) -> Result<Vec<StudentRecord>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list().await
        }
        async fn get(&self, id: &str) -> Result<StudentRecord> {
            self.inner.get(id).await
        }
        async fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create(input).await
        }
        async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update(id, input).await
        }
        async fn delete(&self, id: &str) -> Result<StudentRecord> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    fn form(name: &str, class: &str, marks: &str) -> StudentForm {
        StudentForm {
            name: name.to_string(),
            age: "11".to_string(),
            class_name: class.to_string(),
            marks: marks.to_string(),
            gender: Gender::Female,
        }
    }

    #[tokio::test]
    async fn every_mutation_refetches_the_list() {
        let mut cache = StudentCache::new(Counting::new());
        let amy = cache.create(&form("Amy", "5", "90")).await.unwrap();
        assert_eq!(cache.api().lists.load(Ordering::SeqCst), 1);
        assert_eq!(cache.records().len(), 1);

        cache.update(&amy.st_id, &form("Amy", "6", "91")).await.unwrap();
        assert_eq!(cache.api().lists.load(Ordering::SeqCst), 2);
        assert_eq!(cache.find(&amy.st_id).unwrap().class, "6");

        cache.delete(&amy.st_id).await.unwrap();
        assert_eq!(cache.api().lists.load(Ordering::SeqCst), 3);
        assert!(cache.records().is_empty());
    }

    #[tokio::test]
    async fn short_name_never_reaches_the_api() {
        let mut cache = StudentCache::new(Counting::new());
        let err = cache.create(&form("A", "5", "90")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(cache.api().writes.load(Ordering::SeqCst), 0);
        assert_eq!(cache.api().lists.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn moving_a_student_between_classes_changes_filters() {
        let mut cache = StudentCache::new(Counting::new());
        let bob = cache.create(&form("Bob", "5", "70")).await.unwrap();

        let mut q = QueryState::default();
        q.set_filter_class("5");
        assert_eq!(cache.view(&q).rows.len(), 1);

        cache.update(&bob.st_id, &form("Bob", "6", "70")).await.unwrap();
        assert!(cache.view(&q).rows.is_empty());
        q.set_filter_class("6");
        let view = cache.view(&q);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].st_id, bob.st_id);
    }

    #[tokio::test]
    async fn deleting_missing_id_leaves_cache_untouched() {
        let mut cache = StudentCache::new(Counting::new());
        cache.create(&form("Amy", "5", "90")).await.unwrap();
        let err = cache.delete("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.records().len(), 1);
        cache.refresh().await.unwrap();
        assert_eq!(cache.records().len(), 1);
    }

    /// Writes succeed while every list call fails.
    struct ListDown {
        inner: LocalStudentsApi,
        store: Arc<StudentStore>,
    }

    impl ListDown {
        fn new() -> Self {
            let store = Arc::new(StudentStore::in_memory().unwrap());
            Self {
                inner: LocalStudentsApi::new(store.clone()),
                store,
            }
        }
    }

    #[async_trait]
    impl StudentsApi for ListDown {
        async fn list(&self) -> Result<Vec<StudentRecord>> {
            Err(crate::error::Error::Api {
                status: 503,
                message: "list unavailable".to_string(),
            })
        }
        async fn get(&self, id: &str) -> Result<StudentRecord> {
            self.inner.get(id).await
        }
        async fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
            self.inner.create(input).await
        }
        async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
            self.inner.update(id, input).await
        }
        async fn delete(&self, id: &str) -> Result<StudentRecord> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn failed_refetch_does_not_fail_a_saved_write() {
        let mut cache = StudentCache::new(ListDown::new());

        let amy = cache.create(&form("Amy", "5", "90")).await.unwrap();
        assert_eq!(cache.api().store.count().unwrap(), 1);
        assert!(cache.records().is_empty());

        let moved = cache.update(&amy.st_id, &form("Amy", "6", "91")).await.unwrap();
        assert_eq!(moved.st_id, amy.st_id);
        assert_eq!(moved.class, "6");

        let deleted = cache.delete(&amy.st_id).await.unwrap();
        assert_eq!(deleted.st_id, amy.st_id);
        assert_eq!(cache.api().store.count().unwrap(), 0);

        assert!(cache.refresh().await.is_err());
    }

    #[tokio::test]
    async fn fetch_goes_to_the_store() {
        let mut cache = StudentCache::new(Counting::new());
        let amy = cache.create(&form("Amy", "5", "90")).await.unwrap();
        assert_eq!(cache.fetch(&amy.st_id).await.unwrap().name, "Amy");
        assert!(cache.fetch("nope").await.unwrap_err().is_not_found());
    }
}
