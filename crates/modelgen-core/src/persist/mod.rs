//! Transactional persistence of a generated entity graph.
//!
//! [`persist`] writes the root record and every related record inside one
//! [`Transaction`]. Either all of them become visible or none do: any
//! failure rolls the transaction back and the original error is returned
//! unchanged.
//!
//! Transactions are scoped values. Dropping one that was neither committed
//! nor rolled back discards its writes, so an early return can never leak a
//! half-written graph.

mod memory;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::Result,
    materialize::Generated,
    seed::Payload,
};

pub use memory::{MemoryStore, MemoryStoreError, MemoryTransaction, StoredRow};

/// Primary key assigned by a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Storage that can hand out atomic write scopes.
pub trait Store {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>>;
}

/// A unit of writes that becomes visible on [`Transaction::commit`].
///
/// Implementations must discard uncommitted writes when dropped.
pub trait Transaction {
    /// Stage a new row for `entity` and return its key.
    fn insert(&mut self, entity: &str, fields: &Payload) -> Result<RecordId>;

    fn commit(self) -> Result<()>;

    fn rollback(self) -> Result<()>;
}

/// Keys written for one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGroup {
    pub relation: &'static str,
    pub ids: Vec<RecordId>,
}

/// A saved root entity with the keys of everything written alongside it.
#[derive(Debug)]
pub struct Persisted<T> {
    pub id: RecordId,
    pub model: T,
    pub relations: Vec<PersistedGroup>,
}

impl<T> Persisted<T> {
    pub fn related_ids(&self, relation: &str) -> &[RecordId] {
        self.relations
            .iter()
            .find(|group| group.relation == relation)
            .map(|group| group.ids.as_slice())
            .unwrap_or_default()
    }
}

/// Save a generated graph atomically.
///
/// The root is inserted first; each related record is then attached to it
/// through its relation's foreign key and inserted.
pub fn persist<T, S: Store>(store: &S, generated: Generated<T>) -> Result<Persisted<T>> {
    let Generated {
        model,
        record,
        relations,
    } = generated;

    let mut tx = store.begin()?;

    let written = (|| -> Result<(RecordId, Vec<PersistedGroup>)> {
        let id = tx.insert(record.entity, &record.fields)?;
        let mut groups = Vec::with_capacity(relations.len());

        for group in relations {
            let mut ids = Vec::with_capacity(group.records.len());
            for related in group.records {
                let mut fields = related.fields;
                group.relation.attach(record.entity, id, &mut fields);
                ids.push(tx.insert(related.entity, &fields)?);
            }
            groups.push(PersistedGroup {
                relation: group.relation.name(),
                ids,
            });
        }

        Ok((id, groups))
    })();

    match written {
        Ok((id, relations)) => {
            tx.commit()?;
            debug!(
                entity = record.entity,
                %id,
                related = relations.iter().map(|group| group.ids.len()).sum::<usize>(),
                "persisted generated entity"
            );
            Ok(Persisted {
                id,
                model,
                relations,
            })
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback() {
                warn!(entity = record.entity, error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        entity::{Generatable, GeneratableRelation, Relation},
        error::GenerationError,
        materialize::materialize,
    };

    #[derive(Debug, Deserialize)]
    struct Album {
        title: Option<String>,
    }

    impl Generatable for Album {
        const ENTITY: &'static str = "Album";

        fn fillable() -> &'static [&'static str] {
            &["title"]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            vec![("title", "album title")]
        }

        fn relations() -> Vec<Relation> {
            vec![Relation::has_many::<Track>("tracks")]
        }

        fn generatable_relations() -> Vec<GeneratableRelation> {
            vec!["tracks".into()]
        }
    }

    #[derive(Debug, Deserialize)]
    struct Track {}

    impl Generatable for Track {
        const ENTITY: &'static str = "Track";

        fn fillable() -> &'static [&'static str] {
            &["name", "album_id"]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            vec![("name", "track name")]
        }
    }

    /// Fails the `n`-th insert (1-based) of every transaction.
    struct FailingStore {
        inner: MemoryStore,
        fail_at: usize,
    }

    struct FailingTx<'a> {
        inner: MemoryTransaction<'a>,
        inserts: usize,
        fail_at: usize,
    }

    impl Store for FailingStore {
        type Tx<'a> = FailingTx<'a>;

        fn begin(&self) -> Result<Self::Tx<'_>> {
            Ok(FailingTx {
                inner: self.inner.begin()?,
                inserts: 0,
                fail_at: self.fail_at,
            })
        }
    }

    impl Transaction for FailingTx<'_> {
        fn insert(&mut self, entity: &str, fields: &Payload) -> Result<RecordId> {
            self.inserts += 1;
            if self.inserts == self.fail_at {
                return Err(GenerationError::persistence(format!("disk full on {entity}")));
            }
            self.inner.insert(entity, fields)
        }

        fn commit(self) -> Result<()> {
            self.inner.commit()
        }

        fn rollback(self) -> Result<()> {
            self.inner.rollback()
        }
    }

    fn album() -> Generated<Album> {
        let payload = json!({
            "title": "Blue",
            "tracks": [{"name": "All I Want"}, {"name": "My Old Man"}, {"name": "Little Green"}],
        });
        materialize::<Album>(payload.as_object().cloned().unwrap()).unwrap()
    }

    #[test]
    fn writes_root_and_attached_relations() {
        let store = MemoryStore::new();

        let persisted = persist(&store, album()).unwrap();

        assert_eq!(persisted.model.title.as_deref(), Some("Blue"));
        assert_eq!(persisted.related_ids("tracks").len(), 3);
        assert_eq!(store.count("Album").unwrap(), 1);

        let tracks = store.rows("Track").unwrap();
        assert_eq!(tracks.len(), 3);
        assert!(
            tracks
                .iter()
                .all(|row| row.fields.get("album_id") == Some(&Value::from(persisted.id.0)))
        );
    }

    #[test]
    fn failure_midway_leaves_nothing_behind() {
        // root + 3 tracks = 4 inserts, the third related insert fails
        let store = FailingStore {
            inner: MemoryStore::new(),
            fail_at: 4,
        };

        let err = persist(&store, album()).unwrap_err();

        assert!(matches!(err, GenerationError::Persistence(ref source) if source.to_string() == "disk full on Track"));
        assert!(store.inner.is_empty().unwrap());
    }

    #[test]
    fn failing_root_insert_is_propagated() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            fail_at: 1,
        };

        assert!(matches!(persist(&store, album()), Err(GenerationError::Persistence(_))));
        assert_eq!(store.inner.count("Album").unwrap(), 0);
    }
}
