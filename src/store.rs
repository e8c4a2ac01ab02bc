//! Share-token store
//!
//! Persistence for public profiles and the profile snapshots they expose.
//! Every mutating operation runs inside a single redb write transaction.
//! redb admits one writer at a time, so the check-then-insert in
//! [`ShareStore::get_or_create`] and the read-modify-write in
//! [`ShareStore::record_view`] cannot interleave with another writer.

use std::sync::Arc;

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use redb::{Database, ReadableDatabase, ReadableTable, Table};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::{
    TABLE_PROFILES, TABLE_PUBLIC_BY_TOKEN, TABLE_PUBLIC_BY_USER, TABLE_PUBLIC_PROFILES,
};
use crate::model::{Profile, ProfileUpdate, PublicProfile};

/// Length of a generated share token
///
/// 32 characters from a 62 symbol alphabet is roughly 190 bits of entropy.
pub const SHARE_TOKEN_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("index entry points at missing row {0}")]
    DanglingIndex(String),
}

macro_rules! from_redb_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StoreError {
                fn from(err: $err) -> Self {
                    StoreError::Database(err.into())
                }
            }
        )*
    };
}

from_redb_error!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Which index a public lookup goes through
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Token(&'a str),
    User(&'a str),
}

/// Generates a url-safe share token
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn read_json<T, R>(table: &R, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static str>,
{
    match table.get(key)? {
        Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
        None => Ok(None),
    }
}

fn write_json<T: Serialize>(
    table: &mut Table<'_, &'static str, &'static str>,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    table.insert(key, json.as_str())?;
    Ok(())
}

fn read_index<R>(table: &R, key: &str) -> Result<Option<String>, StoreError>
where
    R: ReadableTable<&'static str, &'static str>,
{
    Ok(table.get(key)?.map(|guard| guard.value().to_string()))
}

/// Handle over the embedded database
#[derive(Clone)]
pub struct ShareStore {
    db: Arc<Database>,
}

impl ShareStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns the user's public profile, creating it on first call
    ///
    /// The boolean is true when this call inserted the row. A user without a
    /// profile snapshot gets an empty one so the public view has something to
    /// point at.
    pub fn get_or_create(&self, user_id: &str) -> Result<(PublicProfile, bool), StoreError> {
        if let Some(existing) = self.find_by_user(user_id)? {
            return Ok((existing, false));
        }

        let write_txn = self.db.begin_write()?;
        let result = {
            let mut rows = write_txn.open_table(TABLE_PUBLIC_PROFILES)?;
            let mut by_user = write_txn.open_table(TABLE_PUBLIC_BY_USER)?;

            // Another writer may have created the row between the read above
            // and this transaction.
            match read_index(&by_user, user_id)? {
                Some(id) => {
                    let record = read_json(&rows, &id)?.ok_or(StoreError::DanglingIndex(id))?;
                    (record, false)
                }
                None => {
                    let mut by_token = write_txn.open_table(TABLE_PUBLIC_BY_TOKEN)?;
                    let mut profiles = write_txn.open_table(TABLE_PROFILES)?;
                    let now = Utc::now();

                    let profile = match read_json::<Profile, _>(&profiles, user_id)? {
                        Some(profile) => profile,
                        None => {
                            let profile = Profile::empty(
                                Uuid::new_v4().to_string(),
                                user_id.to_string(),
                                now,
                            );
                            write_json(&mut profiles, user_id, &profile)?;
                            profile
                        }
                    };

                    let share_token = loop {
                        let candidate = generate_share_token();
                        if by_token.get(candidate.as_str())?.is_none() {
                            break candidate;
                        }
                    };

                    let record = PublicProfile {
                        id: Uuid::new_v4().to_string(),
                        user_id: user_id.to_string(),
                        profile_id: profile.id,
                        share_token,
                        is_active: true,
                        view_count: 0,
                        shared_at: now,
                        updated_at: now,
                    };

                    write_json(&mut rows, &record.id, &record)?;
                    by_user.insert(user_id, record.id.as_str())?;
                    by_token.insert(record.share_token.as_str(), record.id.as_str())?;

                    (record, true)
                }
            }
        };
        write_txn.commit()?;

        Ok(result)
    }

    /// Reads the user's public profile without side effects
    pub fn find_by_user(&self, user_id: &str) -> Result<Option<PublicProfile>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let by_user = read_txn.open_table(TABLE_PUBLIC_BY_USER)?;

        match read_index(&by_user, user_id)? {
            Some(id) => {
                let rows = read_txn.open_table(TABLE_PUBLIC_PROFILES)?;
                let record = read_json(&rows, &id)?.ok_or(StoreError::DanglingIndex(id))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Sets `is_active` on the user's public profile
    ///
    /// Returns `None` when the user has no public profile. Token and view
    /// count are left as they are.
    pub fn set_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Option<PublicProfile>, StoreError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut rows = write_txn.open_table(TABLE_PUBLIC_PROFILES)?;
            let by_user = write_txn.open_table(TABLE_PUBLIC_BY_USER)?;

            match read_index(&by_user, user_id)? {
                Some(id) => {
                    let mut record: PublicProfile =
                        read_json(&rows, &id)?.ok_or_else(|| StoreError::DanglingIndex(id.clone()))?;
                    record.is_active = is_active;
                    record.updated_at = Utc::now();
                    write_json(&mut rows, &id, &record)?;
                    Some(record)
                }
                None => None,
            }
        };

        match updated {
            Some(record) => {
                write_txn.commit()?;
                Ok(Some(record))
            }
            None => {
                write_txn.abort()?;
                Ok(None)
            }
        }
    }

    /// Counts one view of an active public profile
    ///
    /// Returns the updated row together with its profile snapshot, or `None`
    /// when the lookup key is unknown or the profile is inactive. Inactive
    /// profiles are not counted.
    ///
    /// Unknown and inactive keys are answered from a read transaction, so
    /// guessing tokens never waits on the writer lock. The row is checked
    /// again inside the write transaction.
    pub fn record_view(
        &self,
        lookup: Lookup<'_>,
    ) -> Result<Option<(PublicProfile, Profile)>, StoreError> {
        if !self.is_viewable(lookup)? {
            return Ok(None);
        }

        let write_txn = self.db.begin_write()?;
        let viewed = {
            let mut rows = write_txn.open_table(TABLE_PUBLIC_PROFILES)?;

            let id = match lookup {
                Lookup::Token(token) => {
                    read_index(&write_txn.open_table(TABLE_PUBLIC_BY_TOKEN)?, token)?
                }
                Lookup::User(user_id) => {
                    read_index(&write_txn.open_table(TABLE_PUBLIC_BY_USER)?, user_id)?
                }
            };

            match id {
                Some(id) => {
                    let mut record: PublicProfile =
                        read_json(&rows, &id)?.ok_or_else(|| StoreError::DanglingIndex(id.clone()))?;

                    if record.is_active {
                        record.view_count = record.view_count.saturating_add(1);
                        write_json(&mut rows, &id, &record)?;

                        let profiles = write_txn.open_table(TABLE_PROFILES)?;
                        let profile = read_json(&profiles, &record.user_id)?.unwrap_or_else(|| {
                            Profile::empty(
                                record.profile_id.clone(),
                                record.user_id.clone(),
                                record.shared_at,
                            )
                        });
                        Some((record, profile))
                    } else {
                        None
                    }
                }
                None => None,
            }
        };

        match viewed {
            Some(viewed) => {
                write_txn.commit()?;
                Ok(Some(viewed))
            }
            None => {
                write_txn.abort()?;
                Ok(None)
            }
        }
    }

    fn is_viewable(&self, lookup: Lookup<'_>) -> Result<bool, StoreError> {
        let read_txn = self.db.begin_read()?;

        let id = match lookup {
            Lookup::Token(token) => read_index(&read_txn.open_table(TABLE_PUBLIC_BY_TOKEN)?, token)?,
            Lookup::User(user_id) => read_index(&read_txn.open_table(TABLE_PUBLIC_BY_USER)?, user_id)?,
        };

        match id {
            Some(id) => {
                let rows = read_txn.open_table(TABLE_PUBLIC_PROFILES)?;
                let record: Option<PublicProfile> = read_json(&rows, &id)?;
                Ok(record.is_some_and(|record| record.is_active))
            }
            None => Ok(false),
        }
    }

    /// Reads the user's profile snapshot
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let profiles = read_txn.open_table(TABLE_PROFILES)?;
        read_json(&profiles, user_id)
    }

    /// Creates or partially updates the user's profile snapshot
    pub fn upsert_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let write_txn = self.db.begin_write()?;
        let profile = {
            let mut profiles = write_txn.open_table(TABLE_PROFILES)?;
            let now = Utc::now();

            let mut profile = read_json::<Profile, _>(&profiles, user_id)?.unwrap_or_else(|| {
                Profile::empty(Uuid::new_v4().to_string(), user_id.to_string(), now)
            });
            profile.apply(update, now);
            write_json(&mut profiles, user_id, &profile)?;
            profile
        };
        write_txn.commit()?;

        Ok(profile)
    }
}
