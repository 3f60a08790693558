//! Lookup of the registry connection an operation should run against
//!
//! The registry layer never reads ambient state: callers resolve exactly one
//! [`RegistryConnection`] through a [`ConnectionSource`] and pass it in.

use crate::config::RegistryConnection;
use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::RwLock;

/// Supplies the currently active registry connection
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    async fn lookup_active_connection(&self) -> Result<RegistryConnection>;
}

#[async_trait]
impl ConnectionSource for RegistryConnection {
    async fn lookup_active_connection(&self) -> Result<RegistryConnection> {
        Ok(self.clone())
    }
}

/// A named, stored registry connection
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRecord {
    pub id: u64,
    pub name: String,
    pub connection: RegistryConnection,
    pub is_active: bool,
    pub is_default: bool,
}

/// Partial update of a record; empty or missing fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ConnectionUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default)]
struct Records {
    next_id: u64,
    entries: Vec<ConnectionRecord>,
}

/// In-memory set of registry connections with at most one active entry
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: RwLock<Records>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connection. The first one stored becomes active and default.
    pub fn add(&self, name: impl Into<String>, connection: RegistryConnection) -> Result<ConnectionRecord> {
        connection.validate()?;

        let mut records = self.write()?;
        records.next_id += 1;
        let first = records.entries.is_empty();
        let record = ConnectionRecord {
            id: records.next_id,
            name: name.into(),
            connection,
            is_active: first,
            is_default: first,
        };
        records.entries.push(record.clone());
        Ok(record)
    }

    pub fn get(&self, id: u64) -> Result<ConnectionRecord> {
        self.read()?
            .entries
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub fn list(&self) -> Result<Vec<ConnectionRecord>> {
        Ok(self.read()?.entries.clone())
    }

    pub fn active(&self) -> Result<Option<ConnectionRecord>> {
        Ok(self.read()?.entries.iter().find(|r| r.is_active).cloned())
    }

    /// Make `id` the only active record.
    pub fn activate(&self, id: u64) -> Result<ConnectionRecord> {
        let mut records = self.write()?;
        if !records.entries.iter().any(|r| r.id == id) {
            return Err(not_found(id));
        }

        let mut activated = None;
        for record in records.entries.iter_mut() {
            record.is_active = record.id == id;
            if record.is_active {
                activated = Some(record.clone());
            }
        }
        activated.ok_or_else(|| not_found(id))
    }

    pub fn update(&self, id: u64, update: ConnectionUpdate) -> Result<ConnectionRecord> {
        let mut records = self.write()?;
        let record = records
            .entries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        let mut connection = record.connection.clone();
        if let Some(url) = non_empty(update.url) {
            connection.url = url;
        }
        if let Some(username) = non_empty(update.username) {
            connection.username = Some(username);
        }
        if let Some(password) = non_empty(update.password) {
            connection.password = Some(password);
        }
        connection.validate()?;

        if let Some(name) = non_empty(update.name) {
            record.name = name;
        }
        record.connection = connection;
        Ok(record.clone())
    }

    pub fn remove(&self, id: u64) -> Result<ConnectionRecord> {
        let mut records = self.write()?;
        let position = records
            .entries
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(records.entries.remove(position))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Records>> {
        self.inner
            .read()
            .map_err(|_| RegistryError::Config("connection registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Records>> {
        self.inner
            .write()
            .map_err(|_| RegistryError::Config("connection registry lock poisoned".to_string()))
    }
}

#[async_trait]
impl ConnectionSource for ConnectionRegistry {
    async fn lookup_active_connection(&self) -> Result<RegistryConnection> {
        self.active()?
            .map(|record| record.connection)
            .ok_or_else(|| RegistryError::NotFound("no active registry".to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn not_found(id: u64) -> RegistryError {
    RegistryError::NotFound(format!("registry {} not found", id))
}
