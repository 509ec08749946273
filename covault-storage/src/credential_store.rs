//! DuckDB-backed implementation of the record-store boundary.

use chrono::{DateTime, TimeZone, Utc};
use covault_crypto::Envelope;
use covault_types::{ClientId, CredentialId, Principal};
use covault_vault::{AuditEntry, Credential, RecordStore, StoreError, StoreResult};
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Record store backed by DuckDB.
///
/// Credentials live in a single table with the secret envelope stored in its
/// canonical `<nonce>:<tag>:<ciphertext>` string form (NULL when no secret is
/// set); audit rows are append-only.
#[derive(Clone)]
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clients (
    id VARCHAR PRIMARY KEY,
    owner_principal VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    created_at BIGINT NOT NULL
);
CREATE TABLE IF NOT EXISTS credentials (
    id VARCHAR PRIMARY KEY,
    client_id VARCHAR NOT NULL,
    kind VARCHAR NOT NULL,
    display_name VARCHAR,
    url VARCHAR,
    username VARCHAR,
    port INTEGER,
    notes VARCHAR,
    secret_ciphertext VARCHAR,
    created_by VARCHAR NOT NULL,
    created_at BIGINT NOT NULL
);
CREATE TABLE IF NOT EXISTS audit_log (
    id VARCHAR PRIMARY KEY,
    principal VARCHAR NOT NULL,
    credential_id VARCHAR NOT NULL,
    client_id VARCHAR NOT NULL,
    kind VARCHAR NOT NULL,
    display_name VARCHAR,
    revealed_at BIGINT NOT NULL
);
";

/// Raw credential row in column order, converted outside the row closure so
/// parse failures surface as store errors instead of panics.
type CredentialRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<String>,
    String,
    i64,
);

impl CredentialStore {
    /// Opens or creates a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        debug!("opened credential store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Registers a client record and its owning principal.
    pub fn insert_client(
        &self,
        id: ClientId,
        owner: &Principal,
        name: &str,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        conn.execute(
            "INSERT INTO clients (id, owner_principal, name, created_at) VALUES (?, ?, ?, ?)",
            params![
                id.to_string(),
                owner.as_str(),
                name,
                Utc::now().timestamp_millis()
            ],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Reads back the audit trail of one credential, oldest first.
    pub fn audit_entries(&self, credential_id: CredentialId) -> StoreResult<Vec<AuditEntry>> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT principal, credential_id, client_id, kind, display_name, revealed_at
                 FROM audit_log WHERE credential_id = ? ORDER BY revealed_at, id",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows: Vec<(String, String, String, String, Option<String>, i64)> = stmt
            .query_map(params![credential_id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter()
            .map(|(principal, credential_id, client_id, kind, display_name, revealed_at)| {
                Ok(AuditEntry {
                    principal: Principal::new(principal),
                    credential_id: parse_credential_id(&credential_id)?,
                    client_id: parse_client_id(&client_id)?,
                    kind,
                    display_name,
                    revealed_at: millis_to_datetime(revealed_at)?,
                })
            })
            .collect()
    }
}

impl RecordStore for CredentialStore {
    fn find_credential(&self, id: CredentialId) -> StoreResult<Option<Credential>> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, client_id, kind, display_name, url, username, port, notes,
                        secret_ciphertext, created_by, created_at
                 FROM credentials WHERE id = ?",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut rows: Vec<CredentialRow> = stmt
            .query_map(params![id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                    row.get(10)?,
                ))
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match rows.pop() {
            Some(row) => Ok(Some(row_to_credential(row)?)),
            None => Ok(None),
        }
    }

    fn find_client_owner(&self, client_id: ClientId) -> StoreResult<Option<Principal>> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT owner_principal FROM clients WHERE id = ?")
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut owners: Vec<String> = stmt
            .query_map(params![client_id.to_string()], |row| row.get(0))
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(owners.pop().map(Principal::new))
    }

    fn save_credential(&self, credential: &Credential) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO credentials
                (id, client_id, kind, display_name, url, username, port, notes,
                 secret_ciphertext, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                credential.id.to_string(),
                credential.client_id.to_string(),
                credential.kind,
                credential.display_name,
                credential.url,
                credential.username,
                credential.port.map(i64::from),
                credential.notes,
                credential.secret.as_ref().map(|e| e.to_string()),
                credential.created_by.as_str(),
                credential.created_at.timestamp_millis()
            ],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn delete_credential(&self, id: CredentialId) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        conn.execute(
            "DELETE FROM credentials WHERE id = ?",
            params![id.to_string()],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn list_for_client(&self, client_id: ClientId) -> StoreResult<Vec<Credential>> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, client_id, kind, display_name, url, username, port, notes,
                        secret_ciphertext, created_by, created_at
                 FROM credentials WHERE client_id = ? ORDER BY created_at, id",
            )
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows: Vec<CredentialRow> = stmt
            .query_map(params![client_id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                    row.get(10)?,
                ))
            })
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(row_to_credential).collect()
    }

    fn append_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|e| StoreError::Backend(e.to_string()))?;
        conn.execute(
            "INSERT INTO audit_log
                (id, principal, credential_id, client_id, kind, display_name, revealed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                uuid::Uuid::now_v7().to_string(),
                entry.principal.as_str(),
                entry.credential_id.to_string(),
                entry.client_id.to_string(),
                entry.kind,
                entry.display_name,
                entry.revealed_at.timestamp_millis()
            ],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

fn row_to_credential(row: CredentialRow) -> StoreResult<Credential> {
    let (id, client_id, kind, display_name, url, username, port, notes, secret, created_by, created_at) =
        row;

    let secret = secret
        .map(|s| {
            s.parse::<Envelope>()
                .map_err(|e| StoreError::CorruptSecret(e.to_string()))
        })
        .transpose()?;

    let port = port
        .map(|p| {
            u16::try_from(p)
                .map_err(|_| StoreError::Backend(format!("port {p} out of range")))
        })
        .transpose()?;

    Ok(Credential {
        id: parse_credential_id(&id)?,
        client_id: parse_client_id(&client_id)?,
        kind,
        display_name,
        url,
        username,
        port,
        notes,
        secret,
        created_by: Principal::new(created_by),
        created_at: millis_to_datetime(created_at)?,
    })
}

fn parse_credential_id(raw: &str) -> StoreResult<CredentialId> {
    CredentialId::parse(raw)
        .map_err(|e| StoreError::Backend(format!("bad credential id {raw}: {e}")))
}

fn parse_client_id(raw: &str) -> StoreResult<ClientId> {
    ClientId::parse(raw).map_err(|e| StoreError::Backend(format!("bad client id {raw}: {e}")))
}

fn millis_to_datetime(millis: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StoreError::Backend(format!("bad timestamp {millis}")))
}
