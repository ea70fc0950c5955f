//! Persistence: a string-keyed JSON document store.
//!
//! The engine treats the store as an external get/set map and reads/writes
//! whole documents, so concurrent writers race at document granularity
//! (last writer wins). All mutations should be funneled through one process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::{ProspectError, Result};
use crate::plan::PlanState;
use crate::record::{ListPreferences, SavedItem};

/// Well-known document keys
pub mod keys {
    pub const SAVED_ITEMS: &str = "savedItems";
    pub const LIST_PREFS: &str = "listPrefs";
    pub const IS_PRO: &str = "isPro";
    pub const DEV_MODE: &str = "devMode";
    pub const USAGE_DATE: &str = "usageDate";
    pub const USAGE_COUNT: &str = "usageCount";
}

/// The external key-value store contract
pub trait Store {
    /// Fetch the requested keys; absent keys are simply missing from the map
    fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;
    /// Write all entries, replacing existing values
    fn set(&self, entries: Vec<(String, Value)>) -> Result<()>;
}

// ========== SQLite-backed store ==========

/// Durable store over a single key→JSON table
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at the default location
    pub fn open() -> Result<Self> {
        let path = Self::db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open_at(&path)
    }

    /// Open or create the database at a specific path
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Database path, with a `PROSPECT_DB` env override for test isolation
    pub fn db_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("PROSPECT_DB") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "prospect")
            .ok_or_else(|| ProspectError::ConfigError("Could not determine data directory".into()))?;
        Ok(dirs.data_dir().join("prospect.db"))
    }
}

impl Store for SqliteStore {
    fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let mut out = HashMap::new();
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        for key in keys {
            let raw: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .optional()?;
            if let Some(raw) = raw {
                let value = serde_json::from_str(&raw)?;
                out.insert((*key).to_string(), value);
            }
        }
        Ok(out)
    }

    fn set(&self, entries: Vec<(String, Value)>) -> Result<()> {
        // One transaction per set call: either the whole document lands or none of it
        self.conn.execute_batch("BEGIN")?;
        for (key, value) in &entries {
            let result = self.conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, serde_json::to_string(value)?],
            );
            if let Err(e) = result {
                let _ = self.conn.execute_batch("ROLLBACK");
                return Err(e.into());
            }
        }
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }
}

// ========== In-memory store ==========

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    cells: RefCell<HashMap<String, Value>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every round-trip fails, for exercising the
    /// operation-not-applied error path
    pub fn unavailable() -> Self {
        Self {
            cells: RefCell::new(HashMap::new()),
            unavailable: true,
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        if self.unavailable {
            return Err(ProspectError::StoreUnavailable("simulated outage".into()));
        }
        let cells = self.cells.borrow();
        Ok(keys
            .iter()
            .filter_map(|k| cells.get(*k).map(|v| ((*k).to_string(), v.clone())))
            .collect())
    }

    fn set(&self, entries: Vec<(String, Value)>) -> Result<()> {
        if self.unavailable {
            return Err(ProspectError::StoreUnavailable("simulated outage".into()));
        }
        let mut cells = self.cells.borrow_mut();
        for (key, value) in entries {
            cells.insert(key, value);
        }
        Ok(())
    }
}

// ========== Typed accessors ==========

/// Load the saved collection; a missing or malformed document is empty
pub fn load_saved_items(store: &dyn Store) -> Result<Vec<SavedItem>> {
    let found = store.get(&[keys::SAVED_ITEMS])?;
    Ok(found
        .get(keys::SAVED_ITEMS)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

pub fn save_saved_items(store: &dyn Store, items: &[SavedItem]) -> Result<()> {
    store.set(vec![(
        keys::SAVED_ITEMS.to_string(),
        serde_json::to_value(items)?,
    )])
}

/// Load preferences, merging stored partial values over the defaults
pub fn load_prefs(store: &dyn Store) -> Result<ListPreferences> {
    let found = store.get(&[keys::LIST_PREFS])?;
    Ok(found
        .get(keys::LIST_PREFS)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

pub fn save_prefs(store: &dyn Store, prefs: &ListPreferences) -> Result<()> {
    store.set(vec![(
        keys::LIST_PREFS.to_string(),
        serde_json::to_value(prefs)?,
    )])
}

/// Load plan state from its individual flag keys
pub fn load_plan(store: &dyn Store) -> Result<PlanState> {
    let found = store.get(&[
        keys::IS_PRO,
        keys::DEV_MODE,
        keys::USAGE_DATE,
        keys::USAGE_COUNT,
    ])?;
    let flag = |key: &str| found.get(key).and_then(Value::as_bool).unwrap_or(false);
    Ok(PlanState {
        is_pro: flag(keys::IS_PRO),
        dev_mode: flag(keys::DEV_MODE),
        usage_date: found
            .get(keys::USAGE_DATE)
            .and_then(Value::as_str)
            .map(String::from),
        usage_count: found
            .get(keys::USAGE_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
    })
}

pub fn save_plan(store: &dyn Store, plan: &PlanState) -> Result<()> {
    store.set(vec![
        (keys::IS_PRO.to_string(), Value::Bool(plan.is_pro)),
        (keys::DEV_MODE.to_string(), Value::Bool(plan.dev_mode)),
        (
            keys::USAGE_DATE.to_string(),
            plan.usage_date
                .as_ref()
                .map(|d| Value::String(d.clone()))
                .unwrap_or(Value::Null),
        ),
        (
            keys::USAGE_COUNT.to_string(),
            Value::from(plan.usage_count),
        ),
    ])
}

/// First-run seeding: write defaults for missing keys only, never clobbering
/// values that already exist
pub fn init_defaults(store: &dyn Store) -> Result<()> {
    let existing = store.get(&[
        keys::SAVED_ITEMS,
        keys::LIST_PREFS,
        keys::USAGE_COUNT,
        keys::IS_PRO,
        keys::DEV_MODE,
    ])?;

    let mut entries: Vec<(String, Value)> = Vec::new();
    if !existing
        .get(keys::SAVED_ITEMS)
        .map(Value::is_array)
        .unwrap_or(false)
    {
        entries.push((keys::SAVED_ITEMS.to_string(), Value::Array(Vec::new())));
    }
    if !existing.contains_key(keys::LIST_PREFS) {
        entries.push((
            keys::LIST_PREFS.to_string(),
            serde_json::to_value(ListPreferences::default())?,
        ));
    }
    if !existing
        .get(keys::USAGE_COUNT)
        .map(Value::is_number)
        .unwrap_or(false)
    {
        entries.push((keys::USAGE_COUNT.to_string(), Value::from(0u32)));
    }
    for flag in [keys::IS_PRO, keys::DEV_MODE] {
        if !existing.get(flag).map(Value::is_boolean).unwrap_or(false) {
            entries.push((flag.to_string(), Value::Bool(false)));
        }
    }

    if !entries.is_empty() {
        store.set(entries)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SortKey;

    fn sample_item(key: &str) -> SavedItem {
        SavedItem {
            key: key.to_string(),
            asin: "B0TEST12345".to_string(),
            title: "Test".to_string(),
            selected_variant: String::new(),
            price: "$9.99".to_string(),
            price_is_range: false,
            rating: "4.1".to_string(),
            review_count_text: "10 ratings".to_string(),
            rank: "#5 in Tests".to_string(),
            opportunity_score: Some(60),
            content_score: Some(55),
            url: "https://example.com".to_string(),
            saved_at: 1,
        }
    }

    #[test]
    fn test_sqlite_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        save_saved_items(&store, &[sample_item("a"), sample_item("b")]).unwrap();
        let items = load_saved_items(&store).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "a");
    }

    #[test]
    fn test_missing_documents_are_defaults() {
        let store = MemoryStore::new();
        assert!(load_saved_items(&store).unwrap().is_empty());
        assert_eq!(load_prefs(&store).unwrap(), ListPreferences::default());
        let plan = load_plan(&store).unwrap();
        assert!(!plan.effective_pro());
        assert_eq!(plan.usage_count, 0);
    }

    #[test]
    fn test_plan_round_trip() {
        let store = MemoryStore::new();
        let plan = PlanState {
            is_pro: false,
            dev_mode: true,
            usage_date: Some("2026-08-30".to_string()),
            usage_count: 7,
        };
        save_plan(&store, &plan).unwrap();
        assert_eq!(load_plan(&store).unwrap(), plan);
    }

    #[test]
    fn test_init_defaults_seeds_once() {
        let store = MemoryStore::new();
        init_defaults(&store).unwrap();
        let seeded = store
            .get(&[keys::SAVED_ITEMS, keys::LIST_PREFS, keys::IS_PRO])
            .unwrap();
        assert_eq!(seeded[keys::SAVED_ITEMS], Value::Array(Vec::new()));
        assert_eq!(seeded[keys::IS_PRO], Value::Bool(false));

        // A second run must not clobber existing values
        let prefs = ListPreferences {
            sort: SortKey::PriceAsc,
            hide_range: true,
            ..Default::default()
        };
        save_prefs(&store, &prefs).unwrap();
        store
            .set(vec![(keys::IS_PRO.to_string(), Value::Bool(true))])
            .unwrap();
        init_defaults(&store).unwrap();
        assert_eq!(load_prefs(&store).unwrap(), prefs);
        assert!(load_plan(&store).unwrap().is_pro);
    }

    #[test]
    fn test_unavailable_store_surfaces_error() {
        let store = MemoryStore::unavailable();
        let err = load_saved_items(&store).unwrap_err();
        assert!(matches!(err, ProspectError::StoreUnavailable(_)));
    }

    #[test]
    fn test_malformed_document_treated_as_empty() {
        let store = MemoryStore::new();
        store
            .set(vec![(
                keys::SAVED_ITEMS.to_string(),
                Value::String("not an array".into()),
            )])
            .unwrap();
        assert!(load_saved_items(&store).unwrap().is_empty());
    }
}
