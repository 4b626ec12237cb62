//! The store engine.
//!
//! [`SeaOrmStore`] orchestrates the session lifecycle against one
//! `sessions` table: decode the inbound cookie into a row identifier, load
//! and validate the row, and on the way out insert or update it and
//! re-encode the identifier into a `Set-Cookie` header.

use std::sync::Arc;

use cookie::Cookie;
use http::{header, HeaderMap, HeaderValue};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;

use crate::codec::{Codec, HmacCodec};
use crate::entity::session::{
    self, ActiveModel as SessionActiveModel, Entity as SessionEntity,
};
use crate::error::{Error, Result};
use crate::session::{CookieOptions, Session, CREATED_ON, EXPIRES_ON, MODIFIED_ON, RESERVED_KEYS};
use crate::value::{Value, ValueMap};

/// A durable, cookie-addressed session store backed by a relational table.
///
/// The store owns the database connection, the token codec, and a
/// readers-writer guard that serializes row writes against loads. It is
/// cheap to clone and safe to share across request handlers.
///
/// # Usage
///
/// ```no_run
/// use sea_orm::Database;
/// use seaorm_session_store::{HmacCodec, SeaOrmStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Database::connect("sqlite://sessions.db?mode=rwc").await?;
/// let store = SeaOrmStore::new(conn, &HmacCodec::generate_key());
///
/// let request_headers = http::HeaderMap::new();
/// let mut session = store.lookup(&request_headers, "sid").await;
/// session.insert("user_id", 123i64);
///
/// let mut response_headers = http::HeaderMap::new();
/// store.save(&mut response_headers, &mut session).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Expired rows
///
/// Expiry is detected at load time only; the engine runs no background
/// sweeper. Dead rows accumulate until the deployer prunes them, e.g. by
/// calling [`SeaOrmStore::delete_expired`] on a schedule.
#[derive(Clone)]
pub struct SeaOrmStore {
    conn: DatabaseConnection,
    codec: Arc<dyn Codec>,
    options: CookieOptions,
    guard: Arc<RwLock<()>>,
}

impl SeaOrmStore {
    /// Creates a store using the default [`HmacCodec`] with `key`.
    ///
    /// The schema must already exist; run
    /// [`migration::Migrator`](crate::migration::Migrator) once at startup.
    pub fn new(conn: DatabaseConnection, key: &[u8]) -> Self {
        Self::with_codec(conn, HmacCodec::new(key))
    }

    /// Creates a store with a caller-supplied codec.
    pub fn with_codec(conn: DatabaseConnection, codec: impl Codec + 'static) -> Self {
        Self {
            conn,
            codec: Arc::new(codec),
            options: CookieOptions::default(),
            guard: Arc::new(RwLock::new(())),
        }
    }

    /// Overrides the default cookie options handed to new sessions.
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves the inbound request into a session.
    ///
    /// If `headers` carries a cookie named `name` whose token decodes to a
    /// live row, the returned session is populated from that row and
    /// marked not-new, with the row timestamps reinjected under the
    /// [`RESERVED_KEYS`]. Every failure mode (absent cookie, bad token,
    /// missing row, expired row, even a statement failure) collapses to a
    /// brand-new empty session; callers never branch on lookup errors.
    pub async fn lookup(&self, headers: &HeaderMap, name: &str) -> Session {
        let mut session = Session::new(name, self.options.clone());

        let Some(token) = request_cookie(headers, name) else {
            return session;
        };
        let id = match self.decode_id(name, &token) {
            Ok(id) => id,
            Err(err) => {
                debug!(cookie = name, %err, "discarding undecodable session cookie");
                return session;
            }
        };
        match self.load(id, name).await {
            Ok(values) => {
                session.id = id.to_string();
                session.values = values;
                session.new = false;
            }
            Err(Error::Expired) => {
                debug!(cookie = name, id, "session row expired, starting fresh");
            }
            Err(Error::NotFound) => {
                debug!(cookie = name, id, "no session row for cookie, starting fresh");
            }
            Err(err) => {
                debug!(cookie = name, id, %err, "session load failed, starting fresh");
            }
        }
        session
    }

    /// Persists the session and emits its cookie onto `headers`.
    ///
    /// A non-positive `max_age` on the session is an explicit destroy
    /// request and redirects to [`SeaOrmStore::delete`]. Otherwise a
    /// session with an empty identifier is inserted (the store assigns the
    /// row id and writes it back), and a persisted session is updated in
    /// place. On the update path a caller-supplied `expires_on` is clamped
    /// up to at least now + max_age, so a successful save never shrinks
    /// the expiry below the configured window.
    ///
    /// The update statement leaves `modified_on` untouched; only the
    /// insert path writes that column.
    ///
    /// Unlike `lookup`, every failure here is surfaced to the caller.
    pub async fn save(&self, headers: &mut HeaderMap, session: &mut Session) -> Result<()> {
        // Per cookie-expiry semantics, max_age <= 0 always means "destroy".
        if session.options.max_age <= 0 {
            return self.delete(headers, session).await;
        }

        if session.id.is_empty() {
            self.insert(session).await?;
        } else {
            self.update(session).await?;
        }

        let token = self.codec.encode(&session.name, session.id.as_bytes())?;
        set_cookie(headers, session_cookie(&session.name, token, &session.options))?;
        Ok(())
    }

    /// Destroys the session: clears its values, emits an
    /// immediately-expiring cookie, and removes the backing row.
    ///
    /// Deleting a session that was never persisted skips the statement but
    /// still clears values and emits the expiring cookie.
    pub async fn delete(&self, headers: &mut HeaderMap, session: &mut Session) -> Result<()> {
        set_cookie(headers, removal_cookie(&session.name, &session.options))?;
        session.values.clear();

        if session.id.is_empty() {
            return Ok(());
        }
        let id = parse_id(&session.id)?;

        let _write = self.guard.write().await;
        SessionEntity::delete_by_id(id).exec(&self.conn).await?;
        Ok(())
    }

    /// Deletes every row whose `expires_on` has passed, returning the
    /// number of rows removed.
    ///
    /// The engine never calls this itself; schedule it externally.
    pub async fn delete_expired(&self) -> Result<u64> {
        let now = to_db(OffsetDateTime::now_utc())?;

        let _write = self.guard.write().await;
        let res = SessionEntity::delete_many()
            .filter(session::Column::ExpiresOn.lt(now))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected)
    }

    async fn insert(&self, session: &mut Session) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        let created_on = session.created_on().unwrap_or(now);
        let modified_on = created_on;
        let expires_on = session
            .expires_on()
            .unwrap_or_else(|| now + Duration::seconds(session.options.max_age));
        let data = self.encode_values(session)?;

        let row = SessionActiveModel {
            session_data: Set(data),
            created_on: Set(to_db(created_on)?),
            modified_on: Set(to_db(modified_on)?),
            expires_on: Set(to_db(expires_on)?),
            ..Default::default()
        };

        let _write = self.guard.write().await;
        let model = row.insert(&self.conn).await?;
        session.id = model.id.to_string();
        Ok(())
    }

    async fn update(&self, session: &mut Session) -> Result<()> {
        let id = parse_id(&session.id)?;
        let now = OffsetDateTime::now_utc();
        let created_on = session.created_on().unwrap_or(now);

        // Renewal: never allow a caller-supplied expiry to land below the
        // freshly computed window.
        let floor = now + Duration::seconds(session.options.max_age);
        let expires_on = match session.expires_on() {
            Some(requested) if requested > floor => requested,
            _ => floor,
        };
        let data = self.encode_values(session)?;

        // modified_on stays NotSet; updates do not refresh it.
        let row = SessionActiveModel {
            id: Set(id),
            session_data: Set(data),
            created_on: Set(to_db(created_on)?),
            expires_on: Set(to_db(expires_on)?),
            ..Default::default()
        };

        let _write = self.guard.write().await;
        row.update(&self.conn).await?;
        Ok(())
    }

    async fn load(&self, id: i64, name: &str) -> Result<ValueMap> {
        let _read = self.guard.read().await;
        let row = SessionEntity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(Error::NotFound)?;

        let expires_on = from_db(row.expires_on)?;
        if OffsetDateTime::now_utc() > expires_on {
            return Err(Error::Expired);
        }

        let token = std::str::from_utf8(&row.session_data)
            .map_err(|e| Error::Decode(format!("corrupt session blob: {e}")))?;
        let plain = self.codec.decode(name, token)?;
        let mut values: ValueMap =
            rmp_serde::from_slice(&plain).map_err(|e| Error::Decode(e.to_string()))?;

        values.insert(CREATED_ON.into(), Value::Timestamp(from_db(row.created_on)?));
        values.insert(MODIFIED_ON.into(), Value::Timestamp(from_db(row.modified_on)?));
        values.insert(EXPIRES_ON.into(), Value::Timestamp(expires_on));
        Ok(values)
    }

    /// Strips the reserved timestamp keys, serializes the remaining map,
    /// and wraps it in a codec token. The reserved keys are transport
    /// metadata and must never land in the persisted blob.
    fn encode_values(&self, session: &mut Session) -> Result<Vec<u8>> {
        for key in RESERVED_KEYS {
            session.values.remove(key);
        }
        let plain =
            rmp_serde::to_vec(&session.values).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(self.codec.encode(&session.name, &plain)?.into_bytes())
    }

    fn decode_id(&self, name: &str, token: &str) -> Result<i64> {
        let raw = self.codec.decode(name, token)?;
        let id = std::str::from_utf8(&raw)
            .map_err(|e| Error::Decode(format!("non-utf8 session id: {e}")))?;
        parse_id(id)
    }
}

impl std::fmt::Debug for SeaOrmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaOrmStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn parse_id(id: &str) -> Result<i64> {
    id.parse()
        .map_err(|e| Error::Decode(format!("invalid session id: {e}")))
}

fn request_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for cookie in Cookie::split_parse(raw.to_owned()).flatten() {
            if cookie.name() == name {
                return Some(cookie.value().to_owned());
            }
        }
    }
    None
}

fn session_cookie(name: &str, token: String, options: &CookieOptions) -> Cookie<'static> {
    Cookie::build((name.to_owned(), token))
        .path(options.path.clone())
        .max_age(Duration::seconds(options.max_age))
        .build()
}

fn removal_cookie(name: &str, options: &CookieOptions) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_owned(), "");
    cookie.set_path(options.path.clone());
    cookie.make_removal();
    cookie
}

fn set_cookie(headers: &mut HeaderMap, cookie: Cookie<'static>) -> Result<()> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| Error::Encode(format!("cookie not header-safe: {e}")))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

// Helpers to convert between time::OffsetDateTime at the API and the
// chrono-typed DateTimeWithTimeZone Sea-ORM persists.

fn to_db(ts: OffsetDateTime) -> Result<DateTimeWithTimeZone> {
    chrono::DateTime::from_timestamp(ts.unix_timestamp(), ts.nanosecond())
        .map(Into::into)
        .ok_or_else(|| Error::Encode(format!("timestamp out of range: {ts}")))
}

fn from_db(dt: DateTimeWithTimeZone) -> Result<OffsetDateTime> {
    let nanos = dt
        .timestamp_nanos_opt()
        .ok_or_else(|| Error::Decode(format!("timestamp out of range: {dt}")))?;
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
        .map_err(|e| Error::Decode(format!("timestamp out of range: {e}")))
}
