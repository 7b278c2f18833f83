//! Database bootstrap: create the database and the three entity tables if missing.

use super::StoreError;
use crate::error::ConfigError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const TABLES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS eventos (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        descripcion TEXT NOT NULL,
        fecha_inicio DATE NOT NULL,
        fecha_fin DATE NOT NULL,
        lugar TEXT NOT NULL,
        materiales_aceptados TEXT NOT NULL,
        premios TEXT NOT NULL,
        organizador TEXT NOT NULL,
        imagen_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS participantes (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        tipo TEXT NOT NULL,
        evento_id BIGINT NOT NULL REFERENCES eventos (id),
        imagen_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS registros_material (
        id BIGSERIAL PRIMARY KEY,
        participante_id BIGINT NOT NULL REFERENCES participantes (id),
        evento_id BIGINT NOT NULL REFERENCES eventos (id),
        material TEXT NOT NULL,
        cantidad DOUBLE PRECISION NOT NULL,
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        foto_url TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS participantes_evento_id_idx ON participantes (evento_id)",
    "CREATE INDEX IF NOT EXISTS registros_material_evento_id_idx ON registros_material (evento_id)",
];

/// Create `eventos`, `participantes` and `registros_material` with their foreign keys. Idempotent.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for ddl in TABLES_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("schema ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::DatabaseUrl("no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
